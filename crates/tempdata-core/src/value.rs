//! Runtime type descriptions for values placed in temp data.
//!
//! Every value stored in a [`TempData`](crate::TempData) implements
//! [`TempDataValue`], which reports a static [`TypeInfo`] and, for permitted
//! types, the [`Token`] written to the wire. Types outside the permitted set
//! (maps, sets, user structs) implement the trait with its defaults so they
//! can still be handed to the store and rejected by the validator with their
//! own name.

use std::any::{Any, type_name};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use crate::token::Token;

/// The closed set of scalar types that may be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Char,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    DateTime,
    DateTimeOffset,
    Duration,
    Guid,
    Uri,
    Decimal,
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::String => "String",
            ScalarType::Char => "char",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::Isize => "isize",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::Usize => "usize",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Bool => "bool",
            ScalarType::DateTime => "DateTime<Utc>",
            ScalarType::DateTimeOffset => "DateTime<FixedOffset>",
            ScalarType::Duration => "Duration",
            ScalarType::Guid => "Uuid",
            ScalarType::Uri => "Url",
            ScalarType::Decimal => "Decimal",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of a value's type as seen by the allowlist validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeInfo {
    Scalar(ScalarType),
    /// `Option<T>`.
    Nullable(Box<TypeInfo>),
    /// Fixed or boxed slices: `[T; N]`, `Box<[T]>`.
    Array(Box<TypeInfo>),
    /// Growable single-argument sequences: `Vec<T>`, `VecDeque<T>`.
    Sequence {
        container: &'static str,
        element: Box<TypeInfo>,
    },
    /// Anything else, named by its full type path.
    Other(&'static str),
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeInfo::Scalar(scalar) => write!(f, "{scalar}"),
            TypeInfo::Nullable(inner) => write!(f, "Option<{inner}>"),
            TypeInfo::Array(element) => write!(f, "[{element}]"),
            TypeInfo::Sequence { container, element } => write!(f, "{container}<{element}>"),
            TypeInfo::Other(name) => f.write_str(name),
        }
    }
}

/// A value that can be placed in temp data.
///
/// The defaults describe a type outside the permitted set: validation will
/// reject it and it has no wire form. Opting a user type in is a one-liner:
///
/// ```
/// use tempdata_core::TempDataValue;
///
/// #[derive(Debug)]
/// struct Basket { items: u32 }
///
/// impl TempDataValue for Basket {}
/// ```
pub trait TempDataValue: Any + Send + Sync + fmt::Debug {
    fn type_info() -> TypeInfo
    where
        Self: Sized,
    {
        TypeInfo::Other(type_name::<Self>())
    }

    /// Token written to the wire, or `None` if the value has no encoding.
    fn to_token(&self) -> Option<Token> {
        None
    }
}

/// Object-safe view of a [`TempDataValue`].
pub trait ErasedValue: Any + Send + Sync + fmt::Debug + 'static {
    fn runtime_type_info(&self) -> TypeInfo;
    fn encode_token(&self) -> Option<Token>;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: TempDataValue> ErasedValue for T {
    fn runtime_type_info(&self) -> TypeInfo {
        <T as TempDataValue>::type_info()
    }

    fn encode_token(&self) -> Option<Token> {
        self.to_token()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn ErasedValue {
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Take ownership of the concrete value, handing the box back on mismatch.
    pub fn downcast<T: Any>(self: Box<Self>) -> Result<T, Box<dyn ErasedValue>> {
        if self.is::<T>() {
            match self.into_any().downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => unreachable!("type checked above"),
            }
        } else {
            Err(self)
        }
    }
}

// ── Scalars ───────────────────────────────────────────────────────

macro_rules! scalar_value {
    ($($ty:ty => $scalar:ident, |$v:ident| $token:expr;)*) => {
        $(
            impl TempDataValue for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::Scalar(ScalarType::$scalar)
                }

                fn to_token(&self) -> Option<Token> {
                    let $v = self;
                    $token
                }
            }
        )*
    };
}

scalar_value! {
    String => String, |v| Some(Token::String(v.clone()));
    &'static str => String, |v| Some(Token::String((*v).to_string()));
    char => Char, |v| Some(Token::String(v.to_string()));
    i8 => I8, |v| Some(Token::Integer(i64::from(*v)));
    i16 => I16, |v| Some(Token::Integer(i64::from(*v)));
    i32 => I32, |v| Some(Token::Integer(i64::from(*v)));
    i64 => I64, |v| Some(Token::Integer(*v));
    isize => Isize, |v| i64::try_from(*v).ok().map(Token::Integer);
    u8 => U8, |v| Some(Token::Integer(i64::from(*v)));
    u16 => U16, |v| Some(Token::Integer(i64::from(*v)));
    u32 => U32, |v| Some(Token::Integer(i64::from(*v)));
    // Values above i64::MAX have no Integer token and fail to encode.
    u64 => U64, |v| i64::try_from(*v).ok().map(Token::Integer);
    usize => Usize, |v| i64::try_from(*v).ok().map(Token::Integer);
    f32 => F32, |v| Some(Token::Float(f64::from(*v)));
    f64 => F64, |v| Some(Token::Float(*v));
    bool => Bool, |v| Some(Token::Boolean(*v));
    DateTime<Utc> => DateTime, |v| Some(Token::Date(*v));
    DateTime<FixedOffset> => DateTimeOffset, |v| Some(Token::DateOffset(*v));
    Duration => Duration, |v| Some(Token::TimeSpan(*v));
    Uuid => Guid, |v| Some(Token::Guid(*v));
    Url => Uri, |v| Some(Token::Uri(v.clone()));
    Decimal => Decimal, |v| Some(Token::Decimal(*v));
}

// ── Containers ────────────────────────────────────────────────────

fn array_token<'a, T: TempDataValue>(items: impl IntoIterator<Item = &'a T>) -> Option<Token> {
    items
        .into_iter()
        .map(T::to_token)
        .collect::<Option<Vec<_>>>()
        .map(Token::Array)
}

impl<T: TempDataValue> TempDataValue for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::Nullable(Box::new(T::type_info()))
    }

    fn to_token(&self) -> Option<Token> {
        match self {
            Some(value) => value.to_token(),
            None => Some(Token::Null),
        }
    }
}

impl<T: TempDataValue> TempDataValue for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::Sequence {
            container: "Vec",
            element: Box::new(T::type_info()),
        }
    }

    fn to_token(&self) -> Option<Token> {
        array_token(self)
    }
}

impl<T: TempDataValue> TempDataValue for VecDeque<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::Sequence {
            container: "VecDeque",
            element: Box::new(T::type_info()),
        }
    }

    fn to_token(&self) -> Option<Token> {
        array_token(self)
    }
}

impl<T: TempDataValue> TempDataValue for Box<[T]> {
    fn type_info() -> TypeInfo {
        TypeInfo::Array(Box::new(T::type_info()))
    }

    fn to_token(&self) -> Option<Token> {
        array_token(self.iter())
    }
}

impl<T: TempDataValue, const N: usize> TempDataValue for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::Array(Box::new(T::type_info()))
    }

    fn to_token(&self) -> Option<Token> {
        array_token(self)
    }
}

// Multi-argument and unordered collections are never persisted; they only
// exist so callers get a named rejection instead of a compile error.
impl<K, V> TempDataValue for HashMap<K, V>
where
    K: Send + Sync + fmt::Debug + 'static,
    V: Send + Sync + fmt::Debug + 'static,
{
}

impl<K, V> TempDataValue for BTreeMap<K, V>
where
    K: Send + Sync + fmt::Debug + 'static,
    V: Send + Sync + fmt::Debug + 'static,
{
}

impl<T: Send + Sync + fmt::Debug + 'static> TempDataValue for HashSet<T> {}

impl<T: Send + Sync + fmt::Debug + 'static> TempDataValue for BTreeSet<T> {}

impl TempDataValue for Token {}

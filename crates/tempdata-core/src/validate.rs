//! Allowlist validation of values before they are encoded.

use crate::error::UnsupportedTypeError;
use crate::value::{ErasedValue, ScalarType, TypeInfo};

/// A scalar element, possibly wrapped in `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementShape {
    pub scalar: ScalarType,
    pub nullable: bool,
}

/// The container shapes that may be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Scalar(ScalarType),
    NullableScalar(ScalarType),
    Array(ElementShape),
    Sequence(ElementShape),
}

impl ValueShape {
    /// Resolve the shape of `info`, or return the offending underlying type.
    ///
    /// Arrays and single-argument sequences are checked through their
    /// element type; everything else is checked as itself. One `Option`
    /// layer is stripped before the scalar membership test.
    pub fn of(info: &TypeInfo) -> Result<Self, &TypeInfo> {
        match info {
            TypeInfo::Array(element) => element_shape(element).map(ValueShape::Array),
            TypeInfo::Sequence { element, .. } => element_shape(element).map(ValueShape::Sequence),
            other => element_shape(other).map(|shape| {
                if shape.nullable {
                    ValueShape::NullableScalar(shape.scalar)
                } else {
                    ValueShape::Scalar(shape.scalar)
                }
            }),
        }
    }
}

fn element_shape(info: &TypeInfo) -> Result<ElementShape, &TypeInfo> {
    let (underlying, nullable) = match info {
        TypeInfo::Nullable(inner) => (inner.as_ref(), true),
        other => (other, false),
    };
    match underlying {
        TypeInfo::Scalar(scalar) => Ok(ElementShape {
            scalar: *scalar,
            nullable,
        }),
        _ => Err(underlying),
    }
}

/// Check that `value` may be persisted by `component`.
pub fn ensure_can_be_serialized(
    value: &dyn ErasedValue,
    component: &str,
) -> Result<ValueShape, UnsupportedTypeError> {
    let info = value.runtime_type_info();
    ValueShape::of(&info).map_err(|offending| UnsupportedTypeError {
        type_name: offending.to_string(),
        component: component.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::any::type_name;
    use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
    use std::time::Duration;

    use chrono::{DateTime, FixedOffset, Utc};
    use rust_decimal::Decimal;
    use url::Url;
    use uuid::Uuid;

    use super::*;
    use crate::token::Token;
    use crate::value::TempDataValue;

    const COMPONENT: &str = "tests::Provider";

    #[derive(Debug)]
    struct TestItem {
        #[allow(dead_code)]
        dummy: i32,
    }

    impl TempDataValue for TestItem {}

    fn check(value: &dyn ErasedValue) -> Result<ValueShape, UnsupportedTypeError> {
        ensure_can_be_serialized(value, COMPONENT)
    }

    fn rejected_type(value: &dyn ErasedValue) -> String {
        check(value).unwrap_err().type_name
    }

    #[test]
    fn valid_types_are_accepted() {
        let url = Url::parse("http://foo").unwrap();
        let valid: Vec<Box<dyn ErasedValue>> = vec![
            Box::new(10i32),
            Box::new([10i32, 20]),
            Box::new("FooValue"),
            Box::new(url.clone()),
            Box::new(Uuid::new_v4()),
            Box::new(vec!["foo".to_string(), "bar".to_string()]),
            Box::new(DateTime::<FixedOffset>::default()),
            Box::new(Decimal::new(1001, 1)),
            Box::new(vec![url.clone(), Url::parse("http://bar").unwrap()].into_boxed_slice()),
            Box::new(Some(5u8)),
            Box::new(VecDeque::from([Duration::from_secs(1)])),
            Box::new(vec![Some(1.5f64), None]),
            Box::new(DateTime::<Utc>::default()),
            Box::new('x'),
        ];
        for value in &valid {
            assert!(check(value.as_ref()).is_ok(), "{value:?} should be accepted");
        }
    }

    #[test]
    fn shapes_are_resolved() {
        assert_eq!(check(&7u16).unwrap(), ValueShape::Scalar(ScalarType::U16));
        assert_eq!(
            check(&None::<bool>).unwrap(),
            ValueShape::NullableScalar(ScalarType::Bool)
        );
        assert_eq!(
            check(&[1i64, 2]).unwrap(),
            ValueShape::Array(ElementShape {
                scalar: ScalarType::I64,
                nullable: false
            })
        );
        assert_eq!(
            check(&vec![Some("a")]).unwrap(),
            ValueShape::Sequence(ElementShape {
                scalar: ScalarType::String,
                nullable: true
            })
        );
    }

    #[test]
    fn plain_struct_is_rejected_by_name() {
        assert_eq!(
            rejected_type(&TestItem { dummy: 1 }),
            type_name::<TestItem>()
        );
    }

    #[test]
    fn sequence_of_structs_names_the_element() {
        assert_eq!(rejected_type(&Vec::<TestItem>::new()), type_name::<TestItem>());
        assert_eq!(
            rejected_type(&Some(TestItem { dummy: 2 })),
            type_name::<TestItem>()
        );
    }

    #[test]
    fn maps_are_rejected_as_a_whole() {
        assert_eq!(
            rejected_type(&HashMap::<String, i32>::new()),
            type_name::<HashMap<String, i32>>()
        );
        assert_eq!(
            rejected_type(&BTreeMap::<Uuid, Url>::new()),
            type_name::<BTreeMap<Uuid, Url>>()
        );
        assert_eq!(
            rejected_type(&HashMap::<String, TestItem>::new()),
            type_name::<HashMap<String, TestItem>>()
        );
        assert_eq!(
            rejected_type(&HashSet::<i32>::new()),
            type_name::<HashSet<i32>>()
        );
    }

    #[test]
    fn nested_sequences_are_rejected() {
        assert_eq!(rejected_type(&vec![vec![1i32]]), "Vec<i32>");
        assert_eq!(rejected_type(&Some(vec![1i32])), "Vec<i32>");
    }

    #[test]
    fn generic_tokens_are_rejected() {
        assert_eq!(rejected_type(&Token::Null), type_name::<Token>());
    }

    #[test]
    fn error_message_names_type_and_component() {
        let err = check(&vec![TestItem { dummy: 3 }]).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "The type {} cannot be serialized to Session by '{COMPONENT}'.",
                type_name::<TestItem>()
            )
        );
    }
}

//! tempdata-session: byte-valued session backends.
//!
//! A [`Session`] is the request-local handle the temp data provider reads and
//! writes its payload through. Two backends ship with the crate:
//!
//! - [`MemorySession`]: a `DashMap` shared between clones, for tests and
//!   single-process apps.
//! - [`SessionStore`]: a [redb](https://docs.rs/redb) database holding the
//!   values of every session, keyed `{session_id}/{key}`. Per-request handles
//!   are [`RedbSession`]s.

pub mod error;
pub mod memory;
pub mod session;
pub mod store;
pub mod tables;

pub use error::{SessionError, SessionResult};
pub use memory::MemorySession;
pub use session::Session;
pub use store::{RedbSession, SessionStore};

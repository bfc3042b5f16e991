//! tempdata: session-backed flash values that can be read exactly once.
//!
//! A request stores a [`TempData`] mapping with
//! [`TempDataProvider::save_temp_data`]; the next request reads it back with
//! [`TempDataProvider::load_temp_data`], which also deletes it from the
//! session.
//!
//! ```
//! use tempdata::{RequestContext, SessionStateTempDataProvider, TempData, TempDataProvider};
//! use tempdata_session::MemorySession;
//!
//! let provider = SessionStateTempDataProvider::new();
//! let mut session = MemorySession::new();
//!
//! let mut values = TempData::new();
//! values.insert("notice", "Profile saved");
//! values.insert("ids", vec![3u32, 5, 8]);
//! provider
//!     .save_temp_data(&mut RequestContext::with_session(&mut session), Some(&values))
//!     .unwrap();
//!
//! let loaded = provider
//!     .load_temp_data(&mut RequestContext::with_session(&mut session))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(loaded.get::<String>("notice").unwrap(), "Profile saved");
//! // Sequences come back typed by their first element's kind.
//! assert_eq!(loaded.get::<Vec<i64>>("ids").unwrap(), &[3, 5, 8]);
//! ```

pub mod context;
pub mod error;
pub mod provider;

pub use context::RequestContext;
pub use error::{TempDataError, TempDataResult};
pub use provider::{SessionStateTempDataProvider, TempDataProvider};
pub use tempdata_core::{TempData, TempDataConfig, TempDataValue, Token};

//! User info form core.
//!
//! A fixed form (names, email + confirmation, repeatable phone numbers, address) with
//! declarative per-field rules, an email cross-field check, debounced error messages
//! and a phone list that can grow and shrink but never drops below one entry.
//!
//! Modules:
//! - `validation` : rules, error codes, the email cross-check
//! - `field`      : a single input (value, rules, dirty/touched)
//! - `list`       : repeatable list of fields (append / remove last)
//! - `schema`     : groups and path addressing over the form tree
//! - `messages`   : error code → display string tables
//! - `debounce`   : per-key quiet-period timers driven by explicit time
//! - `user_info`  : the concrete form layout
//! - `form`       : `UserInfoForm`, wiring events, timers and messages together
//!
//! Rendering is left to the caller: read values and messages, feed back events.
//!
//! ```ignore
//! use std::time::{Duration, Instant};
//! use user_form::{FieldId, FormConfig, FormEvent, UserInfoForm};
//!
//! let mut form = UserInfoForm::new(FormConfig::default())?;
//! let t0 = Instant::now();
//! form.handle(FormEvent::edit("firstName", "Al"), t0)?;
//! form.on_tick(t0 + Duration::from_secs(1));
//! assert_eq!(form.error_message(FieldId::FirstName), "First Name must be 3 characters long");
//! ```

pub mod config;
pub mod debounce;
pub mod errors;
pub mod event;
pub mod field;
pub mod form;
pub mod list;
pub mod messages;
pub mod schema;
pub mod user_info;
pub mod validation;

pub use config::FormConfig;
pub use debounce::Debouncer;
pub use errors::{FormError, Result};
pub use event::{FieldReport, FormEvent};
pub use field::Field;
pub use form::UserInfoForm;
pub use list::RepeatableList;
pub use messages::MessageMode;
pub use schema::{Control, Group, GroupRule};
pub use user_info::FieldId;
pub use validation::{ErrorCode, ErrorSet, FieldSnapshot, Pattern, Rule};

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::user_info::FieldId;
use crate::validation::ErrorSet;

/// Inbound UI events understood by [`UserInfoForm`](crate::UserInfoForm).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum FormEvent {
    /// New value typed into the input at `path`.
    Edit { path: String, value: String },
    /// The input at `path` lost focus.
    Blur { path: String },
    AddPhone,
    RemovePhone,
    Reset,
}

impl FormEvent {
    pub fn edit(path: impl Into<String>, value: impl Into<String>) -> Self {
        FormEvent::Edit {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn blur(path: impl Into<String>) -> Self {
        FormEvent::Blur { path: path.into() }
    }
}

/// Outcome of one debounced validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    pub field: FieldId,
    /// Value(s) the pass was evaluated against; one entry except for phone numbers.
    pub values: Vec<String>,
    pub errors: ErrorSet,
    pub message: String,
}

//! Non-interactive validation: apply `path=value` assignments and submit.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value as JsonValue;
use strum::IntoEnumIterator;
use tracing::debug;

use user_form::{
    user_info::PHONE_NUMBERS, ErrorSet, FieldId, FormError, FormEvent, UserInfoForm,
};

#[derive(Debug, Serialize)]
pub struct Outcome {
    pub valid: bool,
    pub values: JsonValue,
    /// Failing codes per field path.
    pub errors: BTreeMap<String, ErrorSet>,
    /// Display messages per tracked input, plus `emailGroup` for the mismatch.
    pub messages: BTreeMap<String, String>,
}

/// clap value parser for `--set path=value`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((path, value)) if !path.trim().is_empty() => {
            Ok((path.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected PATH=VALUE, got `{s}`")),
    }
}

fn phone_index(path: &str) -> Option<usize> {
    path.strip_prefix(PHONE_NUMBERS)?
        .strip_prefix('.')?
        .parse()
        .ok()
}

/// Apply all assignments, then submit.
///
/// `phoneNumbers.N` may address an existing entry or the one right after the last,
/// which appends it. Anything further out is an unknown field.
pub fn run(mut form: UserInfoForm, assignments: &[(String, String)]) -> user_form::Result<Outcome> {
    let now = Instant::now();
    for (path, value) in assignments {
        if let Some(index) = phone_index(path) {
            if index == form.phone_count() {
                form.add_phone()?;
            } else if index > form.phone_count() {
                return Err(FormError::UnknownField(path.clone()));
            }
        }
        form.handle(FormEvent::edit(path.as_str(), value.as_str()), now)?;
        form.handle(FormEvent::blur(path.as_str()), now)?;
    }

    let valid = match form.submit() {
        Ok(_) => true,
        Err(FormError::Invalid { fields }) => {
            debug!(?fields, "invalid");
            false
        }
        Err(err) => return Err(err),
    };

    let mut errors = BTreeMap::new();
    for path in form.root().invalid_paths() {
        if let Ok(field) = form.root().field(&path) {
            errors.insert(path, field.errors());
        } else if let Ok(group) = form.root().group(&path) {
            errors.insert(path, group.errors());
        }
    }

    let mut messages = BTreeMap::new();
    for id in FieldId::iter() {
        let message = form.error_message(id);
        if !message.is_empty() {
            messages.insert(id.path().to_string(), message.to_string());
        }
    }
    if !form.email_group_error().is_empty() {
        messages.insert(
            user_form::user_info::EMAIL_GROUP.to_string(),
            form.email_group_error().to_string(),
        );
    }

    Ok(Outcome {
        valid,
        values: form.to_json(),
        errors,
        messages,
    })
}

impl Outcome {
    /// Process exit status: 0 when valid, 1 otherwise.
    pub fn exit_status(&self) -> u8 {
        if self.valid {
            0
        } else {
            1
        }
    }
}

/// Human readable rendering of an [`Outcome`].
pub fn render(outcome: &Outcome) -> String {
    if outcome.valid {
        return format!("valid\n{}", outcome.values);
    }
    let mut out = String::from("invalid\n");
    for (path, message) in &outcome.messages {
        out.push_str(&format!("  {path}: {}\n", message.trim_end()));
    }
    for (path, codes) in &outcome.errors {
        if !outcome.messages.contains_key(path) {
            let codes: Vec<&str> = codes.iter().map(|c| c.into()).collect();
            out.push_str(&format!("  {path}: {}\n", codes.join(", ")));
        }
    }
    out
}

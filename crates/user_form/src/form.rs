//! Interactive form state: the model plus debounced message slots.
//!
//! Responsibilities:
//! - Apply inbound [`FormEvent`]s to the model (values, dirty/touched, phone list)
//! - Arm a debounce timer per tracked input on every edit
//! - On tick, run validation + message resolution for inputs whose timer fired
//! - Keep the email group's cross-field message current on every email edit
//! - Submit: validate everything immediately and produce a JSON snapshot
//!
//! Rendering is not done here; the UI reads values, structure and messages back.

use std::collections::HashMap;
use std::time::Instant;

use serde_json::Value as JsonValue;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::config::FormConfig;
use crate::debounce::Debouncer;
use crate::errors::{FormError, Result};
use crate::event::{FieldReport, FormEvent};
use crate::messages::{self, MessageMode};
use crate::schema::Group;
use crate::user_info::{self, FieldId, EMAIL_GROUP, PHONE_NUMBERS};
use crate::validation::ErrorSet;

pub struct UserInfoForm {
    root: Group,
    config: FormConfig,
    debouncer: Debouncer<FieldId>,
    messages: HashMap<FieldId, String>,
    email_group_error: String,
    passes: usize,
}

impl UserInfoForm {
    pub fn new(config: FormConfig) -> Result<Self> {
        Ok(Self {
            root: user_info::build()?,
            debouncer: Debouncer::new(config.debounce()),
            config,
            messages: HashMap::new(),
            email_group_error: String::new(),
            passes: 0,
        })
    }

    // --- Read side (used by renderers) ---------------------------------------------------------

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn value(&self, path: &str) -> Result<&str> {
        self.root.field(path).map(|f| f.value())
    }

    /// Current error string for a tracked input ("" when there is nothing to show).
    pub fn error_message(&self, id: FieldId) -> &str {
        self.messages.get(&id).map(String::as_str).unwrap_or("")
    }

    pub fn email_group_error(&self) -> &str {
        &self.email_group_error
    }

    pub fn phone_values(&self) -> Vec<String> {
        self.root
            .list(PHONE_NUMBERS)
            .map(|l| l.values())
            .unwrap_or_default()
    }

    pub fn phone_count(&self) -> usize {
        self.root.list(PHONE_NUMBERS).map(|l| l.len()).unwrap_or(0)
    }

    /// Validation result per phone entry.
    pub fn phone_errors(&self) -> Vec<ErrorSet> {
        self.root
            .list(PHONE_NUMBERS)
            .map(|l| l.errors())
            .unwrap_or_default()
    }

    pub fn is_valid(&self) -> bool {
        self.root.is_valid()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    pub fn is_pending(&self, id: FieldId) -> bool {
        self.debouncer.is_pending(id)
    }

    /// Number of debounced validation passes run so far.
    pub fn validation_passes(&self) -> usize {
        self.passes
    }

    // --- Write side ----------------------------------------------------------------------------

    pub fn handle(&mut self, event: FormEvent, now: Instant) -> Result<()> {
        debug!(%event, "form event");
        match event {
            FormEvent::Edit { path, value } => {
                self.root.field_mut(&path)?.set_value(value);
                if let Some(id) = FieldId::from_path(&path) {
                    if id != FieldId::PhoneNumbers || self.config.phone_debounce {
                        self.debouncer.schedule(id, now);
                    }
                }
                if is_in_email_group(&path) {
                    self.refresh_email_group();
                }
            }
            FormEvent::Blur { path } => {
                self.root.field_mut(&path)?.touch();
                if is_in_email_group(&path) {
                    self.refresh_email_group();
                }
            }
            FormEvent::AddPhone => {
                self.add_phone()?;
            }
            FormEvent::RemovePhone => {
                self.remove_phone()?;
            }
            FormEvent::Reset => self.reset(),
        }
        Ok(())
    }

    /// Append a phone entry; returns the new number of entries.
    pub fn add_phone(&mut self) -> Result<usize> {
        let len = self.root.list_mut(PHONE_NUMBERS)?.append();
        self.log_phone_state();
        self.refresh_phone_message()?;
        Ok(len)
    }

    /// Remove the last phone entry; `false` when only one is left.
    pub fn remove_phone(&mut self) -> Result<bool> {
        let removed = self.root.list_mut(PHONE_NUMBERS)?.remove_last();
        self.log_phone_state();
        if removed {
            self.refresh_phone_message()?;
        }
        Ok(removed)
    }

    pub fn reset(&mut self) {
        self.root.reset();
        self.debouncer.clear();
        self.messages.clear();
        self.email_group_error.clear();
        info!("form reset");
    }

    /// Fire every debounce timer that elapsed by `now`. One report per validation pass.
    pub fn on_tick(&mut self, now: Instant) -> Vec<FieldReport> {
        let mut reports = Vec::new();
        for id in self.debouncer.due(now) {
            match self.run_pass(id) {
                Ok(report) => reports.push(report),
                Err(err) => warn!(field = %id, "validation pass failed: {err}"),
            }
        }
        reports
    }

    /// Validate everything now, bypassing the debounce window.
    ///
    /// All fields are marked touched so every message becomes visible. Returns the
    /// value snapshot when the form is valid.
    pub fn submit(&mut self) -> Result<JsonValue> {
        self.root.mark_all_touched();
        self.debouncer.clear();
        for id in FieldId::iter() {
            self.run_pass(id)?;
        }
        self.refresh_email_group();

        if self.root.is_valid() {
            info!("form submitted");
            Ok(self.root.to_json())
        } else {
            let fields = self.root.invalid_paths();
            info!(invalid = fields.len(), "submit rejected");
            Err(FormError::Invalid { fields })
        }
    }

    pub fn to_json(&self) -> JsonValue {
        self.root.to_json()
    }

    fn mode(&self, id: FieldId) -> MessageMode {
        match id {
            FieldId::EmailAddress => self.config.email_messages,
            _ => messages::default_mode(id),
        }
    }

    fn run_pass(&mut self, id: FieldId) -> Result<FieldReport> {
        let mode = self.mode(id);
        let report = match id {
            FieldId::PhoneNumbers => {
                let list = self.root.list(PHONE_NUMBERS)?;
                let mut errors = ErrorSet::new();
                let mut message = String::new();
                for entry in list.iter() {
                    let entry_errors = entry.errors();
                    errors.extend(&entry_errors);
                    if message.is_empty() && entry.is_interacted() {
                        message = messages::resolve(id, &entry_errors, mode);
                    }
                }
                FieldReport {
                    field: id,
                    values: list.values(),
                    errors,
                    message,
                }
            }
            _ => {
                let field = self.root.field(id.path())?;
                FieldReport {
                    field: id,
                    values: vec![field.value().to_string()],
                    errors: field.errors(),
                    message: messages::display(id, field, mode),
                }
            }
        };
        self.passes += 1;
        debug!(field = %id, errors = ?report.errors, "validation pass");
        self.messages.insert(id, report.message.clone());
        Ok(report)
    }

    fn refresh_email_group(&mut self) {
        self.email_group_error = match self.root.group(EMAIL_GROUP) {
            Ok(group) => messages::resolve_with(
                messages::email_group_message,
                &group.errors(),
                MessageMode::All,
            ),
            Err(_) => String::new(),
        };
    }

    /// The list message describes the entries, so a shape change re-resolves it right away.
    fn refresh_phone_message(&mut self) -> Result<()> {
        if self.config.phone_debounce {
            self.debouncer.cancel(FieldId::PhoneNumbers);
            self.run_pass(FieldId::PhoneNumbers)?;
        }
        Ok(())
    }

    fn log_phone_state(&self) {
        debug!(entries = self.phone_count(), "phone list changed");
    }
}

fn is_in_email_group(path: &str) -> bool {
    path.strip_prefix(EMAIL_GROUP)
        .is_some_and(|rest| rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_info::{CONFIRM_EMAIL, EMAIL_ADDRESS, FIRST_NAME};
    use crate::validation::ErrorCode;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn form() -> UserInfoForm {
        UserInfoForm::new(FormConfig::default()).expect("form builds")
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn edit_schedules_and_tick_resolves() {
        let t0 = Instant::now();
        let mut f = form();
        f.handle(FormEvent::edit(FIRST_NAME, "Al"), t0).expect("edit");
        assert!(f.is_pending(FieldId::FirstName));
        assert_eq!(f.error_message(FieldId::FirstName), "");

        assert!(f.on_tick(t0 + ms(500)).is_empty());
        let reports = f.on_tick(t0 + ms(1000));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].errors, ErrorSet::from_iter([ErrorCode::MinLength]));
        assert_eq!(
            f.error_message(FieldId::FirstName),
            "First Name must be 3 characters long"
        );
    }

    #[test]
    fn unknown_paths_are_errors() {
        let mut f = form();
        let err = f
            .handle(FormEvent::edit("middleName", "K"), Instant::now())
            .unwrap_err();
        assert!(matches!(err, FormError::UnknownField(p) if p == "middleName"));
    }

    #[test]
    fn email_group_message_updates_immediately() {
        let t0 = Instant::now();
        let mut f = form();
        f.handle(FormEvent::edit(EMAIL_ADDRESS, "a@b.com"), t0).expect("edit");
        assert_eq!(f.email_group_error(), "");
        f.handle(FormEvent::edit(CONFIRM_EMAIL, "x@y.com"), t0).expect("edit");
        assert_eq!(
            f.email_group_error(),
            "Email Address and Confirm Email do not match"
        );
        f.handle(FormEvent::edit(CONFIRM_EMAIL, "a@b.com"), t0).expect("edit");
        assert_eq!(f.email_group_error(), "");
    }

    #[test]
    fn email_address_keeps_first_message_by_default() {
        let t0 = Instant::now();
        let mut f = form();
        f.handle(FormEvent::edit(EMAIL_ADDRESS, "a@b"), t0).expect("edit");
        f.on_tick(t0 + ms(1000));
        assert_eq!(
            f.error_message(FieldId::EmailAddress),
            "Email Address must be 8 characters long"
        );
    }

    #[test]
    fn email_messages_can_be_concatenated() {
        let t0 = Instant::now();
        let config = FormConfig {
            email_messages: MessageMode::All,
            ..FormConfig::default()
        };
        let mut f = UserInfoForm::new(config).expect("form builds");
        f.handle(FormEvent::edit(EMAIL_ADDRESS, "a@b"), t0).expect("edit");
        f.on_tick(t0 + ms(1000));
        assert_eq!(
            f.error_message(FieldId::EmailAddress),
            "Email Address must be 8 characters longPlease enter valid email address"
        );
    }

    #[test]
    fn phone_edits_are_not_debounced_by_default() {
        let t0 = Instant::now();
        let mut f = form();
        f.handle(FormEvent::edit("phoneNumbers.0", "123"), t0).expect("edit");
        assert!(!f.is_pending(FieldId::PhoneNumbers));
        assert!(f.on_tick(t0 + ms(2000)).is_empty());
        assert_eq!(
            f.phone_errors(),
            vec![ErrorSet::from_iter([ErrorCode::MinLength])]
        );
    }

    #[test]
    fn phone_debounce_extension_resolves_first_failing_entry() {
        let t0 = Instant::now();
        let config = FormConfig {
            phone_debounce: true,
            ..FormConfig::default()
        };
        let mut f = UserInfoForm::new(config).expect("form builds");
        f.handle(FormEvent::AddPhone, t0).expect("add");
        f.handle(FormEvent::edit("phoneNumbers.0", "0123456789"), t0).expect("edit");
        f.handle(FormEvent::edit("phoneNumbers.1", "555"), t0).expect("edit");
        let reports = f.on_tick(t0 + ms(1000));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].values, vec!["0123456789".to_string(), "555".to_string()]);
        assert_eq!(
            f.error_message(FieldId::PhoneNumbers),
            "Phone Number must be 10 digits long"
        );
    }

    #[test]
    fn removing_the_failing_phone_clears_the_list_message() {
        let t0 = Instant::now();
        let config = FormConfig {
            phone_debounce: true,
            ..FormConfig::default()
        };
        let mut f = UserInfoForm::new(config).expect("form builds");
        f.handle(FormEvent::edit("phoneNumbers.0", "0123456789"), t0).expect("edit");
        f.handle(FormEvent::AddPhone, t0).expect("add");
        f.handle(FormEvent::edit("phoneNumbers.1", "555"), t0).expect("edit");
        f.on_tick(t0 + ms(1000));
        assert_eq!(
            f.error_message(FieldId::PhoneNumbers),
            "Phone Number must be 10 digits long"
        );

        f.handle(FormEvent::RemovePhone, t0 + ms(1100)).expect("remove");
        assert_eq!(f.phone_errors(), vec![ErrorSet::new()]);
        assert_eq!(f.error_message(FieldId::PhoneNumbers), "");
        assert!(!f.is_pending(FieldId::PhoneNumbers));
    }

    #[test]
    fn phone_list_mutations() {
        let mut f = form();
        let t0 = Instant::now();
        f.handle(FormEvent::RemovePhone, t0).expect("remove");
        assert_eq!(f.phone_count(), 1);
        f.handle(FormEvent::AddPhone, t0).expect("add");
        assert_eq!(f.phone_values(), vec![String::new(), String::new()]);
        assert_eq!(f.remove_phone().ok(), Some(true));
        assert_eq!(f.remove_phone().ok(), Some(false));
    }

    #[test]
    fn submit_rejects_incomplete_form_and_shows_messages() {
        let mut f = form();
        let fields = match f.submit() {
            Err(FormError::Invalid { fields }) => fields,
            other => panic!("expected Invalid, got {other:?}"),
        };
        assert!(fields.contains(&FIRST_NAME.to_string()));
        assert_eq!(
            f.error_message(FieldId::FirstName),
            "First Name field is required "
        );
        assert_eq!(f.error_message(FieldId::PhoneNumbers), "Phone Number is required ");
    }

    #[test]
    fn submit_returns_snapshot_when_valid() {
        let t0 = Instant::now();
        let mut f = form();
        for (path, value) in [
            (FIRST_NAME, "Manish"),
            ("lastName", "Chahal"),
            (EMAIL_ADDRESS, "manish@example.com"),
            (CONFIRM_EMAIL, "manish@example.com"),
            ("phoneNumbers.0", "0123456789"),
            ("address.city", "Delhi"),
        ] {
            f.handle(FormEvent::edit(path, value), t0).expect("edit");
        }
        let json = f.submit().expect("valid form");
        assert_eq!(json["firstName"], "Manish");
        assert_eq!(json["emailGroup"]["confirmEmail"], "manish@example.com");
        assert_eq!(json["phoneNumbers"][0], "0123456789");
        assert_eq!(json["address"]["city"], "Delhi");
        assert_eq!(f.error_message(FieldId::FirstName), "");
    }

    #[test]
    fn reset_clears_everything() {
        let t0 = Instant::now();
        let mut f = form();
        f.handle(FormEvent::edit(FIRST_NAME, "Al"), t0).expect("edit");
        f.handle(FormEvent::AddPhone, t0).expect("add");
        f.on_tick(t0 + ms(1000));
        f.handle(FormEvent::Reset, t0).expect("reset");
        assert_eq!(f.error_message(FieldId::FirstName), "");
        assert_eq!(f.phone_count(), 1);
        assert_eq!(f.value(FIRST_NAME).ok(), Some(""));
        assert!(f.next_deadline().is_none());
    }
}

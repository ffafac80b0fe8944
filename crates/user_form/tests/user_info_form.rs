//! End-to-end behavior of `UserInfoForm`:
//! - required vs length/pattern rules on empty values
//! - email / confirm-email cross-check and its pristine guard
//! - debounce: rapid edits collapse into one validation pass on the final value
//! - phone list never shrinks below one entry
//! - message resolution and the touched/dirty display gate

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use user_form::messages::{self, MessageMode};
use user_form::user_info::{CONFIRM_EMAIL, EMAIL_ADDRESS, EMAIL_GROUP, FIRST_NAME, LAST_NAME};
use user_form::{ErrorCode, ErrorSet, FieldId, FormConfig, FormEvent, UserInfoForm};

fn form() -> UserInfoForm {
    UserInfoForm::new(FormConfig::default()).expect("form builds")
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn empty_values_only_report_required() {
    let f = form();
    for path in [FIRST_NAME, LAST_NAME, EMAIL_ADDRESS, CONFIRM_EMAIL, "phoneNumbers.0"] {
        let errors = f.root().field(path).expect("field").errors();
        assert_eq!(errors, ErrorSet::from_iter([ErrorCode::Required]), "{path}");
    }
}

#[test]
fn email_cross_check() {
    let t0 = Instant::now();
    let mut f = form();
    let group_errors = |f: &UserInfoForm| f.root().group(EMAIL_GROUP).expect("group").errors();

    // Mismatch while confirmEmail is still pristine: no unmatch.
    f.handle(FormEvent::edit(EMAIL_ADDRESS, "a@b.com"), t0).expect("edit");
    f.handle(FormEvent::blur(EMAIL_ADDRESS), t0).expect("blur");
    assert!(!group_errors(&f).contains(ErrorCode::Unmatch));

    f.handle(FormEvent::edit(CONFIRM_EMAIL, "a@b.com"), t0).expect("edit");
    f.handle(FormEvent::blur(CONFIRM_EMAIL), t0).expect("blur");
    assert!(!group_errors(&f).contains(ErrorCode::Unmatch));

    f.handle(FormEvent::edit(CONFIRM_EMAIL, "x@y.com"), t0).expect("edit");
    assert!(group_errors(&f).contains(ErrorCode::Unmatch));
    assert!(!f.is_valid());
}

#[test]
fn rapid_edits_collapse_into_one_pass() {
    let t0 = Instant::now();
    let mut f = form();
    f.handle(FormEvent::edit(FIRST_NAME, "A"), t0).expect("edit");
    f.handle(FormEvent::edit(FIRST_NAME, "Al"), t0 + ms(300)).expect("edit");
    f.handle(FormEvent::edit(FIRST_NAME, "Alice"), t0 + ms(600)).expect("edit");

    // Tick through the window the way a UI loop would.
    let mut reports = Vec::new();
    for step in 0..=20 {
        reports.extend(f.on_tick(t0 + ms(step * 100)));
    }

    assert_eq!(reports.len(), 1);
    assert_eq!(f.validation_passes(), 1);
    assert_eq!(reports[0].field, FieldId::FirstName);
    assert_eq!(reports[0].values, vec!["Alice".to_string()]);
    assert!(reports[0].errors.is_empty());
    assert_eq!(f.error_message(FieldId::FirstName), "");
}

#[test]
fn tracked_fields_debounce_independently() {
    let t0 = Instant::now();
    let mut f = form();
    f.handle(FormEvent::edit(FIRST_NAME, "Al"), t0).expect("edit");
    f.handle(FormEvent::edit(LAST_NAME, "Ch"), t0 + ms(800)).expect("edit");

    let first = f.on_tick(t0 + ms(1000));
    assert_eq!(first.iter().map(|r| r.field).collect::<Vec<_>>(), vec![FieldId::FirstName]);
    assert_eq!(f.error_message(FieldId::LastName), "");

    let second = f.on_tick(t0 + ms(1800));
    assert_eq!(second.iter().map(|r| r.field).collect::<Vec<_>>(), vec![FieldId::LastName]);
    assert_eq!(f.error_message(FieldId::LastName), "Last Name must be 3 characters long");
}

#[test]
fn phone_list_keeps_at_least_one_entry() {
    let t0 = Instant::now();
    let mut f = form();
    f.handle(FormEvent::RemovePhone, t0).expect("remove");
    assert_eq!(f.phone_count(), 1);

    f.handle(FormEvent::AddPhone, t0).expect("add");
    f.handle(FormEvent::AddPhone, t0).expect("add");
    assert_eq!(f.phone_count(), 3);
    f.handle(FormEvent::RemovePhone, t0).expect("remove");
    f.handle(FormEvent::RemovePhone, t0).expect("remove");
    assert_eq!(f.phone_count(), 1);
    f.handle(FormEvent::RemovePhone, t0).expect("remove");
    assert_eq!(f.phone_count(), 1);
}

#[test]
fn message_resolution_for_sets() {
    assert_eq!(
        messages::resolve(
            FieldId::LastName,
            &ErrorSet::from_iter([ErrorCode::Required]),
            MessageMode::All
        ),
        "Last Name field is required "
    );
    assert_eq!(
        messages::resolve(FieldId::LastName, &ErrorSet::new(), MessageMode::All),
        ""
    );
}

#[test]
fn short_first_name_shows_minlength_message() {
    let t0 = Instant::now();
    let mut f = form();
    f.handle(FormEvent::edit(FIRST_NAME, "Al"), t0).expect("edit");
    f.handle(FormEvent::blur(FIRST_NAME), t0).expect("blur");
    let reports = f.on_tick(t0 + ms(1000));
    assert_eq!(reports[0].errors, ErrorSet::from_iter([ErrorCode::MinLength]));
    assert_eq!(
        f.error_message(FieldId::FirstName),
        "First Name must be 3 characters long"
    );
}

#[test]
fn blur_alone_does_not_resolve_messages() {
    let t0 = Instant::now();
    let mut f = form();
    f.handle(FormEvent::blur(FIRST_NAME), t0).expect("blur");
    assert!(f.on_tick(t0 + ms(5000)).is_empty());
    assert_eq!(f.error_message(FieldId::FirstName), "");
}

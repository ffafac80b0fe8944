//! The concrete "user info" form: names, email + confirmation, phone numbers, address.
//!
//! Fields (path → rules):
//! - `firstName`, `lastName`: required, 3..=50 characters
//! - `emailGroup.emailAddress`: required, at least 8 characters, email pattern
//! - `emailGroup.confirmEmail`: required
//! - `emailGroup`: email and confirmation must match once both were edited
//! - `phoneNumbers.<i>`: required, at least 10 characters (repeatable, at least one)
//! - `address.*`: free text, no rules

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::errors::Result;
use crate::field::Field;
use crate::list::RepeatableList;
use crate::schema::{Group, GroupRule};
use crate::validation::Rule;

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL_GROUP: &str = "emailGroup";
pub const EMAIL_ADDRESS: &str = "emailGroup.emailAddress";
pub const CONFIRM_EMAIL: &str = "emailGroup.confirmEmail";
pub const PHONE_NUMBERS: &str = "phoneNumbers";
pub const ADDRESS: &str = "address";

pub const ADDRESS_FIELDS: [&str; 8] = [
    "landMark", "street", "zipCode", "country", "city", "state", "houseNo", "society",
];

/// Basic email shape check; anchored by [`Pattern`](crate::validation::Pattern).
pub const EMAIL_PATTERN: &str = "[a-zA-Z0-9.-_]{1,}@[a-zA-Z.-]{2,}[.]{1}[a-zA-Z]{2,}";

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 50;
pub const EMAIL_MIN: usize = 8;
pub const PHONE_MIN: usize = 10;

/// Inputs whose error string is resolved after the debounce window.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FieldId {
    FirstName,
    LastName,
    EmailAddress,
    PhoneNumbers,
}

impl FieldId {
    /// Path of the control inside the form tree.
    pub fn path(self) -> &'static str {
        match self {
            FieldId::FirstName => FIRST_NAME,
            FieldId::LastName => LAST_NAME,
            FieldId::EmailAddress => EMAIL_ADDRESS,
            FieldId::PhoneNumbers => PHONE_NUMBERS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::FirstName => "First Name",
            FieldId::LastName => "Last Name",
            FieldId::EmailAddress => "Email Address",
            FieldId::PhoneNumbers => "Phone Number",
        }
    }

    /// Map an edited path to the tracked input it belongs to.
    pub fn from_path(path: &str) -> Option<FieldId> {
        match path {
            FIRST_NAME => Some(FieldId::FirstName),
            LAST_NAME => Some(FieldId::LastName),
            EMAIL_ADDRESS => Some(FieldId::EmailAddress),
            _ => path
                .strip_prefix(PHONE_NUMBERS)
                .and_then(|rest| rest.strip_prefix('.'))
                .filter(|index| index.parse::<usize>().is_ok())
                .map(|_| FieldId::PhoneNumbers),
        }
    }
}

/// Template for a phone number entry.
pub fn phone_field() -> Field {
    Field::new("phone").rules_from([Rule::Required, Rule::MinLength(PHONE_MIN)])
}

fn name_field(name: &str) -> Field {
    Field::new(name).rules_from([Rule::Required, Rule::MinLength(NAME_MIN), Rule::MaxLength(NAME_MAX)])
}

/// Build the form tree with empty initial values.
pub fn build() -> Result<Group> {
    let email = Group::new(EMAIL_GROUP)
        .with(
            "emailAddress",
            Field::new("emailAddress").rules_from([
                Rule::Required,
                Rule::MinLength(EMAIL_MIN),
                Rule::pattern(EMAIL_PATTERN)?,
            ]),
        )?
        .with("confirmEmail", Field::new("confirmEmail").rule(Rule::Required))?
        .with_rule(GroupRule::EmailMatch {
            email: "emailAddress".into(),
            confirm: "confirmEmail".into(),
        })?;

    let mut address = Group::new(ADDRESS);
    for key in ADDRESS_FIELDS {
        address.insert(key, Field::new(key))?;
    }

    Group::new("userInfo")
        .with(FIRST_NAME, name_field(FIRST_NAME))?
        .with(LAST_NAME, name_field(LAST_NAME))?
        .with(EMAIL_GROUP, email)?
        .with(PHONE_NUMBERS, RepeatableList::new(PHONE_NUMBERS, phone_field()))?
        .with(ADDRESS, address)
}

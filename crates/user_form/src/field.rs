//! Field definition & runtime state.
//!
//! A `Field` is both the declarative part (name, initial value, ordered rules) and the
//! mutable editing state (current value, dirty/touched flags). Builder-style setters
//! are used while constructing the form; the mutators below are what UI events call.
//!
//! ```ignore
//! use user_form::{Field, Rule};
//!
//! let field = Field::new("firstName")
//!     .rule(Rule::Required)
//!     .rule(Rule::MinLength(3));
//! ```

use crate::validation::{self, ErrorCode, ErrorSet, FieldSnapshot, Rule};

/// Atomic named input with a value and validation rules.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    initial: String,
    value: String,
    rules: Vec<Rule>,
    dirty: bool,
    touched: bool,
}

impl Field {
    /// Create a pristine, untouched field with an empty value and no rules.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: String::new(),
            value: String::new(),
            rules: Vec::new(),
            dirty: false,
            touched: false,
        }
    }

    /// Set the initial value (also the value `reset` returns to).
    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.initial = value.into();
        self.value = self.initial.clone();
        self
    }

    /// Append a rule. Rules are evaluated in the order they were added.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules_from(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_pristine(&self) -> bool {
        !self.dirty
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// True once the user changed the value or left the input.
    pub fn is_interacted(&self) -> bool {
        self.dirty || self.touched
    }

    /// Apply a user edit. Any edit marks the field dirty, even if the value is unchanged.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.dirty = true;
    }

    /// The user left the input (blur).
    pub fn touch(&mut self) {
        self.touched = true;
    }

    /// Back to the initial value, pristine and untouched.
    pub fn reset(&mut self) {
        self.value = self.initial.clone();
        self.dirty = false;
        self.touched = false;
    }

    /// A fresh copy: same name, initial value and rules, no editing state.
    pub fn fresh(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Evaluate all rules against the current value.
    pub fn errors(&self) -> ErrorSet {
        validation::validate(self)
    }

    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors().contains(code)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn snapshot(&self) -> FieldSnapshot<'_> {
        FieldSnapshot::new(&self.value, self.is_pristine())
    }
}

//! Repeatable list of homogeneous fields (the phone number inputs).
//!
//! Entries are created from a template field. The list never drops below one entry:
//! `remove_last` on a single-entry list is a silent no-op.

use crate::field::Field;
use crate::validation::ErrorSet;

#[derive(Debug, Clone)]
pub struct RepeatableList {
    name: String,
    template: Field,
    entries: Vec<Field>,
}

impl RepeatableList {
    /// Create a list holding exactly one entry built from `template`.
    pub fn new(name: impl Into<String>, template: Field) -> Self {
        let template = template.fresh();
        let mut list = Self {
            name: name.into(),
            template,
            entries: Vec::new(),
        };
        list.push_entry();
        list
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with other collections.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.entries.iter_mut()
    }

    /// Current values in list order, for rendering.
    pub fn values(&self) -> Vec<String> {
        self.entries.iter().map(|f| f.value().to_string()).collect()
    }

    /// Append a new empty entry with the template's rules. Returns the new length.
    pub fn append(&mut self) -> usize {
        self.push_entry();
        tracing::debug!(list = %self.name, len = self.len(), "entry appended");
        self.len()
    }

    /// Remove the final entry. Returns false (and leaves the list alone) when only
    /// one entry is left.
    pub fn remove_last(&mut self) -> bool {
        if self.entries.len() <= 1 {
            tracing::debug!(list = %self.name, "refusing to remove the last remaining entry");
            return false;
        }
        self.entries.pop();
        tracing::debug!(list = %self.name, len = self.len(), "entry removed");
        true
    }

    /// Shrink back to a single fresh entry.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.push_entry();
    }

    /// Validation result per entry, in list order.
    pub fn errors(&self) -> Vec<ErrorSet> {
        self.entries.iter().map(Field::errors).collect()
    }

    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(Field::is_valid)
    }

    fn push_entry(&mut self) {
        let mut entry = self.template.fresh();
        entry.rename(self.entries.len().to_string());
        self.entries.push(entry);
    }
}

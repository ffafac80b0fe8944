//! Form model tree: groups of fields, nested groups and repeatable lists.
//!
//! Controls are addressed with dotted paths, the same way the UI layer refers to them:
//! `firstName`, `emailGroup.emailAddress`, `phoneNumbers.1`, `address.city`.
//! Keys inside a group are unique and keep their insertion order so the UI can render
//! the structure by iterating it.

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::errors::{FormError, Result};
use crate::field::Field;
use crate::list::RepeatableList;
use crate::validation::{self, ErrorSet};

/// A node of the form tree.
#[derive(Debug, Clone)]
pub enum Control {
    Field(Field),
    Group(Group),
    List(RepeatableList),
}

impl Control {
    pub fn is_valid(&self) -> bool {
        match self {
            Control::Field(f) => f.is_valid(),
            Control::Group(g) => g.is_valid(),
            Control::List(l) => l.is_valid(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Control::Field(f) => JsonValue::String(f.value().to_string()),
            Control::Group(g) => g.to_json(),
            Control::List(l) => JsonValue::Array(
                l.iter()
                    .map(|f| JsonValue::String(f.value().to_string()))
                    .collect(),
            ),
        }
    }
}

impl From<Field> for Control {
    fn from(field: Field) -> Self {
        Control::Field(field)
    }
}

impl From<Group> for Control {
    fn from(group: Group) -> Self {
        Control::Group(group)
    }
}

impl From<RepeatableList> for Control {
    fn from(list: RepeatableList) -> Self {
        Control::List(list)
    }
}

/// Group-level rule evaluated against two named child fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRule {
    /// Both fields must hold the same value once neither is pristine.
    EmailMatch { email: String, confirm: String },
}

/// Named collection of controls, optionally carrying cross-field rules.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    children: Vec<(String, Control)>,
    rules: Vec<GroupRule>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Builder: add a child under `key`.
    pub fn with(mut self, key: impl Into<String>, control: impl Into<Control>) -> Result<Self> {
        self.insert(key, control)?;
        Ok(self)
    }

    /// Builder: attach a group rule. Both referenced keys must already be fields of
    /// this group.
    pub fn with_rule(mut self, rule: GroupRule) -> Result<Self> {
        match &rule {
            GroupRule::EmailMatch { email, confirm } => {
                for key in [email, confirm] {
                    match self.child(key) {
                        Some(Control::Field(_)) => {}
                        Some(_) => return Err(FormError::NotAField(self.child_path(key))),
                        None => return Err(FormError::UnknownField(self.child_path(key))),
                    }
                }
            }
        }
        self.rules.push(rule);
        Ok(self)
    }

    pub fn insert(&mut self, key: impl Into<String>, control: impl Into<Control>) -> Result<()> {
        let key = key.into();
        if self.children.iter().any(|(k, _)| *k == key) {
            return Err(FormError::DuplicateKey {
                group: self.name.clone(),
                key,
            });
        }
        self.children.push((key, control.into()));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[GroupRule] {
        &self.rules
    }

    /// Children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Control)> {
        self.children.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn child(&self, key: &str) -> Option<&Control> {
        self.children.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut Control> {
        self.children
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, c)| c)
    }

    /// Look up a control by dotted path.
    pub fn get(&self, path: &str) -> Option<&Control> {
        let (head, rest) = split_path(path);
        let control = self.child(head)?;
        match rest {
            None => Some(control),
            Some(rest) => match control {
                Control::Group(g) => g.get(rest),
                // List entries are fields, so only a trailing index is accepted.
                Control::List(_) | Control::Field(_) => None,
            },
        }
    }

    pub fn field(&self, path: &str) -> Result<&Field> {
        let (parent, last) = split_last(path);
        let container = match parent {
            Some(parent) => self
                .get(parent)
                .ok_or_else(|| FormError::UnknownField(path.to_string()))?,
            None => {
                return match self.child(last) {
                    Some(Control::Field(f)) => Ok(f),
                    Some(_) => Err(FormError::NotAField(path.to_string())),
                    None => Err(FormError::UnknownField(path.to_string())),
                };
            }
        };
        match container {
            Control::Group(g) => match g.child(last) {
                Some(Control::Field(f)) => Ok(f),
                Some(_) => Err(FormError::NotAField(path.to_string())),
                None => Err(FormError::UnknownField(path.to_string())),
            },
            Control::List(l) => last
                .parse::<usize>()
                .ok()
                .and_then(|i| l.get(i))
                .ok_or_else(|| FormError::UnknownField(path.to_string())),
            Control::Field(_) => Err(FormError::UnknownField(path.to_string())),
        }
    }

    pub fn field_mut(&mut self, path: &str) -> Result<&mut Field> {
        let (head, rest) = split_path(path);
        let control = self
            .child_mut(head)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        match (control, rest) {
            (Control::Field(f), None) => Ok(f),
            (Control::Group(g), Some(rest)) => g.field_mut(rest).map_err(|e| match e {
                FormError::UnknownField(_) => FormError::UnknownField(path.to_string()),
                FormError::NotAField(_) => FormError::NotAField(path.to_string()),
                other => other,
            }),
            (Control::List(l), Some(index)) => index
                .parse::<usize>()
                .ok()
                .and_then(|i| l.get_mut(i))
                .ok_or_else(|| FormError::UnknownField(path.to_string())),
            (Control::Group(_) | Control::List(_), None) => {
                Err(FormError::NotAField(path.to_string()))
            }
            (Control::Field(_), Some(_)) => Err(FormError::UnknownField(path.to_string())),
        }
    }

    pub fn group(&self, path: &str) -> Result<&Group> {
        match self.get(path) {
            Some(Control::Group(g)) => Ok(g),
            Some(_) => Err(FormError::UnknownField(path.to_string())),
            None => Err(FormError::UnknownField(path.to_string())),
        }
    }

    pub fn list(&self, path: &str) -> Result<&RepeatableList> {
        match self.get(path) {
            Some(Control::List(l)) => Ok(l),
            Some(_) => Err(FormError::NotAList(path.to_string())),
            None => Err(FormError::UnknownField(path.to_string())),
        }
    }

    pub fn list_mut(&mut self, path: &str) -> Result<&mut RepeatableList> {
        let (head, rest) = split_path(path);
        match (self.child_mut(head), rest) {
            (Some(Control::List(l)), None) => Ok(l),
            (Some(Control::Group(g)), Some(rest)) => g.list_mut(rest),
            (Some(_), _) => Err(FormError::NotAList(path.to_string())),
            (None, _) => Err(FormError::UnknownField(path.to_string())),
        }
    }

    /// Evaluate this group's own rules (not its children's).
    pub fn errors(&self) -> ErrorSet {
        let mut errors = ErrorSet::new();
        for rule in &self.rules {
            match rule {
                GroupRule::EmailMatch { email, confirm } => {
                    let (Some(Control::Field(email)), Some(Control::Field(confirm))) =
                        (self.child(email), self.child(confirm))
                    else {
                        continue;
                    };
                    if let Some(code) =
                        validation::email_match(email.snapshot(), confirm.snapshot())
                    {
                        errors.insert(code);
                    }
                }
            }
        }
        errors
    }

    /// Valid when the group rules pass and every descendant is valid.
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty() && self.children.iter().all(|(_, c)| c.is_valid())
    }

    /// Paths of every invalid field or group below this one.
    pub fn invalid_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_invalid("", &mut out);
        out
    }

    fn collect_invalid(&self, prefix: &str, out: &mut Vec<String>) {
        for (key, control) in &self.children {
            let path = join_path(prefix, key);
            match control {
                Control::Field(f) => {
                    if !f.is_valid() {
                        out.push(path);
                    }
                }
                Control::Group(g) => {
                    if !g.errors().is_empty() {
                        out.push(path.clone());
                    }
                    g.collect_invalid(&path, out);
                }
                Control::List(l) => {
                    for (i, f) in l.iter().enumerate() {
                        if !f.is_valid() {
                            out.push(format!("{path}.{i}"));
                        }
                    }
                }
            }
        }
    }

    /// Visit every field with its full path.
    pub fn for_each_field_mut(&mut self, f: &mut impl FnMut(&str, &mut Field)) {
        self.visit_fields_mut("", f);
    }

    fn visit_fields_mut(&mut self, prefix: &str, f: &mut impl FnMut(&str, &mut Field)) {
        for (key, control) in &mut self.children {
            let path = join_path(prefix, key);
            match control {
                Control::Field(field) => f(&path, field),
                Control::Group(g) => g.visit_fields_mut(&path, f),
                Control::List(l) => {
                    for (i, field) in l.iter_mut().enumerate() {
                        f(&format!("{path}.{i}"), field);
                    }
                }
            }
        }
    }

    pub fn mark_all_touched(&mut self) {
        self.for_each_field_mut(&mut |_: &str, field: &mut Field| field.touch());
    }

    /// Initial values everywhere, lists back to a single entry.
    pub fn reset(&mut self) {
        for (_, control) in &mut self.children {
            match control {
                Control::Field(f) => f.reset(),
                Control::Group(g) => g.reset(),
                Control::List(l) => l.reset(),
            }
        }
    }

    /// Current values as a JSON object mirroring the tree.
    pub fn to_json(&self) -> JsonValue {
        let mut map = JsonMap::new();
        for (key, control) in &self.children {
            map.insert(key.clone(), control.to_json());
        }
        JsonValue::Object(map)
    }

    fn child_path(&self, key: &str) -> String {
        join_path(&self.name, key)
    }
}

fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

fn split_last(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, path),
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

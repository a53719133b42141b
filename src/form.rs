//! In-memory document model the counter widget operates on.
//!
//! A [`Document`] owns forms; a [`Form`] owns its counter groups (each with at
//! most one numeric input) and the controls laid out in it. Control and group
//! ids are stable for the lifetime of the form.

use crate::errors::FormError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Left-hand button of a counter row, records a missed attempt.
    Miss,
    /// Right-hand button of a counter row, records a successful attempt.
    Success,
    Undo,
}

impl ControlKind {
    fn default_label(self) -> &'static str {
        match self {
            ControlKind::Miss => "-",
            ControlKind::Success => "+",
            ControlKind::Undo => "Undo",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Control {
    pub id: ControlId,
    pub kind: ControlKind,
    pub element_id: Option<String>,
    pub group: Option<GroupId>,
    pub disabled: bool,
    pub label: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct CounterGroup {
    pub id: GroupId,
    pub caption: String,
    pub input: Option<Input>,
}

#[derive(Debug, Clone)]
pub struct Form {
    id: String,
    groups: Vec<CounterGroup>,
    controls: Vec<Control>,
}

impl Form {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            groups: Vec::new(),
            controls: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Adds a counter row: one input flanked by an enabled miss and success
    /// control.
    pub fn add_counter(
        &mut self,
        caption: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> GroupId {
        self.push_counter(caption.into(), name.into(), value.into(), false)
    }

    /// Adds a counter row whose controls are disabled, as used for derived
    /// totals.
    pub fn add_readonly_counter(
        &mut self,
        caption: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> GroupId {
        self.push_counter(caption.into(), name.into(), value.into(), true)
    }

    fn push_counter(&mut self, caption: String, name: String, value: String, disabled: bool) -> GroupId {
        let group = self.add_group(caption, Some(Input { name, value }));
        self.add_control(ControlKind::Miss, Some(group), disabled);
        self.add_control(ControlKind::Success, Some(group), disabled);
        group
    }

    pub fn add_group(&mut self, caption: impl Into<String>, input: Option<Input>) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(CounterGroup {
            id,
            caption: caption.into(),
            input,
        });
        id
    }

    pub fn add_control(&mut self, kind: ControlKind, group: Option<GroupId>, disabled: bool) -> ControlId {
        let id = ControlId(self.controls.len());
        self.controls.push(Control {
            id,
            kind,
            element_id: None,
            group,
            disabled,
            label: kind.default_label().to_owned(),
            title: None,
        });
        id
    }

    /// Undo controls may share an element id; every one of them is a
    /// separate control.
    pub fn add_undo(&mut self, element_id: impl Into<String>) -> ControlId {
        let id = self.add_control(ControlKind::Undo, None, false);
        self.controls[id.0].element_id = Some(element_id.into());
        id
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id.0)
    }

    pub fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.get_mut(id.0)
    }

    pub fn controls_of(&self, kind: ControlKind) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(move |control| control.kind == kind)
    }

    pub fn controls_with_element_id<'a>(&'a self, element_id: &'a str) -> impl Iterator<Item = &'a Control> {
        self.controls
            .iter()
            .filter(move |control| control.element_id.as_deref() == Some(element_id))
    }

    pub fn groups(&self) -> &[CounterGroup] {
        &self.groups
    }

    pub fn group_controls(&self, group: GroupId) -> impl Iterator<Item = &Control> {
        self.controls
            .iter()
            .filter(move |control| control.group == Some(group))
    }

    /// Name of the input sharing a counter group with `control`.
    pub fn sibling_input_name(&self, control: ControlId) -> Result<&str, FormError> {
        let control = self
            .control(control)
            .ok_or_else(|| FormError::MissingElement(format!("control {}", control.0)))?;
        control
            .group
            .and_then(|group| self.groups.get(group.0))
            .and_then(|group| group.input.as_ref())
            .map(|input| input.name.as_str())
            .ok_or_else(|| FormError::MissingElement(format!("input next to control {}", control.id.0)))
    }

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.groups
            .iter()
            .filter_map(|group| group.input.as_ref())
            .find(|input| input.name == name)
    }

    pub fn input_mut(&mut self, name: &str) -> Option<&mut Input> {
        self.groups
            .iter_mut()
            .filter_map(|group| group.input.as_mut())
            .find(|input| input.name == name)
    }

    pub fn remove_input(&mut self, name: &str) -> Option<Input> {
        self.groups
            .iter_mut()
            .find(|group| group.input.as_ref().is_some_and(|input| input.name == name))
            .and_then(|group| group.input.take())
    }

    pub fn read_counter(&self, name: &str) -> Result<i64, FormError> {
        let input = self
            .input(name)
            .ok_or_else(|| FormError::MissingElement(format!("input {name}")))?;
        parse_counter(&input.value).ok_or_else(|| FormError::InvalidValue {
            name: name.to_owned(),
            value: input.value.clone(),
        })
    }

    pub fn write_counter(&mut self, name: &str, value: i64) -> Result<(), FormError> {
        let input = self
            .input_mut(name)
            .ok_or_else(|| FormError::MissingElement(format!("input {name}")))?;
        input.value = value.to_string();
        Ok(())
    }
}

/// Reads the leading integer of a stored value, the way browsers read
/// numeric form fields: surrounding whitespace and trailing junk are
/// ignored, an empty or non-numeric prefix yields `None`.
pub fn parse_counter(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..sign_len + digits_len].parse().ok()
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    forms: Vec<Form>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: Form) -> Self {
        Self { forms: vec![form] }
    }

    pub fn insert(&mut self, form: Form) {
        self.forms.retain(|existing| existing.id != form.id);
        self.forms.push(form);
    }

    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.iter().find(|form| form.id == id)
    }

    pub fn form_mut(&mut self, id: &str) -> Option<&mut Form> {
        self.forms.iter_mut().find(|form| form.id == id)
    }
}

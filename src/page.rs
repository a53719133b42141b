use crate::controller::{ClickOutcome, CYCLES_FIELD, SUCCESSFUL_CYCLES_FIELD};
use crate::errors::FormError;
use crate::form::{ControlId, ControlKind, Document, Form, GroupId};
use crate::layout::{scouting_form, FORM_ID};
use crate::models::{ControlView, CounterView, FormSnapshot, UndoView};
use crate::registry::ControllerRegistry;

/// One loaded scouting page: the document and the controllers bound to it.
/// Reloading discards both, so counters, totals and undo history start over.
#[derive(Debug)]
pub struct ScoutPage {
    document: Document,
    controllers: ControllerRegistry,
}

impl ScoutPage {
    pub fn load() -> Self {
        Self::with_document(Document::with_form(scouting_form()))
    }

    pub fn with_document(mut document: Document) -> Self {
        let mut controllers = ControllerRegistry::new();
        controllers.initialize(&mut document, FORM_ID);
        Self {
            document,
            controllers,
        }
    }

    pub fn reload(&mut self) {
        *self = Self::load();
    }

    pub fn form(&self) -> Result<&Form, FormError> {
        self.document
            .form(FORM_ID)
            .ok_or_else(|| FormError::MissingElement(format!("form {FORM_ID}")))
    }

    /// Clicks a control on the scouting form. Errors only when the control
    /// does not exist; inert controls yield [`ClickOutcome::Ignored`].
    pub fn click(&mut self, control: ControlId) -> Result<ClickOutcome, FormError> {
        if self.form()?.control(control).is_none() {
            return Err(FormError::MissingElement(format!("control {}", control.0)));
        }
        Ok(self
            .controllers
            .dispatch_click(&mut self.document, FORM_ID, control))
    }

    pub fn snapshot(&self) -> Result<FormSnapshot, FormError> {
        let form = self.form()?;
        let controller = self.controllers.get(FORM_ID);

        let control_view = |group: GroupId, kind: ControlKind| {
            form.group_controls(group)
                .find(|control| control.kind == kind)
                .map(|control| ControlView {
                    id: control.id,
                    label: control.label.clone(),
                    title: control.title.clone(),
                    disabled: control.disabled,
                })
        };
        let counters = form
            .groups()
            .iter()
            .map(|group| {
                let name = group.input.as_ref().map(|input| input.name.clone());
                CounterView {
                    caption: group.caption.clone(),
                    value: name
                        .as_deref()
                        .and_then(|name| form.read_counter(name).ok())
                        .unwrap_or(0),
                    name,
                    miss: control_view(group.id, ControlKind::Miss),
                    success: control_view(group.id, ControlKind::Success),
                }
            })
            .collect();

        let totals = controller.map(|controller| controller.totals()).unwrap_or_default();
        Ok(FormSnapshot {
            form_id: form.id().to_owned(),
            counters,
            undo_controls: controller
                .map(|controller| controller.undo_controls())
                .unwrap_or_default()
                .iter()
                .filter_map(|id| form.control(*id))
                .map(|control| UndoView {
                    id: control.id,
                    element_id: control.element_id.clone(),
                    label: control.label.clone(),
                })
                .collect(),
            total_missed: totals.missed,
            total_successful: totals.successful,
            cycles: form.read_counter(CYCLES_FIELD).unwrap_or(0),
            successful_cycles: form.read_counter(SUCCESSFUL_CYCLES_FIELD).unwrap_or(0),
            history_len: controller.map_or(0, |controller| controller.history().len()),
            last_action: controller.and_then(|controller| controller.history().last().cloned()),
        })
    }
}

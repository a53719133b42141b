use crate::controller::{ClickOutcome, CounterFormController};
use crate::form::{ControlId, Document};
use std::collections::{hash_map::Entry, HashMap};
use tracing::{debug, info};

/// Active counter controllers, at most one per form.
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, CounterFormController>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the controller bound to `form_id`, creating it on first use.
    /// `None` when the document has no such form.
    pub fn initialize(&mut self, document: &mut Document, form_id: &str) -> Option<&mut CounterFormController> {
        match self.controllers.entry(form_id.to_owned()) {
            Entry::Occupied(entry) => {
                debug!(form_id, "reusing existing counter controller");
                Some(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let controller = CounterFormController::new(document, form_id)?;
                info!(form_id, "counter controller attached");
                Some(entry.insert(controller))
            }
        }
    }

    pub fn get(&self, form_id: &str) -> Option<&CounterFormController> {
        self.controllers.get(form_id)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Routes a click on `control` in `form_id` to that form's controller.
    pub fn dispatch_click(&mut self, document: &mut Document, form_id: &str, control: ControlId) -> ClickOutcome {
        let (Some(controller), Some(form)) = (self.controllers.get_mut(form_id), document.form_mut(form_id)) else {
            return ClickOutcome::Ignored;
        };
        controller.handle_click(form, control)
    }
}

//! Counter widget bound to one scouting form.
//!
//! Miss and success controls increment the numeric input in their counter
//! group. Counters named with [`CATEGORY_PREFIX`] also feed the running
//! totals mirrored into [`CYCLES_FIELD`] and [`SUCCESSFUL_CYCLES_FIELD`].
//! Every increment is logged so undo can revert it, one step at a time.

use crate::form::{ControlId, ControlKind, Document, Form};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const CATEGORY_PREFIX: &str = "teleop_";
pub const CYCLES_FIELD: &str = "teleop_cycles";
pub const SUCCESSFUL_CYCLES_FIELD: &str = "teleop_successful_cycles";
/// Element id shared by every undo control on the form.
pub const UNDO_BUTTON_ID: &str = "undoButton";

const MISSED_MARKER: &str = "_missed";

pub const MISS_LABEL: &str = "M";
pub const MISS_TITLE: &str = "Missed Attempt";
pub const SUCCESS_LABEL: &str = "S";
pub const SUCCESS_TITLE: &str = "Successful Attempt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attempt {
    Missed,
    Successful,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunningTotals {
    pub missed: u64,
    pub successful: u64,
}

impl RunningTotals {
    pub fn cycles(&self) -> u64 {
        self.missed.saturating_add(self.successful)
    }

    fn record(&mut self, attempt: Attempt) {
        match attempt {
            Attempt::Missed => self.missed = self.missed.saturating_add(1),
            Attempt::Successful => self.successful = self.successful.saturating_add(1),
        }
    }

    fn revert(&mut self, attempt: Attempt, diff: u64) {
        match attempt {
            Attempt::Missed => self.missed = self.missed.saturating_sub(diff),
            Attempt::Successful => self.successful = self.successful.saturating_sub(diff),
        }
    }
}

/// One increment, as recorded for undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    pub input_name: String,
    pub old_value: i64,
    pub new_value: i64,
    /// Type of the control that produced the increment. This alone decides
    /// which running total an undo reverts.
    pub attempt: Attempt,
}

impl ActionRecord {
    pub fn is_missed(&self) -> bool {
        self.attempt == Attempt::Missed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClickOutcome {
    /// Unbound or disabled control, aggregate row, or a row without input.
    Ignored,
    Incremented { action: ActionRecord },
    Undone { action: ActionRecord },
    /// The popped record's input is gone; the record is discarded.
    Dropped { action: ActionRecord },
    NothingToUndo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Increment(Attempt),
    Undo,
}

pub fn is_aggregate(name: &str) -> bool {
    name == CYCLES_FIELD || name == SUCCESSFUL_CYCLES_FIELD
}

fn counts_toward_totals(name: &str) -> bool {
    name.starts_with(CATEGORY_PREFIX)
}

#[derive(Debug)]
pub struct CounterFormController {
    form_id: String,
    miss_controls: Vec<ControlId>,
    success_controls: Vec<ControlId>,
    undo_controls: Vec<ControlId>,
    bound: HashMap<ControlId, Binding>,
    initialized: bool,
    totals: RunningTotals,
    history: Vec<ActionRecord>,
}

impl CounterFormController {
    /// Builds a controller for the form with `form_id`, or `None` when the
    /// document has no such form.
    pub fn new(document: &mut Document, form_id: &str) -> Option<Self> {
        let Some(form) = document.form_mut(form_id) else {
            debug!(form_id, "form not found, controller not created");
            return None;
        };
        Some(Self::attach(form))
    }

    pub fn attach(form: &mut Form) -> Self {
        let ids = |kind: ControlKind| form.controls_of(kind).map(|control| control.id).collect::<Vec<_>>();
        let mut controller = Self {
            form_id: form.id().to_owned(),
            miss_controls: ids(ControlKind::Miss),
            success_controls: ids(ControlKind::Success),
            undo_controls: form
                .controls_with_element_id(UNDO_BUTTON_ID)
                .map(|control| control.id)
                .collect(),
            bound: HashMap::new(),
            initialized: false,
            totals: RunningTotals::default(),
            history: Vec::new(),
        };
        controller.init(form);
        controller
    }

    /// Labels and binds the discovered controls. Runs once; later calls are
    /// no-ops.
    pub fn init(&mut self, form: &mut Form) {
        if self.initialized {
            debug!(form_id = %self.form_id, "form already initialized");
            return;
        }
        self.setup_labels(form);
        self.bind_counter_controls(form);
        self.bind_undo_controls();
        self.initialized = true;
        debug!(
            form_id = %self.form_id,
            bound = self.bound.len(),
            "counter form initialized"
        );
    }

    fn setup_labels(&self, form: &mut Form) {
        let labels = [
            (&self.miss_controls, MISS_LABEL, MISS_TITLE),
            (&self.success_controls, SUCCESS_LABEL, SUCCESS_TITLE),
        ];
        for (controls, label, title) in labels {
            for id in controls {
                if let Some(control) = form.control_mut(*id).filter(|control| !control.disabled) {
                    control.label = label.to_owned();
                    control.title = Some(title.to_owned());
                }
            }
        }
    }

    fn bind_counter_controls(&mut self, form: &Form) {
        let controls = self
            .miss_controls
            .iter()
            .map(|id| (*id, Attempt::Missed))
            .chain(self.success_controls.iter().map(|id| (*id, Attempt::Successful)))
            .collect::<Vec<_>>();
        for (id, attempt) in controls {
            if form.control(id).is_none_or(|control| control.disabled) {
                continue;
            }
            self.bound.entry(id).or_insert(Binding::Increment(attempt));
        }
    }

    fn bind_undo_controls(&mut self) {
        for id in &self.undo_controls {
            self.bound.entry(*id).or_insert(Binding::Undo);
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn is_bound(&self, control: ControlId) -> bool {
        self.bound.contains_key(&control)
    }

    pub fn totals(&self) -> RunningTotals {
        self.totals
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    pub fn undo_controls(&self) -> &[ControlId] {
        &self.undo_controls
    }

    /// Runs the handler bound to `control`, if any.
    pub fn handle_click(&mut self, form: &mut Form, control: ControlId) -> ClickOutcome {
        if form.control(control).is_none_or(|control| control.disabled) {
            return ClickOutcome::Ignored;
        }
        match self.bound.get(&control).copied() {
            Some(Binding::Increment(attempt)) => self.increment(form, control, attempt),
            Some(Binding::Undo) => self.undo(form),
            None => ClickOutcome::Ignored,
        }
    }

    fn increment(&mut self, form: &mut Form, control: ControlId, attempt: Attempt) -> ClickOutcome {
        let name = match form.sibling_input_name(control) {
            Ok(name) => name.to_owned(),
            Err(err) => {
                debug!(%err, "click ignored");
                return ClickOutcome::Ignored;
            }
        };
        if is_aggregate(&name) {
            return ClickOutcome::Ignored;
        }

        let old_value = form.read_counter(&name).unwrap_or_else(|err| {
            debug!(%err, "reading counter as zero");
            0
        });
        let new_value = old_value.saturating_add(1);
        if let Err(err) = form.write_counter(&name, new_value) {
            debug!(%err, "click ignored");
            return ClickOutcome::Ignored;
        }

        if counts_toward_totals(&name) {
            self.totals.record(attempt);
            self.sync_aggregates(form);
        }

        if name.contains(MISSED_MARKER) && attempt == Attempt::Successful {
            warn!(
                input = %name,
                "success recorded on an input named as missed; undo will revert the successful total"
            );
        }

        let action = ActionRecord {
            input_name: name,
            old_value,
            new_value,
            attempt,
        };
        self.history.push(action.clone());
        ClickOutcome::Incremented { action }
    }

    /// Reverts the most recent increment.
    pub fn undo(&mut self, form: &mut Form) -> ClickOutcome {
        let Some(action) = self.history.pop() else {
            return ClickOutcome::NothingToUndo;
        };

        if let Err(err) = form.write_counter(&action.input_name, action.old_value) {
            debug!(%err, "undo dropped");
            return ClickOutcome::Dropped { action };
        }

        if counts_toward_totals(&action.input_name) {
            let diff = action.new_value.saturating_sub(action.old_value).max(0) as u64;
            self.totals.revert(action.attempt, diff);
            self.sync_aggregates(form);
        }

        ClickOutcome::Undone { action }
    }

    fn sync_aggregates(&self, form: &mut Form) {
        let values = [
            (CYCLES_FIELD, self.totals.cycles()),
            (SUCCESSFUL_CYCLES_FIELD, self.totals.successful),
        ];
        for (name, value) in values {
            let value = i64::try_from(value).unwrap_or(i64::MAX);
            if let Err(err) = form.write_counter(name, value) {
                debug!(%err, "aggregate field skipped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{ControlId, GroupId};

    struct Row {
        miss: ControlId,
        success: ControlId,
    }

    fn row(form: &Form, group: GroupId) -> Row {
        let mut controls = form.group_controls(group);
        let miss = controls.next().expect("miss control").id;
        let success = controls.next().expect("success control").id;
        Row { miss, success }
    }

    fn teleop_form() -> (Form, Row, Row, ControlId) {
        let mut form = Form::new("scout-form");
        let undo = form.add_undo(UNDO_BUTTON_ID);
        let l4 = form.add_counter("L4", "teleop_l4_branch_successful", "0");
        let auto = form.add_counter("Auto L4", "auto_l4_branch_successful", "0");
        form.add_readonly_counter("Cycles", CYCLES_FIELD, "0");
        form.add_readonly_counter("Successful", SUCCESSFUL_CYCLES_FIELD, "0");
        let l4 = row(&form, l4);
        let auto = row(&form, auto);
        (form, l4, auto, undo)
    }

    fn value(form: &Form, name: &str) -> i64 {
        form.read_counter(name).expect("counter value")
    }

    fn assert_aggregates(form: &Form, controller: &CounterFormController) {
        let totals = controller.totals();
        assert_eq!(value(form, CYCLES_FIELD) as u64, totals.missed + totals.successful);
        assert_eq!(value(form, SUCCESSFUL_CYCLES_FIELD) as u64, totals.successful);
    }

    #[test]
    fn enabled_controls_are_labelled_disabled_ones_untouched() {
        let (mut form, l4, _, _) = teleop_form();
        CounterFormController::attach(&mut form);

        let miss = form.control(l4.miss).unwrap();
        assert_eq!(miss.label, MISS_LABEL);
        assert_eq!(miss.title.as_deref(), Some(MISS_TITLE));
        let success = form.control(l4.success).unwrap();
        assert_eq!(success.label, SUCCESS_LABEL);
        assert_eq!(success.title.as_deref(), Some(SUCCESS_TITLE));

        for control in form.controls().iter().filter(|control| control.disabled) {
            assert!(control.label == "-" || control.label == "+");
            assert!(control.title.is_none());
        }
    }

    #[test]
    fn disabled_controls_are_not_bound() {
        let (mut form, _, _, _) = teleop_form();
        let mut controller = CounterFormController::attach(&mut form);
        let disabled: Vec<_> = form
            .controls()
            .iter()
            .filter(|control| control.disabled)
            .map(|control| control.id)
            .collect();
        assert_eq!(disabled.len(), 4);
        for id in disabled {
            assert!(!controller.is_bound(id));
            assert_eq!(controller.handle_click(&mut form, id), ClickOutcome::Ignored);
        }
    }

    #[test]
    fn success_clicks_then_miss_then_undo() {
        let (mut form, l4, _, undo) = teleop_form();
        let mut controller = CounterFormController::attach(&mut form);

        for _ in 0..3 {
            controller.handle_click(&mut form, l4.success);
            assert_aggregates(&form, &controller);
        }
        assert_eq!(value(&form, "teleop_l4_branch_successful"), 3);
        assert_eq!(controller.totals().successful, 3);
        assert_eq!(value(&form, CYCLES_FIELD), 3);
        assert_eq!(value(&form, SUCCESSFUL_CYCLES_FIELD), 3);

        controller.handle_click(&mut form, l4.miss);
        assert_eq!(value(&form, "teleop_l4_branch_successful"), 4);
        assert_eq!(controller.totals().missed, 1);
        assert_eq!(value(&form, CYCLES_FIELD), 4);
        assert_eq!(value(&form, SUCCESSFUL_CYCLES_FIELD), 3);

        let outcome = controller.handle_click(&mut form, undo);
        let ClickOutcome::Undone { action } = &outcome else {
            panic!("expected undo, got {outcome:?}");
        };
        assert!(action.is_missed());
        assert_eq!(controller.totals().missed, 0);
        assert_eq!(value(&form, CYCLES_FIELD), 3);
        assert_eq!(value(&form, "teleop_l4_branch_successful"), 3);
        assert_aggregates(&form, &controller);
    }

    #[test]
    fn undo_is_inverse_of_increment_for_every_counter() {
        let (mut form, l4, auto, undo) = teleop_form();
        let mut controller = CounterFormController::attach(&mut form);
        controller.handle_click(&mut form, l4.success);
        controller.handle_click(&mut form, auto.miss);

        for control in [l4.miss, l4.success, auto.miss, auto.success] {
            let before_form = form.clone();
            let before_totals = controller.totals();

            assert!(matches!(
                controller.handle_click(&mut form, control),
                ClickOutcome::Incremented { .. }
            ));
            controller.handle_click(&mut form, undo);

            assert_eq!(controller.totals(), before_totals);
            for group in before_form.groups() {
                let input = group.input.as_ref().unwrap();
                assert_eq!(form.input(&input.name), Some(input));
            }
        }
    }

    #[test]
    fn counters_outside_the_category_do_not_touch_totals() {
        let (mut form, _, auto, _) = teleop_form();
        let mut controller = CounterFormController::attach(&mut form);

        controller.handle_click(&mut form, auto.success);
        controller.handle_click(&mut form, auto.miss);

        assert_eq!(value(&form, "auto_l4_branch_successful"), 2);
        assert_eq!(controller.totals(), RunningTotals::default());
        assert_eq!(value(&form, CYCLES_FIELD), 0);
        assert_eq!(controller.history().len(), 2);
    }

    #[test]
    fn history_exhaustion_leaves_state_unchanged() {
        let (mut form, l4, _, undo) = teleop_form();
        let mut controller = CounterFormController::attach(&mut form);
        controller.handle_click(&mut form, l4.success);
        controller.handle_click(&mut form, l4.miss);

        controller.undo(&mut form);
        controller.undo(&mut form);
        let snapshot = form.clone();
        for _ in 0..3 {
            assert_eq!(controller.handle_click(&mut form, undo), ClickOutcome::NothingToUndo);
        }
        assert_eq!(controller.totals(), RunningTotals::default());
        assert_eq!(
            form.input("teleop_l4_branch_successful"),
            snapshot.input("teleop_l4_branch_successful")
        );
        assert_eq!(value(&form, CYCLES_FIELD), 0);
    }

    #[test]
    fn aggregate_rows_are_not_clickable() {
        let mut form = Form::new("scout-form");
        let cycles = form.add_counter("Cycles", CYCLES_FIELD, "5");
        let cycles = row(&form, cycles);
        let mut controller = CounterFormController::attach(&mut form);

        assert!(controller.is_bound(cycles.success));
        assert_eq!(controller.handle_click(&mut form, cycles.success), ClickOutcome::Ignored);
        assert_eq!(controller.handle_click(&mut form, cycles.miss), ClickOutcome::Ignored);
        assert_eq!(value(&form, CYCLES_FIELD), 5);
        assert!(controller.history().is_empty());
    }

    #[test]
    fn non_numeric_values_read_as_zero() {
        let mut form = Form::new("scout-form");
        let group = form.add_counter("Net", "teleop_net_successful", "oops");
        let net = row(&form, group);
        let mut controller = CounterFormController::attach(&mut form);

        let outcome = controller.handle_click(&mut form, net.success);
        let ClickOutcome::Incremented { action } = &outcome else {
            panic!("expected increment, got {outcome:?}");
        };
        assert_eq!((action.old_value, action.new_value), (0, 1));
        assert_eq!(value(&form, "teleop_net_successful"), 1);
    }

    #[test]
    fn markup_values_are_the_starting_point() {
        let mut form = Form::new("scout-form");
        let group = form.add_counter("Net", "auto_net_successful", "4");
        let net = row(&form, group);
        let mut controller = CounterFormController::attach(&mut form);

        controller.handle_click(&mut form, net.miss);
        assert_eq!(value(&form, "auto_net_successful"), 5);
        controller.undo(&mut form);
        assert_eq!(value(&form, "auto_net_successful"), 4);
    }

    #[test]
    fn row_without_input_is_ignored() {
        let mut form = Form::new("scout-form");
        let group = form.add_group("Empty", None);
        let control = form.add_control(ControlKind::Success, Some(group), false);
        let mut controller = CounterFormController::attach(&mut form);

        assert_eq!(controller.handle_click(&mut form, control), ClickOutcome::Ignored);
        assert!(controller.history().is_empty());
    }

    #[test]
    fn undo_of_removed_input_drops_the_record() {
        let (mut form, l4, auto, _) = teleop_form();
        let mut controller = CounterFormController::attach(&mut form);
        controller.handle_click(&mut form, auto.success);
        controller.handle_click(&mut form, l4.success);
        form.remove_input("teleop_l4_branch_successful");

        assert!(matches!(controller.undo(&mut form), ClickOutcome::Dropped { .. }));
        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.totals().successful, 1);

        assert!(matches!(controller.undo(&mut form), ClickOutcome::Undone { .. }));
        assert_eq!(value(&form, "auto_l4_branch_successful"), 0);
    }

    #[test]
    fn control_type_decides_which_total_undo_reverts() {
        let mut form = Form::new("scout-form");
        let group = form.add_counter("Missed L4", "teleop_l4_missed", "0");
        form.add_readonly_counter("Cycles", CYCLES_FIELD, "0");
        form.add_readonly_counter("Successful", SUCCESSFUL_CYCLES_FIELD, "0");
        let missed = row(&form, group);
        let mut controller = CounterFormController::attach(&mut form);

        controller.handle_click(&mut form, missed.success);
        assert!(!controller.history()[0].is_missed());
        controller.undo(&mut form);

        assert_eq!(controller.totals(), RunningTotals::default());
        assert_aggregates(&form, &controller);
    }

    #[test]
    fn init_twice_binds_each_control_once() {
        let (mut form, l4, _, _) = teleop_form();
        let mut controller = CounterFormController::attach(&mut form);
        controller.init(&mut form);
        controller.bind_counter_controls(&form);
        controller.bind_undo_controls();

        for clicks in 1..=5 {
            controller.handle_click(&mut form, l4.success);
            assert_eq!(value(&form, "teleop_l4_branch_successful"), clicks);
            assert_eq!(controller.history().len(), clicks as usize);
        }
    }

    #[test]
    fn undo_controls_are_found_by_shared_element_id() {
        let (mut form, l4, _, top) = teleop_form();
        let bottom = form.add_undo(UNDO_BUTTON_ID);
        let stray = form.add_undo("resetButton");
        let mut controller = CounterFormController::attach(&mut form);

        assert_eq!(controller.undo_controls(), &[top, bottom]);
        assert!(!controller.is_bound(stray));

        controller.handle_click(&mut form, l4.success);
        assert_eq!(controller.handle_click(&mut form, stray), ClickOutcome::Ignored);
        assert_eq!(controller.history().len(), 1);
        assert!(matches!(
            controller.handle_click(&mut form, bottom),
            ClickOutcome::Undone { .. }
        ));
        assert!(controller.history().is_empty());
    }

    #[test]
    fn control_disabled_after_binding_ignores_clicks() {
        let (mut form, l4, _, _) = teleop_form();
        let mut controller = CounterFormController::attach(&mut form);
        controller.handle_click(&mut form, l4.success);
        assert!(controller.is_bound(l4.success));

        form.control_mut(l4.success).unwrap().disabled = true;
        assert_eq!(controller.handle_click(&mut form, l4.success), ClickOutcome::Ignored);
        assert_eq!(controller.history().len(), 1);
        assert_eq!(value(&form, "teleop_l4_branch_successful"), 1);
        assert_eq!(controller.totals().successful, 1);
    }

    #[test]
    fn missing_form_creates_no_controller() {
        let mut document = Document::new();
        assert!(CounterFormController::new(&mut document, "scout-form").is_none());
    }

    #[test]
    fn totals_absent_from_form_are_skipped() {
        let mut form = Form::new("scout-form");
        let group = form.add_counter("Net", "teleop_net_successful", "0");
        let net = row(&form, group);
        let mut controller = CounterFormController::attach(&mut form);

        controller.handle_click(&mut form, net.success);
        assert_eq!(controller.totals().successful, 1);
        assert!(form.input(CYCLES_FIELD).is_none());
    }
}

use crate::controller::{CYCLES_FIELD, SUCCESSFUL_CYCLES_FIELD};
pub use crate::controller::UNDO_BUTTON_ID;
use crate::form::Form;

pub const FORM_ID: &str = "scout-form";

/// Scoring locations shared by the auto and teleop phases, as
/// `(field key, caption)`.
pub const LOCATIONS: [(&str, &str); 5] = [
    ("l4_branch", "L4 Branch"),
    ("l3_branch", "L3 Branch"),
    ("l2_branch", "L2 Branch"),
    ("l1_trough", "L1 Trough"),
    ("net", "Net"),
];

pub fn counter_name(phase: &str, location: &str) -> String {
    format!("{phase}_{location}_successful")
}

/// The scouting form as served to scouts: one undo control above and one
/// below the counters, auto and teleop rows, then the derived cycle totals.
pub fn scouting_form() -> Form {
    let mut form = Form::new(FORM_ID);
    form.add_undo(UNDO_BUTTON_ID);

    for (phase, title) in [("auto", "Auto"), ("teleop", "Teleop")] {
        for (location, caption) in LOCATIONS {
            form.add_counter(format!("{title} {caption}"), counter_name(phase, location), "0");
        }
    }

    form.add_readonly_counter("Teleop Cycles", CYCLES_FIELD, "0");
    form.add_readonly_counter("Successful Cycles", SUCCESSFUL_CYCLES_FIELD, "0");
    form.add_undo(UNDO_BUTTON_ID);
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ControlKind;

    #[test]
    fn scouting_form_has_two_undo_controls_sharing_an_id() {
        let form = scouting_form();
        assert_eq!(form.controls_with_element_id(UNDO_BUTTON_ID).count(), 2);
        assert_eq!(form.controls_of(ControlKind::Undo).count(), 2);
    }

    #[test]
    fn scouting_form_rows() {
        let form = scouting_form();
        assert_eq!(form.groups().len(), 12);
        assert!(form.input("auto_l1_trough_successful").is_some());
        assert!(form.input("teleop_net_successful").is_some());
        let disabled = form.controls().iter().filter(|control| control.disabled).count();
        assert_eq!(disabled, 4);
    }
}

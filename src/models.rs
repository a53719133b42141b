use crate::controller::{ActionRecord, ClickOutcome};
use crate::form::ControlId;
use crate::report::Report;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub reports: Vec<Report>,
}

#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub control: ControlId,
}

/// Header and free-text fields of a report submission. Counter values come
/// from the page's form, not from the request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitRequest {
    pub team_number: Option<String>,
    pub team_name: Option<String>,
    pub event: Option<String>,
    pub scout_name: Option<String>,
    pub match_number: Option<String>,
    pub auto_move: Option<String>,
    pub auto_notes: Option<String>,
    pub teleop_processor: Option<String>,
    pub teleop_notes: Option<String>,
    pub endgame_park: Option<String>,
    pub endgame_deep_climb: Option<String>,
    pub endgame_shallow_climb: Option<String>,
    pub endgame_notes: Option<String>,
    pub additional_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlView {
    pub id: ControlId,
    pub label: String,
    pub title: Option<String>,
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UndoView {
    pub id: ControlId,
    pub element_id: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CounterView {
    pub caption: String,
    pub name: Option<String>,
    pub value: i64,
    pub miss: Option<ControlView>,
    pub success: Option<ControlView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub form_id: String,
    pub counters: Vec<CounterView>,
    pub undo_controls: Vec<UndoView>,
    pub total_missed: u64,
    pub total_successful: u64,
    pub cycles: i64,
    pub successful_cycles: i64,
    pub history_len: usize,
    pub last_action: Option<ActionRecord>,
}

#[derive(Debug, Serialize)]
pub struct ClickResponse {
    #[serde(flatten)]
    pub outcome: ClickOutcome,
    pub form: FormSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub team_number: String,
    pub match_number: String,
    pub timestamp: String,
    pub total_score: i64,
    pub report: Report,
}

impl From<Report> for ReportSummary {
    fn from(report: Report) -> Self {
        Self {
            team_number: report.team_number.clone(),
            match_number: report.match_number.clone(),
            timestamp: report.timestamp.clone(),
            total_score: report.total_score(),
            report,
        }
    }
}

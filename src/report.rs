use crate::controller::{CYCLES_FIELD, SUCCESSFUL_CYCLES_FIELD};
use crate::form::Form;
use crate::layout::counter_name;
use crate::models::SubmitRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
struct Points {
    l4: i64,
    l3: i64,
    l2: i64,
    l1: i64,
    net: i64,
}

const AUTO_POINTS: Points = Points { l4: 7, l3: 6, l2: 4, l1: 3, net: 4 };
const TELEOP_POINTS: Points = Points { l4: 5, l3: 4, l2: 3, l1: 2, net: 4 };

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoring {
    pub l4_branch_successful: i64,
    pub l3_branch_successful: i64,
    pub l2_branch_successful: i64,
    pub l1_trough_successful: i64,
    pub net_successful: i64,
}

impl Scoring {
    /// Reads one phase's counters; missing or unreadable values count as 0.
    pub fn from_form(form: &Form, phase: &str) -> Self {
        let read = |location| form.read_counter(&counter_name(phase, location)).unwrap_or(0);
        Self {
            l4_branch_successful: read("l4_branch"),
            l3_branch_successful: read("l3_branch"),
            l2_branch_successful: read("l2_branch"),
            l1_trough_successful: read("l1_trough"),
            net_successful: read("net"),
        }
    }

    pub fn coral_count(&self) -> i64 {
        self.l4_branch_successful
            + self.l3_branch_successful
            + self.l2_branch_successful
            + self.l1_trough_successful
            + self.net_successful
    }

    fn score(&self, points: Points) -> i64 {
        self.l4_branch_successful * points.l4
            + self.l3_branch_successful * points.l3
            + self.l2_branch_successful * points.l2
            + self.l1_trough_successful * points.l1
            + self.net_successful * points.net
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Autonomous {
    #[serde(rename = "move")]
    pub moved: String,
    pub coral_count: i64,
    pub score: i64,
    pub scoring: Scoring,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Teleop {
    pub coral_count: i64,
    pub score: i64,
    pub cycles: i64,
    pub successful_cycles: i64,
    pub processor: String,
    pub scoring: Scoring,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndgamePosition {
    #[default]
    None,
    Park,
    ShallowClimb,
    DeepClimb,
}

impl EndgamePosition {
    /// Park wins over a deep climb, which wins over a shallow climb.
    pub fn from_flags(park: bool, deep_climb: bool, shallow_climb: bool) -> Self {
        if park {
            Self::Park
        } else if deep_climb {
            Self::DeepClimb
        } else if shallow_climb {
            Self::ShallowClimb
        } else {
            Self::None
        }
    }

    pub fn points(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Park => 2,
            Self::ShallowClimb => 6,
            Self::DeepClimb => 12,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endgame {
    pub position: EndgamePosition,
    pub score: i64,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub team_number: String,
    pub team_name: String,
    pub event: String,
    pub scout_name: String,
    pub match_number: String,
    pub timestamp: String,
    pub autonomous: Autonomous,
    pub teleop: Teleop,
    pub endgame: Endgame,
    pub additional_notes: String,
}

fn is_yes(flag: &Option<String>) -> bool {
    flag.as_deref().is_some_and(|value| value.trim().eq_ignore_ascii_case("yes"))
}

fn text(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_owned()
}

impl Report {
    /// Builds a scored report from the submitted fields and the counter
    /// values currently on `form`.
    pub fn from_submission(request: &SubmitRequest, form: &Form, timestamp: String) -> Self {
        let mut report = Self {
            team_number: text(&request.team_number),
            team_name: text(&request.team_name),
            event: text(&request.event),
            scout_name: text(&request.scout_name),
            match_number: text(&request.match_number),
            timestamp,
            autonomous: Autonomous {
                moved: text(&request.auto_move),
                scoring: Scoring::from_form(form, "auto"),
                notes: text(&request.auto_notes),
                ..Autonomous::default()
            },
            teleop: Teleop {
                cycles: form.read_counter(CYCLES_FIELD).unwrap_or(0),
                successful_cycles: form.read_counter(SUCCESSFUL_CYCLES_FIELD).unwrap_or(0),
                processor: text(&request.teleop_processor),
                scoring: Scoring::from_form(form, "teleop"),
                notes: text(&request.teleop_notes),
                ..Teleop::default()
            },
            endgame: Endgame {
                position: EndgamePosition::from_flags(
                    is_yes(&request.endgame_park),
                    is_yes(&request.endgame_deep_climb),
                    is_yes(&request.endgame_shallow_climb),
                ),
                notes: text(&request.endgame_notes),
                ..Endgame::default()
            },
            additional_notes: text(&request.additional_notes),
        };
        report.calculate_scores();
        report
    }

    pub fn calculate_scores(&mut self) {
        self.autonomous.score = self.autonomous.scoring.score(AUTO_POINTS);
        self.autonomous.coral_count = self.autonomous.scoring.coral_count();
        self.teleop.score = self.teleop.scoring.score(TELEOP_POINTS);
        self.teleop.coral_count = self.teleop.scoring.coral_count();
        self.endgame.score = self.endgame.position.points();
    }

    pub fn total_score(&self) -> i64 {
        self.autonomous.score + self.teleop.score + self.endgame.score
    }
}

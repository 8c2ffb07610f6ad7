//! Beam vocabulary shared between templates and the planning system.
//!
//! Template authors spell these inconsistently, so each type has a
//! `from_template` constructor that applies substring rules and falls back
//! to a fixed default instead of failing. Gantry direction is matched
//! without regard to case. Leaf meeting points are matched case-sensitively:
//! a lowercase "in" or "a" appears inside too many unrelated words
//! ("Point", "bank") to identify a position.

use serde::{Deserialize, Serialize};

use crate::classify::contains_ignore_case;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GantryDirection {
    Clockwise,
    CounterClockwise,
    #[default]
    None,
}

impl GantryDirection {
    /// "CC"/"CCW" before "CW", since "CCW" also contains "CW".
    pub fn from_template(direction: &str) -> Self {
        if contains_ignore_case(direction, "CC") {
            GantryDirection::CounterClockwise
        } else if contains_ignore_case(direction, "CW") {
            GantryDirection::Clockwise
        } else {
            GantryDirection::None
        }
    }

    pub fn is_rotating(&self) -> bool {
        !matches!(self, GantryDirection::None)
    }
}

/// Where open leaf pairs meet relative to the structure outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenLeavesMeetingPoint {
    Inside,
    #[default]
    Middle,
    Outside,
}

impl OpenLeavesMeetingPoint {
    pub fn from_template(meet_point: &str) -> Self {
        if meet_point.contains("Middle") {
            OpenLeavesMeetingPoint::Middle
        } else if meet_point.contains("In") {
            OpenLeavesMeetingPoint::Inside
        } else if meet_point.contains("Out") {
            OpenLeavesMeetingPoint::Outside
        } else {
            OpenLeavesMeetingPoint::Middle
        }
    }
}

/// Where closed leaf pairs are parked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedLeavesMeetingPoint {
    #[default]
    Center,
    BankOne,
    BankTwo,
}

impl ClosedLeavesMeetingPoint {
    pub fn from_template(meet_point: &str) -> Self {
        if meet_point.contains("Center") {
            ClosedLeavesMeetingPoint::Center
        } else if meet_point.contains('A') {
            ClosedLeavesMeetingPoint::BankOne
        } else if meet_point.contains('B') {
            ClosedLeavesMeetingPoint::BankTwo
        } else {
            ClosedLeavesMeetingPoint::Center
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JawFitting {
    None,
    #[default]
    FitToRecommended,
}

impl JawFitting {
    /// Mode "0" disables jaw fitting; any other value, or none, fits the
    /// jaws to the recommended position.
    pub fn from_template(mode: Option<&str>) -> Self {
        match mode.map(str::trim) {
            Some("0") => JawFitting::None,
            _ => JawFitting::FitToRecommended,
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use rtplan_core::models::ObjectiveType;

/// An objective the planning system could not take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedObjective {
    pub structure_id: String,
    pub kind: ObjectiveType,
    pub reason: String,
}

impl fmt::Display for UnsupportedObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}): {}", self.structure_id, self.kind, self.reason)
    }
}

/// Outcome of [`apply_objectives`](crate::apply_objectives).
///
/// Displays as two lines: the structures that received objectives (with
/// any unsupported objectives noted), then the structures that were not
/// on the structure set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSummary {
    pub included: Vec<String>,
    pub not_found: Vec<String>,
    pub unsupported: Vec<UnsupportedObjective>,
}

impl fmt::Display for OptimizationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let included = self
            .included
            .iter()
            .cloned()
            .chain(self.unsupported.iter().map(|u| format!("not added {u}")))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "Structures Included in Optimization: {included}")?;
        write!(
            f,
            "Structure not found on Structure Set for Optimization: {}",
            self.not_found.join(", ")
        )
    }
}

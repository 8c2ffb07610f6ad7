use serde::{Deserialize, Serialize};

use super::objective_template::ObjectiveTemplate;
use super::plan_template::PlanTemplate;
use super::prescription::Prescription;
use super::preview::Preview;

/// A multi-phase clinical protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    pub preview: Preview,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    #[serde(default)]
    pub plan_template: Option<PlanTemplate>,
    #[serde(default)]
    pub objective_template: Option<ObjectiveTemplate>,
    #[serde(default)]
    pub prescription: Option<Prescription>,
}

impl Protocol {
    /// Prescriptions of every phase that carries one, in phase order.
    pub fn prescriptions(&self) -> impl Iterator<Item = (&Phase, &Prescription)> {
        self.phases
            .iter()
            .filter_map(|phase| phase.prescription.as_ref().map(|rx| (phase, rx)))
    }
}

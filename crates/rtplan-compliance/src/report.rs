use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use rtplan_core::models::Protocol;
use rtplan_host::PlanningItem;

use crate::item::evaluate_item;
use crate::measure::evaluate_measure_item;
use crate::metric::{DoseMetric, PassResult};

/// Evaluate every item and measure item of every phase that carries a
/// prescription, in phase order, items before measure items.
pub fn evaluate_protocol<P: PlanningItem + ?Sized>(plan: &P, protocol: &Protocol) -> Vec<DoseMetric> {
    let mut metrics = Vec::new();
    for (phase, prescription) in protocol.prescriptions() {
        tracing::debug!(
            protocol = %protocol.preview.id,
            phase = %phase.id,
            items = prescription.items.len(),
            measure_items = prescription.measure_items.len(),
            "evaluating phase"
        );
        metrics.extend(prescription.items.iter().map(|item| evaluate_item(plan, item)));
        metrics.extend(
            prescription
                .measure_items
                .iter()
                .map(|item| evaluate_measure_item(plan, item)),
        );
    }
    metrics
}

/// A protocol evaluation with its tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComplianceReport {
    pub protocol_id: String,
    pub plan_id: String,
    pub evaluated_at: Timestamp,
    pub passed: usize,
    pub failed: usize,
    pub not_applicable: usize,
    pub metrics: Vec<DoseMetric>,
}

impl ComplianceReport {
    pub fn evaluate<P: PlanningItem + ?Sized>(plan: &P, protocol: &Protocol) -> Self {
        let metrics = evaluate_protocol(plan, protocol);
        let report = Self::from_metrics(&protocol.preview.id, plan.id(), Timestamp::now(), metrics);
        tracing::info!(
            protocol = %report.protocol_id,
            plan = %report.plan_id,
            passed = report.passed,
            failed = report.failed,
            not_applicable = report.not_applicable,
            "protocol evaluated"
        );
        report
    }

    pub fn from_metrics(
        protocol_id: &str,
        plan_id: &str,
        evaluated_at: Timestamp,
        metrics: Vec<DoseMetric>,
    ) -> Self {
        let count = |result: PassResult| metrics.iter().filter(|m| m.pass == result).count();
        Self {
            protocol_id: protocol_id.to_string(),
            plan_id: plan_id.to_string(),
            evaluated_at,
            passed: count(PassResult::Pass),
            failed: count(PassResult::Fail),
            not_applicable: count(PassResult::NotApplicable),
            metrics,
        }
    }

    /// True when nothing failed. Not-applicable goals do not count against
    /// the plan.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

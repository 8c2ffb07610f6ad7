//! Protocol plan objectives ("items").

use rtplan_core::models::{Item, ItemModifier};
use rtplan_host::PlanningItem;
use rtplan_host::dvh::{DosePresentation, VolumePresentation};

use crate::dvh_lookup::dose_at_volume;
use crate::metric::{Comparison, DoseMetric, MetricType, PassResult};
use crate::units::{ResultUnit, bin_width, plan_dose_in, template_dose};

/// Why a structure cannot be evaluated, if it cannot.
pub(crate) fn structure_problem<P: PlanningItem + ?Sized>(
    plan: &P,
    structure_id: &str,
) -> Option<&'static str> {
    match plan.structure_set().structure(structure_id) {
        None => Some("Structure Not Found"),
        Some(structure) if structure.is_empty => Some("Empty"),
        Some(_) => None,
    }
}

/// Evaluate one item. Target doses are authored in Gy and compared in the
/// plan's absolute dose unit.
///
/// "At least P% receives more than D" passes when the dose at P% is at
/// least D. "At most P% receives more than D" passes when the dose at P%
/// is at most D. Max/mean/min goals compare the DVH summary dose exactly,
/// or strictly for the less-than and more-than variants.
pub fn evaluate_item<P: PlanningItem + ?Sized>(plan: &P, item: &Item) -> DoseMetric {
    let mut metric = DoseMetric::new(&item.id);
    let Some(total_dose) = item.total_dose else {
        return metric.not_applicable("No target dose");
    };
    let plan_unit = plan.dose_unit();
    let (target, unit) = template_dose(total_dose, plan_unit);
    metric.target_value = Some(target);
    metric.target_unit = Some(unit);
    metric.result_unit = Some(unit);

    if let Some(problem) = structure_problem(plan, &item.id) {
        return metric.not_applicable(problem);
    }

    let id = &item.id;
    let (metric_type, comparison, metric_text) = match item.modifier {
        ItemModifier::AtLeast => (
            MetricType::DoseAtVolume,
            Comparison::AtLeast,
            format!("{id} at least {} % receives more than {target} {unit}", item.parameter),
        ),
        ItemModifier::AtMost => (
            MetricType::DoseAtVolume,
            Comparison::AtMost,
            format!("{id} at most {} % receives more than {target} {unit}", item.parameter),
        ),
        ItemModifier::MaxDoseIs => {
            summary_goal(id, MetricType::MaxDose, Comparison::Equal, target, unit)
        }
        ItemModifier::MaxDoseIsLessThan => {
            summary_goal(id, MetricType::MaxDose, Comparison::LessThan, target, unit)
        }
        ItemModifier::MeanDoseIs => {
            summary_goal(id, MetricType::MeanDose, Comparison::Equal, target, unit)
        }
        ItemModifier::MeanDoseIsLessThan => {
            summary_goal(id, MetricType::MeanDose, Comparison::LessThan, target, unit)
        }
        ItemModifier::MeanDoseIsMoreThan => {
            summary_goal(id, MetricType::MeanDose, Comparison::MoreThan, target, unit)
        }
        ItemModifier::MinDoseIs => {
            summary_goal(id, MetricType::MinDose, Comparison::Equal, target, unit)
        }
        ItemModifier::MinDoseIsMoreThan => {
            summary_goal(id, MetricType::MinDose, Comparison::MoreThan, target, unit)
        }
        ItemModifier::ReferencePointReceives | ItemModifier::Unknown => {
            return metric.not_applicable("Reference point and isodose goals are not supported");
        }
    };
    metric.metric_type = Some(metric_type);
    metric.metric_text = metric_text;
    if metric_type == MetricType::DoseAtVolume {
        metric.input_value = Some(item.parameter);
        metric.input_unit = Some(ResultUnit::PercentVolume);
    }

    let dvh = match plan.cumulative_dvh(
        id,
        DosePresentation::Absolute,
        VolumePresentation::Relative,
        bin_width(plan_unit),
    ) {
        Ok(dvh) => dvh,
        Err(err) => {
            tracing::warn!(structure = %id, error = %err, "no DVH for item");
            return metric.not_applicable(format!("Dose-volume data unavailable: {err}"));
        }
    };

    let raw = match metric_type {
        MetricType::MaxDose => Some(dvh.max_dose),
        MetricType::MeanDose => Some(dvh.mean_dose),
        MetricType::MinDose => Some(dvh.min_dose),
        _ => dose_at_volume(&dvh, item.parameter, true),
    };
    let Some(raw) = raw else {
        return metric.not_applicable("Dose-volume curve is empty");
    };
    let result = plan_dose_in(raw, plan_unit, unit);
    metric.result_value = Some(result);
    metric.pass = PassResult::from_bool(comparison.holds(result, target));
    metric.result_text = match metric_type {
        MetricType::DoseAtVolume => format!("{id} {} % receives {result:.2} {unit}", item.parameter),
        _ => format!("{id} {metric_type} = {result:.2} {unit}"),
    };
    metric
}

fn summary_goal(
    id: &str,
    metric_type: MetricType,
    comparison: Comparison,
    target: f64,
    unit: ResultUnit,
) -> (MetricType, Comparison, String) {
    let qualifier = match comparison {
        Comparison::LessThan => "less than ",
        Comparison::MoreThan => "more than ",
        _ => "",
    };
    (
        metric_type,
        comparison,
        format!("{id} {metric_type} is {qualifier}{target} {unit}"),
    )
}

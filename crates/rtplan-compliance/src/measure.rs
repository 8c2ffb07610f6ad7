//! Protocol measure details ("measure items").

use rtplan_core::models::{MeasureItem, MeasureModifier, MeasureType};
use rtplan_host::PlanningItem;
use rtplan_host::dvh::{DosePresentation, VolumePresentation};

use crate::dvh_lookup::{dose_at_volume, volume_at_dose};
use crate::item::structure_problem;
use crate::metric::{Comparison, DoseMetric, MetricType, PassResult};
use crate::units::{ResultUnit, bin_width, plan_dose_in, template_dose};

fn comparison(modifier: MeasureModifier) -> Comparison {
    match modifier {
        MeasureModifier::IsMoreThan => Comparison::MoreThan,
        MeasureModifier::IsLessThan => Comparison::LessThan,
        MeasureModifier::Is => Comparison::Equal,
        MeasureModifier::IsGreaterThanOrEqualTo => Comparison::AtLeast,
        MeasureModifier::IsLessThanOrEqualTo => Comparison::AtMost,
    }
}

/// Evaluate one measure item.
///
/// Dose-at-volume goals read a dose (Gy/cGy or % of prescription) at a
/// volume (cc or %); volume-at-dose goals the reverse. Absolute doses on
/// either side are expressed in the plan's dose unit. A goal without a
/// target value is still measured but never passes or fails.
pub fn evaluate_measure_item<P: PlanningItem + ?Sized>(plan: &P, item: &MeasureItem) -> DoseMetric {
    let metric = DoseMetric::new(&item.id);
    match item.kind {
        MeasureType::DoseAtAbsoluteVolume | MeasureType::DoseAtRelativeVolume => {
            evaluate_dose_at_volume(plan, item, metric)
        }
        MeasureType::VolumeAtAbsoluteDose | MeasureType::VolumeAtRelativeDose => {
            evaluate_volume_at_dose(plan, item, metric)
        }
        MeasureType::ConformityIndex | MeasureType::GradientMeasure => {
            let mut metric = metric;
            metric.metric_type = Some(match item.kind {
                MeasureType::ConformityIndex => MetricType::ConformityIndex,
                _ => MetricType::GradientMeasure,
            });
            metric.not_applicable("Conformity index and gradient measure are not supported")
        }
    }
}

fn evaluate_dose_at_volume<P: PlanningItem + ?Sized>(
    plan: &P,
    item: &MeasureItem,
    mut metric: DoseMetric,
) -> DoseMetric {
    metric.metric_type = Some(MetricType::DoseAtVolume);
    if let Some(problem) = structure_problem(plan, &item.id) {
        return metric.not_applicable(problem);
    }
    let Some(volume) = item.type_specifier else {
        return metric.not_applicable("No volume given for dose-at-volume goal");
    };

    let plan_unit = plan.dose_unit();
    let input_unit = match item.kind {
        MeasureType::DoseAtAbsoluteVolume => ResultUnit::Cc,
        _ => ResultUnit::PercentVolume,
    };
    let (target, target_unit) = match (item.value, item.report_dqp_value_in_absolute_units) {
        (Some(value), true) => {
            let (dose, unit) = template_dose(value, plan_unit);
            (Some(dose), unit)
        }
        (None, true) => (None, ResultUnit::for_plan_dose(plan_unit)),
        (value, false) => (value, ResultUnit::PercentDose),
    };
    metric.input_value = Some(volume);
    metric.input_unit = Some(input_unit);
    metric.target_value = target;
    metric.target_unit = Some(target_unit);
    metric.result_unit = Some(target_unit);

    let label = format!("{} D{volume}{input_unit}[{target_unit}]", item.id);
    let comparison = comparison(item.modifier);
    metric.metric_text = match target {
        Some(target) => format!("{label} {} {target} {target_unit}", comparison.phrase()),
        None => format!("{label} {}", comparison.phrase()),
    };

    let dose = if target_unit == ResultUnit::PercentDose {
        DosePresentation::Relative
    } else {
        DosePresentation::Absolute
    };
    let volume_presentation = if input_unit == ResultUnit::Cc {
        VolumePresentation::AbsoluteCm3
    } else {
        VolumePresentation::Relative
    };
    let dvh = match plan.cumulative_dvh(&item.id, dose, volume_presentation, bin_width(plan_unit)) {
        Ok(dvh) => dvh,
        Err(err) => {
            tracing::warn!(structure = %item.id, error = %err, "no DVH for measure item");
            return metric.not_applicable(format!("Dose-volume data unavailable: {err}"));
        }
    };
    let Some(raw) = dose_at_volume(&dvh, volume, input_unit == ResultUnit::PercentVolume) else {
        return metric.not_applicable("Dose-volume curve is empty");
    };

    let result = plan_dose_in(raw, plan_unit, target_unit);
    finish(metric, &label, result, target_unit, target, comparison)
}

fn evaluate_volume_at_dose<P: PlanningItem + ?Sized>(
    plan: &P,
    item: &MeasureItem,
    mut metric: DoseMetric,
) -> DoseMetric {
    metric.metric_type = Some(MetricType::VolumeAtDose);
    if let Some(problem) = structure_problem(plan, &item.id) {
        return metric.not_applicable(problem);
    }
    let Some(dose) = item.type_specifier else {
        return metric.not_applicable("No dose given for volume-at-dose goal");
    };

    let plan_unit = plan.dose_unit();
    let (input, input_unit) = match item.kind {
        MeasureType::VolumeAtAbsoluteDose => template_dose(dose, plan_unit),
        _ => (dose, ResultUnit::PercentDose),
    };
    let target_unit = if item.report_dqp_value_in_absolute_units {
        ResultUnit::Cc
    } else {
        ResultUnit::PercentVolume
    };
    let target = item.value;
    metric.input_value = Some(input);
    metric.input_unit = Some(input_unit);
    metric.target_value = target;
    metric.target_unit = Some(target_unit);
    metric.result_unit = Some(target_unit);

    let label = format!("{} V{input}{input_unit}[{target_unit}]", item.id);
    let comparison = comparison(item.modifier);
    metric.metric_text = match target {
        Some(target) => format!("{label} {} {target} {target_unit}", comparison.phrase()),
        None => format!("{label} {}", comparison.phrase()),
    };

    let dose_presentation = if input_unit == ResultUnit::PercentDose {
        DosePresentation::Relative
    } else {
        DosePresentation::Absolute
    };
    let volume = if target_unit == ResultUnit::Cc {
        VolumePresentation::AbsoluteCm3
    } else {
        VolumePresentation::Relative
    };
    let dvh = match plan.cumulative_dvh(&item.id, dose_presentation, volume, bin_width(plan_unit)) {
        Ok(dvh) => dvh,
        Err(err) => {
            tracing::warn!(structure = %item.id, error = %err, "no DVH for measure item");
            return metric.not_applicable(format!("Dose-volume data unavailable: {err}"));
        }
    };
    let Some(result) = volume_at_dose(&dvh, input) else {
        return metric.not_applicable("Dose-volume curve is empty");
    };

    finish(metric, &label, result, target_unit, target, comparison)
}

fn finish(
    mut metric: DoseMetric,
    label: &str,
    result: f64,
    unit: ResultUnit,
    target: Option<f64>,
    comparison: Comparison,
) -> DoseMetric {
    metric.result_value = Some(result);
    metric.result_text = format!("{label} = {result:.2} {unit}");
    metric.pass = match target {
        Some(target) => PassResult::from_bool(comparison.holds(result, target)),
        None => PassResult::NotApplicable,
    };
    metric
}

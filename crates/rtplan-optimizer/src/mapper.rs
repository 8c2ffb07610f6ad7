use rtplan_core::models::{
    Objective, ObjectiveOperator, ObjectiveTemplate, ObjectiveType, StructureObjectives,
};
use rtplan_core::units::{DoseUnit, DoseValue};
use rtplan_host::OptimizationSetup;
use rtplan_host::plan::{NormalTissueParameters, OptimizationObjectiveOperator, OptimizationRun};

use crate::error::OptimizerError;
use crate::summary::{OptimizationSummary, UnsupportedObjective};

/// Which optimizer entry point a plan needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationPath {
    Vmat,
    Iterative(OptimizationRun),
}

/// VMAT when any treatment beam rotates, otherwise an iterative run seeded
/// from the plan dose if the template sets an iteration count.
pub fn optimization_run<P: OptimizationSetup + ?Sized>(
    plan: &P,
    template: &ObjectiveTemplate,
) -> OptimizationPath {
    let rotating = plan
        .beams()
        .iter()
        .any(|beam| !beam.is_setup_field && beam.gantry_direction.is_rotating());
    if rotating {
        OptimizationPath::Vmat
    } else if template.helios.max_iterations != 0 {
        OptimizationPath::Iterative(OptimizationRun::ContinueFromPlanDose {
            max_iterations: template.helios.max_iterations,
        })
    } else {
        OptimizationPath::Iterative(OptimizationRun::Default)
    }
}

/// Register the template's objectives on `plan` and run the optimizer.
///
/// Template doses are Gy and are sent in `system_unit`. Structures missing
/// from the plan's structure set and objectives the planning system cannot
/// express are collected in the summary instead of failing the call.
pub fn apply_objectives<P: OptimizationSetup + ?Sized>(
    plan: &mut P,
    template: &ObjectiveTemplate,
    system_unit: DoseUnit,
) -> Result<OptimizationSummary, OptimizerError> {
    let nto = &template.helios.normal_tissue_objective;
    if nto.auto {
        plan.add_automatic_normal_tissue_objective(nto.priority)?;
    } else if nto.enabled {
        plan.add_normal_tissue_objective(&NormalTissueParameters {
            priority: nto.priority,
            distance_from_target_border: nto.distance_from_target_border,
            start_dose: nto.start_dose,
            end_dose: nto.end_dose,
            fall_off: nto.fall_off,
        })?;
    }

    let mut summary = OptimizationSummary::default();
    for group in &template.structures {
        if plan.structure_set().structure(&group.id).is_none() {
            tracing::warn!(
                template = %template.preview.id,
                structure = %group.id,
                "structure not on structure set, skipping its objectives"
            );
            summary.not_found.push(group.id.clone());
            continue;
        }
        summary.included.push(group.id.clone());
        for objective in &group.objectives {
            if let Some(unsupported) = add_objective(plan, group, objective, system_unit)? {
                tracing::warn!(
                    structure = %group.id,
                    kind = ?objective.kind,
                    reason = %unsupported.reason,
                    "objective not added"
                );
                summary.unsupported.push(unsupported);
            }
        }
    }

    match optimization_run(plan, template) {
        OptimizationPath::Vmat => {
            tracing::info!(plan = plan.id(), "running VMAT optimization");
            plan.optimize_vmat()?;
        }
        OptimizationPath::Iterative(run) => {
            tracing::info!(plan = plan.id(), run = ?run, "running iterative optimization");
            plan.optimize(run)?;
        }
    }

    tracing::info!(
        plan = plan.id(),
        included = summary.included.len(),
        not_found = summary.not_found.len(),
        unsupported = summary.unsupported.len(),
        "objectives applied"
    );
    Ok(summary)
}

fn add_objective<P: OptimizationSetup + ?Sized>(
    plan: &mut P,
    group: &StructureObjectives,
    objective: &Objective,
    system_unit: DoseUnit,
) -> Result<Option<UnsupportedObjective>, OptimizerError> {
    let unsupported = |reason: &str| {
        Ok(Some(UnsupportedObjective {
            structure_id: group.id.clone(),
            kind: objective.kind,
            reason: reason.to_string(),
        }))
    };
    let dose = DoseValue::from_template_gy(objective.dose, system_unit);

    match objective.kind {
        ObjectiveType::Point => {
            let Some(volume) = objective.volume else {
                return unsupported("point objective without a volume");
            };
            let operator = match objective.operator {
                ObjectiveOperator::Upper => OptimizationObjectiveOperator::Upper,
                _ => OptimizationObjectiveOperator::Lower,
            };
            plan.add_point_objective(&group.id, operator, dose, volume, objective.priority)?;
        }
        ObjectiveType::Mean => {
            plan.add_mean_dose_objective(&group.id, dose, objective.priority)?;
        }
        ObjectiveType::GeneralizedEud => {
            let Some(parameter_a) = objective.parameter_a else {
                return unsupported("gEUD objective without a shape parameter");
            };
            let operator = match objective.operator {
                ObjectiveOperator::Lower => OptimizationObjectiveOperator::Lower,
                ObjectiveOperator::Upper => OptimizationObjectiveOperator::Upper,
                ObjectiveOperator::Target => OptimizationObjectiveOperator::Exact,
                ObjectiveOperator::None => OptimizationObjectiveOperator::None,
            };
            plan.add_eud_objective(&group.id, operator, dose, parameter_a, objective.priority)?;
        }
        ObjectiveType::Line => {
            return unsupported("line objectives cannot be added");
        }
    }
    Ok(None)
}

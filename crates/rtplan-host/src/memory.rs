//! An in-process planning system.
//!
//! `MemoryHost` and `MemoryPlan` implement the host traits without any dose
//! engine: every call is validated, applied to a small beam model and
//! appended to a call log that can be inspected afterwards. Dose-volume
//! data is preloaded per structure.
//!
//! Fits place the aperture on the structure's bounding box in the
//! beam's-eye view at gantry zero (jaw X along patient x, jaw Y along
//! patient z).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rtplan_core::beam::{GantryDirection, JawFitting};
use rtplan_core::geometry::{FitMargins, JawRect, Vector3};
use rtplan_core::units::{DoseUnit, DoseValue};

use crate::dvh::{DosePresentation, DvhData, DvhPoint, VolumePresentation};
use crate::error::HostError;
use crate::plan::{
    ArcBeam, BeamHandle, BeamSummary, CollimatorFit, ConformalArcBeam, ExternalPlan,
    MachineParameters, MlcFit, NormalTissueParameters, OptimizationObjectiveOperator,
    OptimizationRun, OptimizationSetup, PlanningHost, PlanningItem, StaticBeam,
};
use crate::structure::{Structure, StructureSet};

/// Every mutating call a [`MemoryPlan`] or [`MemoryHost`] has accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostCall {
    AddCourse {
        course_id: String,
    },
    AddExternalPlan {
        course_id: String,
        plan_id: String,
    },
    AddStaticBeam(StaticBeam),
    AddArcBeam(ArcBeam),
    AddConformalArcBeam(ConformalArcBeam),
    SetBeamId {
        beam: BeamHandle,
        id: String,
    },
    FitCollimator {
        beam: BeamHandle,
        fit: CollimatorFit,
    },
    FitMlc {
        beam: BeamHandle,
        fit: MlcFit,
    },
    SetJawPositions {
        beam: BeamHandle,
        jaws: JawRect,
    },
    SetPrescription {
        fractions: u32,
        dose_per_fraction: DoseValue,
        prescribed_percentage: f64,
    },
    PointObjective {
        structure_id: String,
        operator: OptimizationObjectiveOperator,
        dose: DoseValue,
        volume: f64,
        priority: f64,
    },
    MeanDoseObjective {
        structure_id: String,
        dose: DoseValue,
        priority: f64,
    },
    EudObjective {
        structure_id: String,
        operator: OptimizationObjectiveOperator,
        dose: DoseValue,
        parameter_a: f64,
        priority: f64,
    },
    AutomaticNormalTissueObjective {
        priority: f64,
    },
    NormalTissueObjective(NormalTissueParameters),
    OptimizeVmat,
    Optimize(OptimizationRun),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryBeam {
    pub id: String,
    pub is_setup_field: bool,
    pub machine: MachineParameters,
    pub jaws: JawRect,
    pub collimator_angle: f64,
    pub gantry_angle: f64,
    pub gantry_stop: Option<f64>,
    pub gantry_direction: GantryDirection,
    pub table_angle: f64,
    pub isocenter: Vector3,
}

/// Structures plus preloaded DVHs, shared by plans and plan sums.
///
/// Curves are stored with absolute dose in `dose_unit` and relative volume
/// in percent. Other presentations are derived on query.
#[derive(Debug, Clone, Default)]
struct DoseStore {
    structure_set: StructureSet,
    dvhs: BTreeMap<String, DvhData>,
    /// Total prescribed dose, `dose_unit`. Needed for relative dose.
    reference_dose: Option<f64>,
}

impl DoseStore {
    fn new(structure_set: StructureSet) -> Self {
        Self {
            structure_set,
            ..Default::default()
        }
    }

    fn query(
        &self,
        structure_id: &str,
        dose: DosePresentation,
        volume: VolumePresentation,
    ) -> Result<DvhData, HostError> {
        let structure = self
            .structure_set
            .structure(structure_id)
            .ok_or_else(|| HostError::StructureNotFound(structure_id.to_string()))?;
        let stored = self
            .dvhs
            .get(structure_id)
            .ok_or_else(|| HostError::NoDoseData(structure_id.to_string()))?;

        let dose_scale = match dose {
            DosePresentation::Absolute => 1.0,
            DosePresentation::Relative => match self.reference_dose {
                Some(reference) if reference > 0.0 => 100.0 / reference,
                _ => {
                    return Err(HostError::Rejected {
                        operation: "cumulative_dvh",
                        reason: "relative dose needs a prescription".to_string(),
                    });
                }
            },
        };
        let volume_scale = match volume {
            VolumePresentation::Relative => 1.0,
            VolumePresentation::AbsoluteCm3 => structure.volume_cc / 100.0,
        };

        Ok(DvhData {
            curve: stored
                .curve
                .iter()
                .map(|p| DvhPoint {
                    dose: p.dose * dose_scale,
                    volume: p.volume * volume_scale,
                })
                .collect(),
            max_dose: stored.max_dose * dose_scale,
            mean_dose: stored.mean_dose * dose_scale,
            min_dose: stored.min_dose * dose_scale,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MemoryPlan {
    id: String,
    dose_unit: DoseUnit,
    store: DoseStore,
    beams: Vec<MemoryBeam>,
    calls: Vec<HostCall>,
}

impl MemoryPlan {
    pub fn new(id: impl Into<String>, structure_set: StructureSet) -> Self {
        Self {
            id: id.into(),
            dose_unit: DoseUnit::Gy,
            store: DoseStore::new(structure_set),
            beams: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn with_dose_unit(mut self, unit: DoseUnit) -> Self {
        self.dose_unit = unit;
        self
    }

    /// Preload a DVH: absolute dose in the plan's unit, relative volume.
    pub fn with_dvh(mut self, structure_id: impl Into<String>, dvh: DvhData) -> Self {
        self.store.dvhs.insert(structure_id.into(), dvh);
        self
    }

    /// Total dose that relative-dose queries are normalised to. Set
    /// implicitly by [`ExternalPlan::set_prescription`].
    pub fn with_reference_dose(mut self, dose: f64) -> Self {
        self.store.reference_dose = Some(dose);
        self
    }

    /// Add a setup field, which carries no dose and never rotates.
    pub fn add_setup_beam(&mut self, id: impl Into<String>, gantry_angle: f64) -> BeamHandle {
        self.beams.push(MemoryBeam {
            id: id.into(),
            is_setup_field: true,
            machine: MachineParameters::default(),
            jaws: JawRect::default(),
            collimator_angle: 0.0,
            gantry_angle,
            gantry_stop: None,
            gantry_direction: GantryDirection::None,
            table_angle: 0.0,
            isocenter: Vector3::default(),
        });
        BeamHandle(self.beams.len() - 1)
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn beam(&self, handle: BeamHandle) -> Option<&MemoryBeam> {
        self.beams.get(handle.0)
    }

    fn beam_mut(&mut self, handle: BeamHandle) -> Result<&mut MemoryBeam, HostError> {
        self.beams
            .get_mut(handle.0)
            .ok_or(HostError::BeamNotFound(handle.0))
    }

    fn structure(&self, id: &str) -> Result<&Structure, HostError> {
        self.store
            .structure_set
            .structure(id)
            .ok_or_else(|| HostError::StructureNotFound(id.to_string()))
    }

    fn push_beam(&mut self, beam: MemoryBeam) -> BeamHandle {
        let handle = BeamHandle(self.beams.len());
        let mut beam = beam;
        if beam.id.is_empty() {
            beam.id = format!("Field {}", handle.0 + 1);
        }
        self.beams.push(beam);
        handle
    }

    fn require_structure(&self, operation: &'static str, id: &str) -> Result<(), HostError> {
        let structure = self.structure(id)?;
        if structure.is_empty {
            return Err(HostError::Rejected {
                operation,
                reason: format!("structure {id} has no contours"),
            });
        }
        Ok(())
    }
}

/// Jaws around `structure` with `margins`. A symmetric pair takes the
/// larger of its two margins on both sides.
fn fitted_jaws(structure: &Structure, margins: FitMargins, asym_x: bool, asym_y: bool) -> JawRect {
    let half_x = structure.extent.x / 2.0;
    let half_y = structure.extent.z / 2.0;
    let (mx1, mx2) = if asym_x {
        (margins.x1, margins.x2)
    } else {
        let m = margins.x1.max(margins.x2);
        (m, m)
    };
    let (my1, my2) = if asym_y {
        (margins.y1, margins.y2)
    } else {
        let m = margins.y1.max(margins.y2);
        (m, m)
    };
    JawRect::new(-(half_x + mx1), -(half_y + my1), half_x + mx2, half_y + my2)
}

impl PlanningItem for MemoryPlan {
    fn id(&self) -> &str {
        &self.id
    }

    fn structure_set(&self) -> &StructureSet {
        &self.store.structure_set
    }

    fn dose_unit(&self) -> DoseUnit {
        self.dose_unit
    }

    fn cumulative_dvh(
        &self,
        structure_id: &str,
        dose: DosePresentation,
        volume: VolumePresentation,
        _bin_width: f64,
    ) -> Result<DvhData, HostError> {
        self.store.query(structure_id, dose, volume)
    }
}

impl ExternalPlan for MemoryPlan {
    fn beams(&self) -> Vec<BeamSummary> {
        self.beams
            .iter()
            .enumerate()
            .map(|(index, beam)| BeamSummary {
                handle: BeamHandle(index),
                id: beam.id.clone(),
                is_setup_field: beam.is_setup_field,
                gantry_angle: beam.gantry_angle,
                gantry_direction: beam.gantry_direction,
                technique: beam.machine.technique.clone(),
            })
            .collect()
    }

    fn add_static_beam(&mut self, beam: &StaticBeam) -> Result<BeamHandle, HostError> {
        self.calls.push(HostCall::AddStaticBeam(beam.clone()));
        Ok(self.push_beam(MemoryBeam {
            id: String::new(),
            is_setup_field: false,
            machine: beam.machine.clone(),
            jaws: beam.jaws,
            collimator_angle: beam.collimator_angle,
            gantry_angle: beam.gantry_angle,
            gantry_stop: None,
            gantry_direction: GantryDirection::None,
            table_angle: beam.table_angle,
            isocenter: beam.isocenter,
        }))
    }

    fn add_arc_beam(&mut self, beam: &ArcBeam) -> Result<BeamHandle, HostError> {
        self.calls.push(HostCall::AddArcBeam(beam.clone()));
        Ok(self.push_beam(MemoryBeam {
            id: String::new(),
            is_setup_field: false,
            machine: beam.machine.clone(),
            jaws: beam.jaws,
            collimator_angle: beam.collimator_angle,
            gantry_angle: beam.sweep.start,
            gantry_stop: Some(beam.sweep.stop),
            gantry_direction: beam.sweep.direction,
            table_angle: beam.table_angle,
            isocenter: beam.isocenter,
        }))
    }

    fn add_conformal_arc_beam(
        &mut self,
        beam: &ConformalArcBeam,
    ) -> Result<BeamHandle, HostError> {
        if beam.control_point_spacing <= 0.0 {
            return Err(HostError::Rejected {
                operation: "add_conformal_arc_beam",
                reason: format!(
                    "control point spacing must be positive, got {}",
                    beam.control_point_spacing
                ),
            });
        }
        self.calls.push(HostCall::AddConformalArcBeam(beam.clone()));
        Ok(self.push_beam(MemoryBeam {
            id: String::new(),
            is_setup_field: false,
            machine: beam.machine.clone(),
            jaws: JawRect::default(),
            collimator_angle: beam.collimator_angle,
            gantry_angle: beam.sweep.start,
            gantry_stop: Some(beam.sweep.stop),
            gantry_direction: beam.sweep.direction,
            table_angle: beam.table_angle,
            isocenter: beam.isocenter,
        }))
    }

    fn set_beam_id(&mut self, beam: BeamHandle, id: &str) -> Result<(), HostError> {
        self.beam_mut(beam)?.id = id.to_string();
        self.calls.push(HostCall::SetBeamId {
            beam,
            id: id.to_string(),
        });
        Ok(())
    }

    fn fit_collimator_to_structure(
        &mut self,
        beam: BeamHandle,
        fit: &CollimatorFit,
    ) -> Result<(), HostError> {
        self.require_structure("fit_collimator_to_structure", &fit.structure_id)?;
        let jaws = fitted_jaws(
            self.structure(&fit.structure_id)?,
            fit.margins,
            fit.asymmetric_x,
            fit.asymmetric_y,
        );
        self.beam_mut(beam)?.jaws = jaws;
        self.calls.push(HostCall::FitCollimator {
            beam,
            fit: fit.clone(),
        });
        Ok(())
    }

    fn fit_mlc_to_structure(&mut self, beam: BeamHandle, fit: &MlcFit) -> Result<(), HostError> {
        self.require_structure("fit_mlc_to_structure", &fit.structure_id)?;
        if fit.jaw_fitting == JawFitting::FitToRecommended {
            let jaws = fitted_jaws(self.structure(&fit.structure_id)?, fit.margins, true, true);
            self.beam_mut(beam)?.jaws = jaws;
        } else {
            self.beam_mut(beam)?;
        }
        self.calls.push(HostCall::FitMlc {
            beam,
            fit: fit.clone(),
        });
        Ok(())
    }

    fn jaw_positions(&self, beam: BeamHandle) -> Result<JawRect, HostError> {
        self.beam(beam)
            .map(|b| b.jaws)
            .ok_or(HostError::BeamNotFound(beam.0))
    }

    fn set_jaw_positions(&mut self, beam: BeamHandle, jaws: JawRect) -> Result<(), HostError> {
        if jaws.x1 > jaws.x2 || jaws.y1 > jaws.y2 {
            return Err(HostError::Rejected {
                operation: "set_jaw_positions",
                reason: format!("crossed jaws {jaws:?}"),
            });
        }
        self.beam_mut(beam)?.jaws = jaws;
        self.calls.push(HostCall::SetJawPositions { beam, jaws });
        Ok(())
    }

    fn set_prescription(
        &mut self,
        fractions: u32,
        dose_per_fraction: DoseValue,
        prescribed_percentage: f64,
    ) -> Result<(), HostError> {
        if fractions == 0 {
            return Err(HostError::Rejected {
                operation: "set_prescription",
                reason: "fraction count must be positive".to_string(),
            });
        }
        let per_fraction = dose_per_fraction.to_unit(self.dose_unit).dose;
        self.store.reference_dose = Some(per_fraction * f64::from(fractions));
        self.calls.push(HostCall::SetPrescription {
            fractions,
            dose_per_fraction,
            prescribed_percentage,
        });
        Ok(())
    }
}

impl OptimizationSetup for MemoryPlan {
    fn add_point_objective(
        &mut self,
        structure_id: &str,
        operator: OptimizationObjectiveOperator,
        dose: DoseValue,
        volume: f64,
        priority: f64,
    ) -> Result<(), HostError> {
        self.structure(structure_id)?;
        self.calls.push(HostCall::PointObjective {
            structure_id: structure_id.to_string(),
            operator,
            dose,
            volume,
            priority,
        });
        Ok(())
    }

    fn add_mean_dose_objective(
        &mut self,
        structure_id: &str,
        dose: DoseValue,
        priority: f64,
    ) -> Result<(), HostError> {
        self.structure(structure_id)?;
        self.calls.push(HostCall::MeanDoseObjective {
            structure_id: structure_id.to_string(),
            dose,
            priority,
        });
        Ok(())
    }

    fn add_eud_objective(
        &mut self,
        structure_id: &str,
        operator: OptimizationObjectiveOperator,
        dose: DoseValue,
        parameter_a: f64,
        priority: f64,
    ) -> Result<(), HostError> {
        self.structure(structure_id)?;
        self.calls.push(HostCall::EudObjective {
            structure_id: structure_id.to_string(),
            operator,
            dose,
            parameter_a,
            priority,
        });
        Ok(())
    }

    fn add_automatic_normal_tissue_objective(&mut self, priority: f64) -> Result<(), HostError> {
        self.calls
            .push(HostCall::AutomaticNormalTissueObjective { priority });
        Ok(())
    }

    fn add_normal_tissue_objective(
        &mut self,
        parameters: &NormalTissueParameters,
    ) -> Result<(), HostError> {
        self.calls.push(HostCall::NormalTissueObjective(*parameters));
        Ok(())
    }

    fn optimize_vmat(&mut self) -> Result<(), HostError> {
        self.calls.push(HostCall::OptimizeVmat);
        Ok(())
    }

    fn optimize(&mut self, run: OptimizationRun) -> Result<(), HostError> {
        self.calls.push(HostCall::Optimize(run));
        Ok(())
    }
}

/// A sum of plans. Its dose unit is that of the first constituent plan.
#[derive(Debug, Clone)]
pub struct MemoryPlanSum {
    id: String,
    plans: Vec<MemoryPlan>,
    store: DoseStore,
}

impl MemoryPlanSum {
    /// The sum is evaluated on the first plan's structure set.
    pub fn new(id: impl Into<String>, plans: Vec<MemoryPlan>) -> Self {
        let structure_set = plans
            .first()
            .map(|plan| plan.store.structure_set.clone())
            .unwrap_or_default();
        Self {
            id: id.into(),
            plans,
            store: DoseStore::new(structure_set),
        }
    }

    /// Preload the summed DVH of one structure.
    pub fn with_dvh(mut self, structure_id: impl Into<String>, dvh: DvhData) -> Self {
        self.store.dvhs.insert(structure_id.into(), dvh);
        self
    }
}

impl PlanningItem for MemoryPlanSum {
    fn id(&self) -> &str {
        &self.id
    }

    fn structure_set(&self) -> &StructureSet {
        &self.store.structure_set
    }

    fn dose_unit(&self) -> DoseUnit {
        self.plans
            .first()
            .map(|plan| plan.dose_unit)
            .unwrap_or(DoseUnit::Unknown)
    }

    fn cumulative_dvh(
        &self,
        structure_id: &str,
        dose: DosePresentation,
        volume: VolumePresentation,
        _bin_width: f64,
    ) -> Result<DvhData, HostError> {
        let mut store = self.store.clone();
        if store.reference_dose.is_none() {
            let total: Option<f64> = self
                .plans
                .iter()
                .map(|plan| plan.store.reference_dose)
                .sum();
            store.reference_dose = total;
        }
        store.query(structure_id, dose, volume)
    }
}

/// A patient with courses. New plans are named `Plan1`, `Plan2`, ... and
/// report dose in the host's system unit.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    courses: Vec<String>,
    system_unit: DoseUnit,
    plan_count: usize,
    calls: Vec<HostCall>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(DoseUnit::Gy)
    }
}

impl MemoryHost {
    pub fn new(system_unit: DoseUnit) -> Self {
        Self {
            courses: Vec::new(),
            system_unit,
            plan_count: 0,
            calls: Vec::new(),
        }
    }

    pub fn with_courses<I, S>(mut self, course_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.courses.extend(course_ids.into_iter().map(Into::into));
        self
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }
}

impl PlanningHost for MemoryHost {
    type Plan = MemoryPlan;

    fn course_ids(&self) -> Vec<String> {
        self.courses.clone()
    }

    fn add_course(&mut self, course_id: &str) -> Result<(), HostError> {
        if self.courses.iter().any(|c| c == course_id) {
            return Err(HostError::DuplicateCourse(course_id.to_string()));
        }
        self.courses.push(course_id.to_string());
        self.calls.push(HostCall::AddCourse {
            course_id: course_id.to_string(),
        });
        Ok(())
    }

    fn add_external_plan(
        &mut self,
        course_id: &str,
        structure_set: &StructureSet,
    ) -> Result<MemoryPlan, HostError> {
        if !self.courses.iter().any(|c| c == course_id) {
            return Err(HostError::CourseNotFound(course_id.to_string()));
        }
        self.plan_count += 1;
        let plan_id = format!("Plan{}", self.plan_count);
        self.calls.push(HostCall::AddExternalPlan {
            course_id: course_id.to_string(),
            plan_id: plan_id.clone(),
        });
        tracing::debug!(course = %course_id, plan = %plan_id, "created external plan");
        Ok(MemoryPlan::new(plan_id, structure_set.clone()).with_dose_unit(self.system_unit))
    }
}

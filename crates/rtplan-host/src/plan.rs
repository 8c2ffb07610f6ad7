//! Traits the planning system implements.
//!
//! The split follows what each caller needs: compliance evaluation reads
//! dose from any [`PlanningItem`] (a plan or a plan sum), synthesis builds
//! beams on an [`ExternalPlan`], and the optimization mapper drives an
//! [`OptimizationSetup`].

use serde::{Deserialize, Serialize};

use rtplan_core::beam::{
    ClosedLeavesMeetingPoint, GantryDirection, JawFitting, OpenLeavesMeetingPoint,
};
use rtplan_core::geometry::{FitMargins, JawRect, Vector3};
use rtplan_core::units::{DoseUnit, DoseValue};

use crate::dvh::{DosePresentation, DvhData, VolumePresentation};
use crate::error::HostError;
use crate::structure::StructureSet;

/// Index of a beam within its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeamHandle(pub usize);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineParameters {
    pub machine_id: String,
    /// e.g. "6X".
    pub energy_mode: String,
    pub dose_rate: i32,
    /// e.g. "STATIC", "ARC".
    pub technique: String,
    pub primary_fluence_mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticBeam {
    pub machine: MachineParameters,
    pub jaws: JawRect,
    pub collimator_angle: f64,
    pub gantry_angle: f64,
    pub table_angle: f64,
    pub isocenter: Vector3,
}

/// Gantry sweep of an arc beam, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSweep {
    pub start: f64,
    pub stop: f64,
    pub direction: GantryDirection,
}

/// Two control points, open jaws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcBeam {
    pub machine: MachineParameters,
    pub jaws: JawRect,
    pub collimator_angle: f64,
    pub sweep: ArcSweep,
    pub table_angle: f64,
    pub isocenter: Vector3,
}

/// An arc with one control point every `control_point_spacing` degrees,
/// shaped afterwards by an MLC or collimator fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConformalArcBeam {
    pub machine: MachineParameters,
    pub collimator_angle: f64,
    pub control_point_spacing: f64,
    pub sweep: ArcSweep,
    pub table_angle: f64,
    pub isocenter: Vector3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollimatorFit {
    pub structure_id: String,
    pub margins: FitMargins,
    /// X jaws may be fitted independently of each other.
    pub asymmetric_x: bool,
    pub asymmetric_y: bool,
    pub optimize_collimator_rotation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlcFit {
    pub structure_id: String,
    pub margins: FitMargins,
    pub optimize_collimator_rotation: bool,
    pub jaw_fitting: JawFitting,
    pub open_meeting_point: OpenLeavesMeetingPoint,
    pub closed_meeting_point: ClosedLeavesMeetingPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSummary {
    pub handle: BeamHandle,
    pub id: String,
    pub is_setup_field: bool,
    pub gantry_angle: f64,
    pub gantry_direction: GantryDirection,
    pub technique: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationObjectiveOperator {
    Upper,
    Lower,
    Exact,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalTissueParameters {
    pub priority: f64,
    /// mm.
    pub distance_from_target_border: f64,
    /// Percent.
    pub start_dose: f64,
    /// Percent.
    pub end_dose: f64,
    pub fall_off: f64,
}

/// How an iterative (non-VMAT) optimization is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationRun {
    /// Optimizer defaults.
    Default,
    /// Seed from the current plan dose as an intermediate result.
    ContinueFromPlanDose { max_iterations: u32 },
}

/// Anything that carries dose: a plan or a sum of plans.
pub trait PlanningItem {
    fn id(&self) -> &str;

    fn structure_set(&self) -> &StructureSet;

    /// The unit absolute doses are reported in.
    fn dose_unit(&self) -> DoseUnit;

    /// Cumulative DVH of one structure. `bin_width` is in the requested dose
    /// presentation's unit.
    fn cumulative_dvh(
        &self,
        structure_id: &str,
        dose: DosePresentation,
        volume: VolumePresentation,
        bin_width: f64,
    ) -> Result<DvhData, HostError>;
}

/// An external-beam plan under construction.
pub trait ExternalPlan: PlanningItem {
    fn beams(&self) -> Vec<BeamSummary>;

    fn add_static_beam(&mut self, beam: &StaticBeam) -> Result<BeamHandle, HostError>;

    fn add_arc_beam(&mut self, beam: &ArcBeam) -> Result<BeamHandle, HostError>;

    fn add_conformal_arc_beam(&mut self, beam: &ConformalArcBeam)
    -> Result<BeamHandle, HostError>;

    fn set_beam_id(&mut self, beam: BeamHandle, id: &str) -> Result<(), HostError>;

    fn fit_collimator_to_structure(
        &mut self,
        beam: BeamHandle,
        fit: &CollimatorFit,
    ) -> Result<(), HostError>;

    fn fit_mlc_to_structure(&mut self, beam: BeamHandle, fit: &MlcFit) -> Result<(), HostError>;

    /// Jaw positions of the first control point, mm.
    fn jaw_positions(&self, beam: BeamHandle) -> Result<JawRect, HostError>;

    /// Applies `jaws` to every control point.
    fn set_jaw_positions(&mut self, beam: BeamHandle, jaws: JawRect) -> Result<(), HostError>;

    fn set_prescription(
        &mut self,
        fractions: u32,
        dose_per_fraction: DoseValue,
        prescribed_percentage: f64,
    ) -> Result<(), HostError>;
}

/// Optimization objectives and runs. Doses are in the plan's unit.
pub trait OptimizationSetup: ExternalPlan {
    fn add_point_objective(
        &mut self,
        structure_id: &str,
        operator: OptimizationObjectiveOperator,
        dose: DoseValue,
        volume: f64,
        priority: f64,
    ) -> Result<(), HostError>;

    fn add_mean_dose_objective(
        &mut self,
        structure_id: &str,
        dose: DoseValue,
        priority: f64,
    ) -> Result<(), HostError>;

    fn add_eud_objective(
        &mut self,
        structure_id: &str,
        operator: OptimizationObjectiveOperator,
        dose: DoseValue,
        parameter_a: f64,
        priority: f64,
    ) -> Result<(), HostError>;

    fn add_automatic_normal_tissue_objective(&mut self, priority: f64) -> Result<(), HostError>;

    fn add_normal_tissue_objective(
        &mut self,
        parameters: &NormalTissueParameters,
    ) -> Result<(), HostError>;

    fn optimize_vmat(&mut self) -> Result<(), HostError>;

    fn optimize(&mut self, run: OptimizationRun) -> Result<(), HostError>;
}

/// The patient-level entry point: courses and the plans inside them.
pub trait PlanningHost {
    type Plan: OptimizationSetup;

    fn course_ids(&self) -> Vec<String>;

    fn add_course(&mut self, course_id: &str) -> Result<(), HostError>;

    /// Create an empty external plan in `course_id` on `structure_set`.
    fn add_external_plan(
        &mut self,
        course_id: &str,
        structure_set: &StructureSet,
    ) -> Result<Self::Plan, HostError>;
}

//! Plan synthesis from a plan template.

use serde::{Deserialize, Serialize};

use rtplan_core::beam::{
    ClosedLeavesMeetingPoint, GantryDirection, JawFitting, OpenLeavesMeetingPoint,
};
use rtplan_core::classify::BeamTechnique;
use rtplan_core::models::{Field, PlanTemplate};
use rtplan_core::{CoreError, geometry::Vector3};
use rtplan_host::plan::{
    ArcBeam, ArcSweep, BeamHandle, BeamSummary, CollimatorFit, ConformalArcBeam,
    MachineParameters, MlcFit, StaticBeam,
};
use rtplan_host::{ExternalPlan, PlanningHost, PlanningItem, StructureSet};

use crate::course::next_course_id;
use crate::error::SynthError;
use crate::isocenter::resolve_isocenter;
use crate::jaw_limit::{exceeds_limit, fit_jaw_to_limit};
use crate::target::resolve_target;

/// Gantry spacing between control points of a conformal arc, degrees.
pub const ARC_CONTROL_POINT_SPACING: f64 = 20.0;

/// Caller choices that take precedence over the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisOverrides {
    /// Target structure id, tried before the field's own target.
    pub target_id: Option<String>,
    /// Treatment unit used for every field.
    pub machine_id: Option<String>,
}

/// The created plan and its beam list, the audit trail of a synthesis.
#[derive(Debug)]
pub struct SynthesizedPlan<P> {
    pub course_id: String,
    pub plan: P,
    pub beams: Vec<BeamSummary>,
}

/// Build a new external plan from `template`.
///
/// When `course_id` is `None` a fresh automatic course is created. Setup
/// fields are skipped. Any fatal condition aborts the whole synthesis; the
/// partially built plan is dropped.
pub fn synthesize_plan<H: PlanningHost>(
    host: &mut H,
    course_id: Option<&str>,
    structure_set: &StructureSet,
    template: &PlanTemplate,
    overrides: &SynthesisOverrides,
) -> Result<SynthesizedPlan<H::Plan>, SynthError> {
    let course_id = match course_id {
        Some(id) => id.to_string(),
        None => {
            let id = next_course_id(&host.course_ids());
            host.add_course(&id)?;
            tracing::info!(course = %id, "created course");
            id
        }
    };

    let mut plan = host.add_external_plan(&course_id, structure_set)?;
    let mut builder = FieldBuilder {
        structure_set,
        template,
        overrides,
        limited_beams: 0,
    };
    for field in template.treatment_fields() {
        builder.add_field(&mut plan, field)?;
    }

    let beams = plan.beams();
    tracing::info!(
        course = %course_id,
        plan = plan.id(),
        template = %template.preview.id,
        beams = beams.len(),
        "plan synthesized"
    );
    for beam in &beams {
        tracing::debug!(
            beam = %beam.id,
            gantry = beam.gantry_angle,
            direction = ?beam.gantry_direction,
            technique = %beam.technique,
            "audit"
        );
    }

    Ok(SynthesizedPlan {
        course_id,
        plan,
        beams,
    })
}

struct FieldBuilder<'a> {
    structure_set: &'a StructureSet,
    template: &'a PlanTemplate,
    overrides: &'a SynthesisOverrides,
    /// Beams narrowed by the VMAT jaw limit so far.
    limited_beams: usize,
}

impl<'a> FieldBuilder<'a> {
    /// Preview style, or the template-level style when the preview has none.
    fn treatment_style(&self) -> &'a str {
        let style = self.template.preview.treatment_style.as_str();
        if style.is_empty() {
            self.template.treatment_style.as_deref().unwrap_or_default()
        } else {
            style
        }
    }

    fn target_override(&self) -> Option<&str> {
        self.overrides.target_id.as_deref()
    }

    fn machine(&self, field: &Field) -> MachineParameters {
        let machine_id = match self.overrides.machine_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => field.treatment_unit.clone(),
        };
        MachineParameters {
            machine_id,
            energy_mode: field.energy.mode(),
            dose_rate: field.dose_rate,
            technique: field.technique.clone(),
            primary_fluence_mode: field.primary_fluence_mode.clone(),
        }
    }

    fn target_id(&self, field: &Field) -> Result<String, SynthError> {
        Ok(resolve_target(self.structure_set, field, self.target_override())?
            .id
            .clone())
    }

    fn add_field<P: ExternalPlan>(&mut self, plan: &mut P, field: &Field) -> Result<(), SynthError> {
        let style = self.treatment_style();
        let technique = BeamTechnique::classify(&field.technique, style).map_err(|err| match err {
            CoreError::UnclassifiedTechnique { technique, style } => {
                SynthError::UnclassifiedTechnique {
                    field_id: field.id.clone(),
                    technique,
                    style,
                }
            }
            other => SynthError::UnsupportedTreatmentStyle(other.to_string()),
        })?;
        if technique == BeamTechnique::Conformal {
            return Err(SynthError::UnsupportedTreatmentStyle(style.to_string()));
        }

        let isocenter = resolve_isocenter(field, self.structure_set, self.target_override())?;
        let handle = match technique {
            BeamTechnique::Arc => self.add_arc(plan, field, isocenter)?,
            _ => self.add_static(plan, field, isocenter)?,
        };
        plan.set_beam_id(handle, &field.id)?;

        tracing::info!(
            field = %field.id,
            technique = ?technique,
            machine = %self.machine(field).machine_id,
            gantry = field.gantry.rtn,
            x = isocenter.x,
            y = isocenter.y,
            z = isocenter.z,
            "beam created"
        );
        Ok(())
    }

    fn add_arc<P: ExternalPlan>(
        &mut self,
        plan: &mut P,
        field: &Field,
        isocenter: Vector3,
    ) -> Result<BeamHandle, SynthError> {
        let stop = field.gantry.stop_rtn.ok_or_else(|| SynthError::MissingField {
            field_id: field.id.clone(),
            field: "gantry stop angle",
        })?;
        let sweep = ArcSweep {
            start: field.gantry.rtn,
            stop,
            direction: GantryDirection::from_template(&field.gantry.rtn_direction),
        };
        let table_angle = field.table_rtn.unwrap_or(0.0);
        let machine = self.machine(field);
        let conformal_arc = || ConformalArcBeam {
            machine: machine.clone(),
            collimator_angle: field.collimator.rtn,
            control_point_spacing: ARC_CONTROL_POINT_SPACING,
            sweep,
            table_angle,
            isocenter,
        };

        if let Some(margin) = field.mlc_margin()
            && let Some(margins) = margin.fit_margins()
        {
            let handle = plan.add_conformal_arc_beam(&conformal_arc())?;
            let mlc_plan = field.mlc_plans.first();
            let fit = MlcFit {
                structure_id: self.target_id(field)?,
                margins,
                optimize_collimator_rotation: margin.optimize_coll_rtn,
                jaw_fitting: JawFitting::from_template(margin.jaw_fitting_mode.as_deref()),
                open_meeting_point: OpenLeavesMeetingPoint::from_template(
                    mlc_plan.map(|p| p.contour_meet_point.as_str()).unwrap_or_default(),
                ),
                closed_meeting_point: ClosedLeavesMeetingPoint::from_template(
                    mlc_plan.map(|p| p.closed_meet_point.as_str()).unwrap_or_default(),
                ),
            };
            plan.fit_mlc_to_structure(handle, &fit)?;
            self.limit_jaws(plan, handle)?;
            Ok(handle)
        } else if field.field_margin.left.is_some() {
            let handle = plan.add_conformal_arc_beam(&conformal_arc())?;
            let fit = self.collimator_fit(field)?;
            plan.fit_collimator_to_structure(handle, &fit)?;
            self.limit_jaws(plan, handle)?;
            Ok(handle)
        } else {
            let beam = ArcBeam {
                machine,
                jaws: field.collimator.jaws_mm(),
                collimator_angle: field.collimator.rtn,
                sweep,
                table_angle,
                isocenter,
            };
            Ok(plan.add_arc_beam(&beam)?)
        }
    }

    fn add_static<P: ExternalPlan>(
        &mut self,
        plan: &mut P,
        field: &Field,
        isocenter: Vector3,
    ) -> Result<BeamHandle, SynthError> {
        let beam = StaticBeam {
            machine: self.machine(field),
            jaws: field.collimator.jaws_mm(),
            collimator_angle: field.collimator.rtn,
            gantry_angle: field.gantry.rtn,
            table_angle: field.table_rtn.unwrap_or(0.0),
            isocenter,
        };
        let handle = plan.add_static_beam(&beam)?;
        if field.field_margin.bev_margin {
            let fit = self.collimator_fit(field)?;
            plan.fit_collimator_to_structure(handle, &fit)?;
        }
        Ok(handle)
    }

    fn collimator_fit(&self, field: &Field) -> Result<CollimatorFit, SynthError> {
        Ok(CollimatorFit {
            structure_id: self.target_id(field)?,
            margins: field.field_margin.fit_margins(),
            asymmetric_x: field.collimator.fit_x(),
            asymmetric_y: field.collimator.fit_y(),
            optimize_collimator_rotation: field.field_margin.optimize_coll_rtn,
        })
    }

    fn limit_jaws<P: ExternalPlan>(
        &mut self,
        plan: &mut P,
        handle: BeamHandle,
    ) -> Result<(), SynthError> {
        if exceeds_limit(&plan.jaw_positions(handle)?) {
            self.limited_beams = fit_jaw_to_limit(plan, self.limited_beams, handle)?;
        }
        Ok(())
    }
}

use rtplan_core::beam::{ClosedLeavesMeetingPoint, GantryDirection, JawFitting, OpenLeavesMeetingPoint};
use rtplan_core::geometry::{FitMargins, JawRect, Vector3};
use rtplan_core::units::{DoseUnit, DoseValue};
use rtplan_host::dvh::{DosePresentation, DvhData, VolumePresentation};
use rtplan_host::memory::{HostCall, MemoryHost, MemoryPlan, MemoryPlanSum};
use rtplan_host::plan::{
    ArcSweep, CollimatorFit, ConformalArcBeam, MachineParameters, MlcFit, StaticBeam,
};
use rtplan_host::{ExternalPlan, HostError, PlanningHost, PlanningItem, Structure, StructureSet};

fn structure_set() -> StructureSet {
    StructureSet {
        id: "CT_1".into(),
        structures: vec![
            Structure {
                id: "PTV".into(),
                dicom_type: "PTV".into(),
                extent: Vector3::new(60.0, 40.0, 80.0),
                volume_cc: 200.0,
                ..Default::default()
            },
            Structure {
                id: "Empty".into(),
                dicom_type: "ORGAN".into(),
                is_empty: true,
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

fn machine() -> MachineParameters {
    MachineParameters {
        machine_id: "TrueBeam".into(),
        energy_mode: "6X".into(),
        dose_rate: 600,
        technique: "STATIC".into(),
        primary_fluence_mode: None,
    }
}

fn static_beam() -> StaticBeam {
    StaticBeam {
        machine: machine(),
        jaws: JawRect::new(-50.0, -50.0, 50.0, 50.0),
        collimator_angle: 0.0,
        gantry_angle: 180.0,
        table_angle: 0.0,
        isocenter: Vector3::default(),
    }
}

#[test]
fn plans_require_an_existing_course() {
    let mut host = MemoryHost::default();
    let err = host.add_external_plan("C1", &structure_set()).unwrap_err();
    assert!(matches!(err, HostError::CourseNotFound(_)));

    host.add_course("C1").unwrap();
    let plan = host.add_external_plan("C1", &structure_set()).unwrap();
    assert_eq!(plan.id(), "Plan1");
    assert!(matches!(host.add_course("C1"), Err(HostError::DuplicateCourse(_))));
}

#[test]
fn new_plans_report_the_system_unit() {
    let mut host = MemoryHost::new(DoseUnit::CGy).with_courses(["C1"]);
    let plan = host.add_external_plan("C1", &structure_set()).unwrap();
    assert_eq!(plan.dose_unit(), DoseUnit::CGy);
}

#[test]
fn beams_get_default_ids_until_renamed() {
    let mut plan = MemoryPlan::new("P", structure_set());
    let handle = plan.add_static_beam(&static_beam()).unwrap();
    assert_eq!(plan.beams()[0].id, "Field 1");

    plan.set_beam_id(handle, "AP").unwrap();
    assert_eq!(plan.beams()[0].id, "AP");
    assert_eq!(plan.beams()[0].gantry_direction, GantryDirection::None);
}

#[test]
fn collimator_fit_surrounds_the_structure() {
    let mut plan = MemoryPlan::new("P", structure_set());
    let handle = plan.add_static_beam(&static_beam()).unwrap();
    plan.fit_collimator_to_structure(
        handle,
        &CollimatorFit {
            structure_id: "PTV".into(),
            margins: FitMargins::new(5.0, 2.0, 10.0, 3.0),
            asymmetric_x: true,
            asymmetric_y: false,
            optimize_collimator_rotation: false,
        },
    )
    .unwrap();

    let jaws = plan.jaw_positions(handle).unwrap();
    assert_eq!(jaws, JawRect::new(-35.0, -43.0, 40.0, 43.0));
}

#[test]
fn fitting_to_an_empty_structure_is_rejected() {
    let mut plan = MemoryPlan::new("P", structure_set());
    let handle = plan.add_static_beam(&static_beam()).unwrap();
    let err = plan
        .fit_mlc_to_structure(
            handle,
            &MlcFit {
                structure_id: "Empty".into(),
                margins: FitMargins::default(),
                optimize_collimator_rotation: false,
                jaw_fitting: JawFitting::FitToRecommended,
                open_meeting_point: OpenLeavesMeetingPoint::Middle,
                closed_meeting_point: ClosedLeavesMeetingPoint::Center,
            },
        )
        .unwrap_err();
    assert!(matches!(err, HostError::Rejected { .. }));
}

#[test]
fn conformal_arcs_record_their_sweep() {
    let mut plan = MemoryPlan::new("P", structure_set());
    let arc = ConformalArcBeam {
        machine: machine(),
        collimator_angle: 30.0,
        control_point_spacing: 20.0,
        sweep: ArcSweep {
            start: 181.0,
            stop: 179.0,
            direction: GantryDirection::Clockwise,
        },
        table_angle: 0.0,
        isocenter: Vector3::default(),
    };
    plan.add_conformal_arc_beam(&arc).unwrap();

    assert_eq!(plan.calls(), &[HostCall::AddConformalArcBeam(arc)]);
    assert!(plan.beams()[0].gantry_direction.is_rotating());
}

#[test]
fn crossed_jaws_are_rejected() {
    let mut plan = MemoryPlan::new("P", structure_set());
    let handle = plan.add_static_beam(&static_beam()).unwrap();
    let err = plan
        .set_jaw_positions(handle, JawRect::new(10.0, -10.0, -10.0, 10.0))
        .unwrap_err();
    assert!(matches!(err, HostError::Rejected { .. }));
}

#[test]
fn dvh_presentations_are_derived_from_the_stored_curve() {
    let dvh = DvhData::from_samples(&[(0.0, 100.0), (20.0, 100.0), (40.0, 50.0), (50.0, 0.0)]);
    let mut plan = MemoryPlan::new("P", structure_set()).with_dvh("PTV", dvh);

    let absolute = plan
        .cumulative_dvh("PTV", DosePresentation::Absolute, VolumePresentation::AbsoluteCm3, 0.01)
        .unwrap();
    assert_eq!(absolute.curve[2].volume, 100.0);
    assert_eq!(absolute.max_dose, 50.0);
    assert_eq!(absolute.min_dose, 20.0);

    let err = plan
        .cumulative_dvh("PTV", DosePresentation::Relative, VolumePresentation::Relative, 0.1)
        .unwrap_err();
    assert!(matches!(err, HostError::Rejected { .. }));

    plan.set_prescription(25, DoseValue::gy(2.0), 100.0).unwrap();
    let relative = plan
        .cumulative_dvh("PTV", DosePresentation::Relative, VolumePresentation::Relative, 0.1)
        .unwrap();
    assert!((relative.max_dose - 100.0).abs() < 1e-9);
}

#[test]
fn dvh_of_unknown_structure_is_an_error() {
    let plan = MemoryPlan::new("P", structure_set());
    assert!(matches!(
        plan.cumulative_dvh("Bladder", DosePresentation::Absolute, VolumePresentation::Relative, 0.01),
        Err(HostError::StructureNotFound(_))
    ));
    assert!(matches!(
        plan.cumulative_dvh("PTV", DosePresentation::Absolute, VolumePresentation::Relative, 0.01),
        Err(HostError::NoDoseData(_))
    ));
}

#[test]
fn plan_sum_takes_the_first_plans_unit() {
    let first = MemoryPlan::new("A", structure_set()).with_dose_unit(DoseUnit::CGy);
    let second = MemoryPlan::new("B", structure_set()).with_dose_unit(DoseUnit::Gy);
    let sum = MemoryPlanSum::new("Sum", vec![first, second]);
    assert_eq!(sum.dose_unit(), DoseUnit::CGy);
    assert_eq!(sum.structure_set().id, "CT_1");

    let empty = MemoryPlanSum::new("Empty", Vec::new());
    assert_eq!(empty.dose_unit(), DoseUnit::Unknown);
}

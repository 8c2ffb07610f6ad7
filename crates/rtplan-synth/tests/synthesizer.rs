use rtplan_core::beam::{ClosedLeavesMeetingPoint, GantryDirection, JawFitting, OpenLeavesMeetingPoint};
use rtplan_core::geometry::{FitMargins, JawRect, Vector3};
use rtplan_core::models::{
    Collimator, Energy, Field, FieldMargin, Gantry, Isocenter, IsocenterPlacement, MlcMargin,
    MlcPlan, PlanTemplate, Preview, Target,
};
use rtplan_core::units::{DoseUnit, DoseValue};
use rtplan_host::memory::{HostCall, MemoryHost};
use rtplan_host::{ExternalPlan, ImageGeometry, PlanningHost, Structure, StructureSet};
use rtplan_synth::prescription::apply_prescription;
use rtplan_synth::{SynthError, SynthesisOverrides, synthesize_plan};

fn structure_set() -> StructureSet {
    StructureSet {
        id: "CT_1".into(),
        image: ImageGeometry {
            user_origin: Vector3::new(0.0, 0.0, 0.0),
            origin: Vector3::new(-250.0, -250.0, -100.0),
        },
        structures: vec![
            Structure {
                id: "PTV".into(),
                dicom_type: "PTV".into(),
                center_point: Vector3::new(12.0, -4.0, 30.0),
                extent: Vector3::new(200.0, 80.0, 100.0),
                ..Default::default()
            },
            Structure {
                id: "Boost".into(),
                dicom_type: "PTV".into(),
                center_point: Vector3::new(5.0, 5.0, 5.0),
                extent: Vector3::new(40.0, 40.0, 40.0),
                ..Default::default()
            },
        ],
    }
}

fn field(id: &str, technique: &str) -> Field {
    Field {
        id: id.into(),
        treatment_unit: "TrueBeam".into(),
        technique: technique.into(),
        energy: Energy {
            energy_kv: 6000.0,
            kind: "X".into(),
        },
        dose_rate: 600,
        gantry: Gantry {
            rtn: 181.0,
            stop_rtn: Some(179.0),
            rtn_direction: "CW".into(),
        },
        collimator: Collimator {
            x1: -5.0,
            y1: -6.0,
            x2: 5.0,
            y2: 6.0,
            rtn: 30.0,
            mode: "XY".into(),
        },
        target: Target {
            volume_id: Some("PTV".into()),
            structure_code: None,
        },
        isocenter: Isocenter {
            placement: IsocenterPlacement::Afts,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn template(style: &str, fields: Vec<Field>) -> PlanTemplate {
    PlanTemplate {
        preview: Preview {
            id: "Prostate VMAT".into(),
            treatment_style: style.into(),
            ..Default::default()
        },
        fields,
        ..Default::default()
    }
}

#[test]
fn creates_an_auto_course_when_none_is_given() {
    let mut host = MemoryHost::default().with_courses(["Auto1", "Auto3", "Auto7"]);
    let result = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("IMRT", vec![field("AP", "STATIC")]),
        &SynthesisOverrides::default(),
    )
    .unwrap();

    assert_eq!(result.course_id, "Auto8");
    assert!(host.course_ids().contains(&"Auto8".to_string()));
}

#[test]
fn uses_the_given_course() {
    let mut host = MemoryHost::default().with_courses(["C1"]);
    let result = synthesize_plan(
        &mut host,
        Some("C1"),
        &structure_set(),
        &template("IMRT", vec![field("AP", "STATIC")]),
        &SynthesisOverrides::default(),
    )
    .unwrap();
    assert_eq!(result.course_id, "C1");
    assert_eq!(host.course_ids(), vec!["C1".to_string()]);
}

#[test]
fn setup_fields_are_skipped() {
    let mut setup = field("CBCT", "STATIC");
    setup.setup = true;
    let fields = vec![setup, field("AP", "STATIC"), field("PA", "STATIC")];

    let mut host = MemoryHost::default();
    let result = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("IMRT", fields),
        &SynthesisOverrides::default(),
    )
    .unwrap();

    let ids: Vec<_> = result.beams.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["AP", "PA"]);
}

#[test]
fn imrt_static_beam_carries_field_geometry() {
    let mut host = MemoryHost::default();
    let mut f = field("AP", "STATIC");
    f.table_rtn = Some(90.0);
    let result = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("IMRT", vec![f]),
        &SynthesisOverrides::default(),
    )
    .unwrap();

    let HostCall::AddStaticBeam(beam) = &result.plan.calls()[0] else {
        panic!("expected a static beam, got {:?}", result.plan.calls()[0]);
    };
    assert_eq!(beam.machine.machine_id, "TrueBeam");
    assert_eq!(beam.machine.energy_mode, "6X");
    assert_eq!(beam.jaws, JawRect::new(-50.0, -60.0, 50.0, 60.0));
    assert_eq!(beam.gantry_angle, 181.0);
    assert_eq!(beam.collimator_angle, 30.0);
    assert_eq!(beam.table_angle, 90.0);
    assert_eq!(beam.isocenter, Vector3::new(12.0, -4.0, 30.0));
}

#[test]
fn machine_override_applies_to_every_field() {
    let mut host = MemoryHost::default();
    let overrides = SynthesisOverrides {
        machine_id: Some("Halcyon".into()),
        ..Default::default()
    };
    let result = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("IMRT", vec![field("AP", "STATIC"), field("PA", "STATIC")]),
        &overrides,
    )
    .unwrap();

    for call in result.plan.calls() {
        if let HostCall::AddStaticBeam(beam) = call {
            assert_eq!(beam.machine.machine_id, "Halcyon");
        }
    }
}

#[test]
fn target_override_moves_the_isocenter() {
    let mut host = MemoryHost::default();
    let overrides = SynthesisOverrides {
        target_id: Some("Boost".into()),
        ..Default::default()
    };
    let result = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("IMRT", vec![field("AP", "STATIC")]),
        &overrides,
    )
    .unwrap();
    let beam = result.plan.beam(result.beams[0].handle).unwrap();
    assert_eq!(beam.isocenter, Vector3::new(5.0, 5.0, 5.0));
}

#[test]
fn bev_margin_fits_the_collimator() {
    let mut f = field("AP", "STATIC");
    f.field_margin = FieldMargin {
        bev_margin: true,
        left: Some(5.0),
        right: Some(7.0),
        ..Default::default()
    };
    let mut host = MemoryHost::default();
    let result = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("IMRT", vec![f]),
        &SynthesisOverrides::default(),
    )
    .unwrap();

    let fit = result
        .plan
        .calls()
        .iter()
        .find_map(|call| match call {
            HostCall::FitCollimator { fit, .. } => Some(fit.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(fit.structure_id, "PTV");
    assert_eq!(fit.margins, FitMargins::new(5.0, 0.0, 7.0, 0.0));
    assert!(fit.asymmetric_x && fit.asymmetric_y);
}

#[test]
fn arc_without_margins_is_a_simple_arc() {
    let mut host = MemoryHost::default();
    let result = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("VMAT", vec![field("CW", "ARC")]),
        &SynthesisOverrides::default(),
    )
    .unwrap();

    let HostCall::AddArcBeam(beam) = &result.plan.calls()[0] else {
        panic!("expected an arc beam");
    };
    assert_eq!(beam.sweep.start, 181.0);
    assert_eq!(beam.sweep.stop, 179.0);
    assert_eq!(beam.sweep.direction, GantryDirection::Clockwise);
    assert_eq!(beam.jaws, JawRect::new(-50.0, -60.0, 50.0, 60.0));
}

#[test]
fn arc_with_mlc_margin_fits_the_mlc_then_limits_the_jaws() {
    let mut first = field("CW", "ARC");
    first.mlc_plans = vec![MlcPlan {
        id: "MLC1".into(),
        mlc_margin: Some(MlcMargin {
            left: Some(5.0),
            top: Some(8.0),
            optimize_coll_rtn: true,
            jaw_fitting_mode: Some("1".into()),
            ..Default::default()
        }),
        contour_meet_point: "Outside".into(),
        closed_meet_point: "Bank B".into(),
        ..Default::default()
    }];
    let mut second = first.clone();
    second.id = "CCW".into();
    second.gantry.rtn_direction = "CC".into();

    let mut host = MemoryHost::default();
    let result = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("VMAT", vec![first, second]),
        &SynthesisOverrides::default(),
    )
    .unwrap();
    let calls = result.plan.calls();

    let HostCall::AddConformalArcBeam(arc) = &calls[0] else {
        panic!("expected a conformal arc");
    };
    assert_eq!(arc.control_point_spacing, 20.0);

    let HostCall::FitMlc { fit, .. } = &calls[1] else {
        panic!("expected an MLC fit");
    };
    assert_eq!(fit.margins, FitMargins::new(5.0, 5.0, 5.0, 8.0));
    assert!(fit.optimize_collimator_rotation);
    assert_eq!(fit.jaw_fitting, JawFitting::FitToRecommended);
    assert_eq!(fit.open_meeting_point, OpenLeavesMeetingPoint::Outside);
    assert_eq!(fit.closed_meeting_point, ClosedLeavesMeetingPoint::BankTwo);

    // PTV is 200 mm wide, fitted to 210 mm, so both arcs are narrowed.
    let first_jaws = result.plan.jaw_positions(result.beams[0].handle).unwrap();
    let second_jaws = result.plan.jaw_positions(result.beams[1].handle).unwrap();
    assert!((first_jaws.x1 + 95.0).abs() < 0.01 && (first_jaws.x2 - 55.0).abs() < 0.01);
    assert!((second_jaws.x1 + 55.0).abs() < 0.01 && (second_jaws.x2 - 95.0).abs() < 0.01);
    assert_eq!(result.beams[1].gantry_direction, GantryDirection::CounterClockwise);
}

#[test]
fn arc_with_field_margin_fits_the_collimator() {
    let mut f = field("CW", "ARC");
    f.collimator.mode = "X".into();
    f.field_margin = FieldMargin {
        left: Some(3.0),
        ..Default::default()
    };
    let mut host = MemoryHost::default();
    let overrides = SynthesisOverrides {
        target_id: Some("Boost".into()),
        ..Default::default()
    };
    let result = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("VMAT", vec![f]),
        &overrides,
    )
    .unwrap();

    let calls = result.plan.calls();
    assert!(matches!(calls[0], HostCall::AddConformalArcBeam(_)));
    let HostCall::FitCollimator { fit, .. } = &calls[1] else {
        panic!("expected a collimator fit");
    };
    assert_eq!(fit.structure_id, "Boost");
    assert!(fit.asymmetric_x && !fit.asymmetric_y);
    // Boost is narrow enough that no jaw edit follows.
    assert!(!calls.iter().any(|c| matches!(c, HostCall::SetJawPositions { .. })));
}

#[test]
fn arc_without_stop_angle_is_rejected() {
    let mut f = field("CW", "ARC");
    f.gantry.stop_rtn = None;
    let mut host = MemoryHost::default();
    let err = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("VMAT", vec![f]),
        &SynthesisOverrides::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SynthError::MissingField { .. }));
}

#[test]
fn conformal_style_is_unsupported() {
    let mut host = MemoryHost::default();
    let err = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("3D Conformal", vec![field("AP", "STATIC")]),
        &SynthesisOverrides::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SynthError::UnsupportedTreatmentStyle(style) if style == "3D Conformal"));
}

#[test]
fn unknown_style_cannot_be_classified() {
    let mut host = MemoryHost::default();
    let err = synthesize_plan(
        &mut host,
        None,
        &structure_set(),
        &template("Electron", vec![field("AP", "STATIC")]),
        &SynthesisOverrides::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SynthError::UnclassifiedTechnique { field_id, .. } if field_id == "AP"
    ));
}

#[test]
fn missing_target_aborts_synthesis() {
    let mut host = MemoryHost::default();
    let err = synthesize_plan(
        &mut host,
        None,
        &StructureSet::default(),
        &template("IMRT", vec![field("AP", "STATIC")]),
        &SynthesisOverrides::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SynthError::TargetNotFound { .. }));
}

#[test]
fn prescription_is_sent_in_the_system_unit() {
    let mut host = MemoryHost::new(DoseUnit::CGy).with_courses(["C1"]);
    let mut plan = host.add_external_plan("C1", &structure_set()).unwrap();
    let rx = PlanTemplate {
        fraction_count: Some(28),
        dose_per_fraction: Some(2.5),
        prescribed_percentage: Some(100.0),
        ..Default::default()
    };
    apply_prescription(&mut plan, &rx, DoseUnit::CGy).unwrap();

    assert_eq!(
        plan.calls(),
        &[HostCall::SetPrescription {
            fractions: 28,
            dose_per_fraction: DoseValue::new(250.0, DoseUnit::CGy),
            prescribed_percentage: 100.0,
        }]
    );
}

#[test]
fn prescription_needs_every_value() {
    let mut host = MemoryHost::default().with_courses(["C1"]);
    let mut plan = host.add_external_plan("C1", &structure_set()).unwrap();
    let rx = PlanTemplate {
        fraction_count: Some(28),
        dose_per_fraction: Some(2.5),
        ..Default::default()
    };
    let err = apply_prescription(&mut plan, &rx, DoseUnit::Gy).unwrap_err();
    assert!(matches!(
        err,
        SynthError::MissingField { field: "prescribed percentage", .. }
    ));
}

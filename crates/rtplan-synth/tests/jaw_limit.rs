use rtplan_core::geometry::{JawRect, Vector3};
use rtplan_host::ExternalPlan;
use rtplan_host::memory::MemoryPlan;
use rtplan_host::plan::{MachineParameters, StaticBeam};
use rtplan_host::StructureSet;
use rtplan_synth::jaw_limit::{exceeds_limit, fit_jaw_to_limit, limited_jaws};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn even_beams_pull_x2_further() {
    let jaws = limited_jaws(0, JawRect::new(-100.0, -80.0, 100.0, 80.0));
    assert!(close(jaws.x1, -90.0));
    assert!(close(jaws.x2, 60.0));
    assert_eq!((jaws.y1, jaws.y2), (-80.0, 80.0));
}

#[test]
fn odd_beams_pull_x1_further() {
    let jaws = limited_jaws(1, JawRect::new(-100.0, -80.0, 100.0, 80.0));
    assert!(close(jaws.x1, -60.0));
    assert!(close(jaws.x2, 90.0));
}

#[test]
fn limited_width_is_exactly_the_limit() {
    let jaws = limited_jaws(4, JawRect::new(-73.5, -10.0, 112.0, 10.0));
    assert!(close(jaws.width(), 150.0));
    assert!(!exceeds_limit(&jaws));
    assert!(exceeds_limit(&JawRect::new(-75.1, 0.0, 75.0, 0.0)));
    assert!(!exceeds_limit(&JawRect::new(-75.0, 0.0, 75.0, 0.0)));
}

#[test]
fn fitting_returns_the_next_index() {
    let mut plan = MemoryPlan::new("P", StructureSet::default());
    let beam = StaticBeam {
        machine: MachineParameters::default(),
        jaws: JawRect::new(-100.0, -100.0, 100.0, 100.0),
        collimator_angle: 0.0,
        gantry_angle: 0.0,
        table_angle: 0.0,
        isocenter: Vector3::default(),
    };
    let first = plan.add_static_beam(&beam).unwrap();
    let second = plan.add_static_beam(&beam).unwrap();

    let next = fit_jaw_to_limit(&mut plan, 0, first).unwrap();
    assert_eq!(next, 1);
    let next = fit_jaw_to_limit(&mut plan, next, second).unwrap();
    assert_eq!(next, 2);

    let a = plan.jaw_positions(first).unwrap();
    let b = plan.jaw_positions(second).unwrap();
    assert!(close(a.x1, -90.0) && close(a.x2, 60.0));
    assert!(close(b.x1, -60.0) && close(b.x2, 90.0));
}

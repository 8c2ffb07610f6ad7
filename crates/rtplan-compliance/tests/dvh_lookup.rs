use rtplan_compliance::dvh_lookup::{dose_at_volume, volume_at_dose};
use rtplan_host::dvh::DvhData;

fn dvh() -> DvhData {
    DvhData::from_samples(&[
        (0.0, 100.0),
        (40.0, 100.0),
        (45.0, 95.0),
        (50.0, 50.0),
        (55.0, 5.0),
    ])
}

#[test]
fn full_relative_volume_is_the_minimum_dose() {
    assert_eq!(dose_at_volume(&dvh(), 100.0, true), Some(40.0));
}

#[test]
fn full_absolute_volume_uses_the_curve() {
    // 100 cc is not special.
    assert_eq!(dose_at_volume(&dvh(), 100.0, false), Some(0.0));
}

#[test]
fn volume_below_the_curve_is_the_maximum_dose() {
    assert_eq!(dose_at_volume(&dvh(), 2.0, true), Some(55.0));
}

#[test]
fn dose_is_taken_from_the_first_sample_at_or_below_the_volume() {
    assert_eq!(dose_at_volume(&dvh(), 95.0, true), Some(45.0));
    assert_eq!(dose_at_volume(&dvh(), 60.0, true), Some(50.0));
}

#[test]
fn volume_above_the_curve_dose_is_zero() {
    assert_eq!(volume_at_dose(&dvh(), 70.0), Some(0.0));
}

#[test]
fn volume_is_taken_from_the_first_sample_at_or_above_the_dose() {
    assert_eq!(volume_at_dose(&dvh(), 50.0), Some(50.0));
    assert_eq!(volume_at_dose(&dvh(), 47.0), Some(50.0));
    assert_eq!(volume_at_dose(&dvh(), 55.0), Some(5.0));
}

#[test]
fn empty_curve_has_no_answer() {
    let empty = DvhData::default();
    assert_eq!(dose_at_volume(&empty, 100.0, true), None);
    assert_eq!(volume_at_dose(&empty, 10.0), None);
}

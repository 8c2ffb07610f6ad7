//! Point lookups on a cumulative DVH.

use rtplan_host::dvh::DvhData;

/// Dose received by at least `volume` of the structure.
///
/// Exactly 100% of a relative-volume curve is the minimum dose. Volumes
/// smaller than anything on the curve get the maximum dose. Otherwise the
/// dose of the first sample at or below `volume`. `None` for an empty curve.
pub fn dose_at_volume(dvh: &DvhData, volume: f64, relative_volume: bool) -> Option<f64> {
    let min_volume = dvh.min_volume()?;
    if relative_volume && volume == 100.0 {
        return Some(dvh.min_dose);
    }
    if volume < min_volume {
        return Some(dvh.max_dose);
    }
    dvh.curve
        .iter()
        .find(|point| point.volume <= volume)
        .map(|point| point.dose)
}

/// Volume receiving at least `dose`: zero above the curve's highest dose,
/// otherwise the volume of the first sample at or above `dose`.
pub fn volume_at_dose(dvh: &DvhData, dose: f64) -> Option<f64> {
    let max_dose = dvh.max_curve_dose()?;
    if dose > max_dose {
        return Some(0.0);
    }
    dvh.curve
        .iter()
        .find(|point| point.dose >= dose)
        .map(|point| point.volume)
}

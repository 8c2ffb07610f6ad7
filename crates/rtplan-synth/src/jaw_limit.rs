//! VMAT jaw-width limit.
//!
//! Arcs fitted wider than the limit are narrowed to exactly the limit.
//! The larger pull alternates between X2 and X1 on successive beams so
//! the apertures of a multi-arc plan do not all shift the same way.

use rtplan_core::geometry::JawRect;
use rtplan_host::ExternalPlan;
use rtplan_host::plan::BeamHandle;

use crate::error::SynthError;

pub const VMAT_MAX_JAW_WIDTH_MM: f64 = 150.0;

const JAW_PULL_MM: f64 = 10.0;

pub fn exceeds_limit(jaws: &JawRect) -> bool {
    jaws.width() > VMAT_MAX_JAW_WIDTH_MM
}

/// Jaws narrowed for the `beam_index`-th over-wide beam. Y is untouched.
pub fn limited_jaws(beam_index: usize, jaws: JawRect) -> JawRect {
    let excess = jaws.width() - VMAT_MAX_JAW_WIDTH_MM;
    let (x1, x2) = if beam_index % 2 == 0 {
        (jaws.x1 + JAW_PULL_MM, jaws.x2 - excess + JAW_PULL_MM)
    } else {
        (jaws.x1 + excess - JAW_PULL_MM, jaws.x2 - JAW_PULL_MM)
    };
    JawRect::new(x1, jaws.y1, x2, jaws.y2)
}

/// Narrow `beam` on `plan` and return the next beam index.
pub fn fit_jaw_to_limit<P: ExternalPlan + ?Sized>(
    plan: &mut P,
    beam_index: usize,
    beam: BeamHandle,
) -> Result<usize, SynthError> {
    let jaws = plan.jaw_positions(beam)?;
    let limited = limited_jaws(beam_index, jaws);
    tracing::debug!(
        beam = beam.0,
        beam_index,
        from_x1 = jaws.x1,
        from_x2 = jaws.x2,
        to_x1 = limited.x1,
        to_x2 = limited.x2,
        "narrowed jaws to VMAT limit"
    );
    plan.set_jaw_positions(beam, limited)?;
    Ok(beam_index + 1)
}

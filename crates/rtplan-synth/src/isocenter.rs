use rtplan_core::geometry::Vector3;
use rtplan_core::models::{Field, IsocenterPlacement};
use rtplan_host::StructureSet;

use crate::error::SynthError;
use crate::target::resolve_target;

/// Isocenter of `field`, patient coordinates in mm.
///
/// Target-relative placements snap to whole millimetres from the user
/// origin. Placements with no rule of their own (viewing-plane
/// intersection, unspecified) fall back to the user origin.
pub fn resolve_isocenter(
    field: &Field,
    structure_set: &StructureSet,
    target_override: Option<&str>,
) -> Result<Vector3, SynthError> {
    let image = &structure_set.image;
    let offset = field.isocenter.offset();

    let placement = field.isocenter.placement;

    if placement.uses_target() {
        let center = resolve_target(structure_set, field, target_override)?.center_point;
        return Ok(match placement {
            IsocenterPlacement::Rfts => (center + offset).snap_to_grid(image.user_origin),
            _ => center,
        });
    }
    let isocenter = match placement {
        IsocenterPlacement::Rio => image.user_origin + offset,
        IsocenterPlacement::Aic => image.origin,
        IsocenterPlacement::Ric => image.origin + offset,
        _ => image.user_origin,
    };
    Ok(isocenter)
}

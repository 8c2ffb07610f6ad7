//! Target structure resolution.
//!
//! Candidates are tried in a fixed order and the first hit wins:
//! the caller's override id, the field's target volume id, the field's
//! structure code, then the first structure whose DICOM type contains "PTV".

use rtplan_core::models::Field;
use rtplan_host::structure::PTV_DICOM_TYPE;
use rtplan_host::{Structure, StructureSet};

use crate::error::SynthError;

type Resolver = for<'s> fn(&'s StructureSet, &Field, Option<&str>) -> Option<&'s Structure>;

const RESOLVERS: &[(&str, Resolver)] = &[
    ("override", by_override),
    ("volume id", by_volume_id),
    ("structure code", by_structure_code),
    ("PTV", by_dicom_type),
];

fn by_override<'s>(
    structure_set: &'s StructureSet,
    _field: &Field,
    override_id: Option<&str>,
) -> Option<&'s Structure> {
    override_id
        .filter(|id| !id.is_empty())
        .and_then(|id| structure_set.structure(id))
}

fn by_volume_id<'s>(
    structure_set: &'s StructureSet,
    field: &Field,
    _override_id: Option<&str>,
) -> Option<&'s Structure> {
    field
        .target
        .volume_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .and_then(|id| structure_set.structure(id))
}

fn by_structure_code<'s>(
    structure_set: &'s StructureSet,
    field: &Field,
    _override_id: Option<&str>,
) -> Option<&'s Structure> {
    field
        .target
        .structure_code
        .as_ref()
        .and_then(|code| structure_set.structure_by_code(&code.code))
}

fn by_dicom_type<'s>(
    structure_set: &'s StructureSet,
    _field: &Field,
    _override_id: Option<&str>,
) -> Option<&'s Structure> {
    structure_set.structure_by_type(PTV_DICOM_TYPE)
}

pub fn resolve_target<'s>(
    structure_set: &'s StructureSet,
    field: &Field,
    override_id: Option<&str>,
) -> Result<&'s Structure, SynthError> {
    for (rule, resolve) in RESOLVERS {
        if let Some(structure) = resolve(structure_set, field, override_id) {
            tracing::debug!(field = %field.id, structure = %structure.id, rule, "resolved target");
            return Ok(structure);
        }
    }
    Err(SynthError::TargetNotFound {
        field_id: field.id.clone(),
    })
}

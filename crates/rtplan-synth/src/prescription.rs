use rtplan_core::models::PlanTemplate;
use rtplan_core::units::{DoseUnit, DoseValue};
use rtplan_host::ExternalPlan;

use crate::error::SynthError;

/// Copy the template's prescription onto `plan`.
///
/// Fraction count, dose per fraction and prescribed percentage must all be
/// present. Dose per fraction is sent in `system_unit`.
pub fn apply_prescription<P: ExternalPlan + ?Sized>(
    plan: &mut P,
    template: &PlanTemplate,
    system_unit: DoseUnit,
) -> Result<(), SynthError> {
    let missing = |field| SynthError::MissingField {
        field_id: template.preview.id.clone(),
        field,
    };
    let fractions = template.fraction_count.ok_or_else(|| missing("fraction count"))?;
    let dose_per_fraction = template
        .dose_per_fraction
        .ok_or_else(|| missing("dose per fraction"))?;
    let percentage = template
        .prescribed_percentage
        .ok_or_else(|| missing("prescribed percentage"))?;

    let dose = DoseValue::from_template_gy(dose_per_fraction, system_unit);
    plan.set_prescription(fractions, dose, percentage)?;
    tracing::info!(
        plan = plan.id(),
        fractions,
        dose_per_fraction = %dose,
        percentage,
        "prescription applied"
    );
    Ok(())
}

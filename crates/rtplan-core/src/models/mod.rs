//! Template data model.
//!
//! Built once per session by an external loader and treated as read-only
//! afterwards.

pub mod objective_template;
pub mod plan_template;
pub mod prescription;
pub mod preview;
pub mod protocol;

pub use objective_template::{
    Helios, NormalTissueObjective, Objective, ObjectiveOperator, ObjectiveTemplate, ObjectiveType,
    StructureObjectives,
};
pub use plan_template::{
    Collimator, Energy, Field, FieldMargin, Gantry, Isocenter, IsocenterPlacement, MlcMargin,
    MlcPlan, PlanTemplate, PrescriptionSite, StructureCode, Target,
};
pub use prescription::{Item, ItemModifier, MeasureItem, MeasureModifier, MeasureType, Prescription};
pub use preview::Preview;
pub use protocol::{Phase, Protocol};

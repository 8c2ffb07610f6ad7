use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("structure not found: {0}")]
    StructureNotFound(String),

    #[error("beam not found: {0}")]
    BeamNotFound(usize),

    #[error("course not found: {0}")]
    CourseNotFound(String),

    #[error("course already exists: {0}")]
    DuplicateCourse(String),

    #[error("no dose-volume data for structure {0}")]
    NoDoseData(String),

    #[error("planning system rejected {operation}: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },
}

use rtplan_host::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("planning system error: {0}")]
    Host(#[from] HostError),
}

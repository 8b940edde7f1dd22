use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClimatologyError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    #[error("parameter name must not be blank")]
    EmptyParameter,

    #[error("parameter {0:?} not present in the POWER series")]
    ParameterNotFound(String),
}

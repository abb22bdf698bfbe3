use thiserror::Error;

/// Malformed per-cycle input, rejected at the boundary before `update` runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("cycle index must increase: {prev} -> {next}")]
    NonMonotonicCycle { prev: u64, next: u64 },
}

#[derive(Debug, Error, Clone)]
pub enum ControllerError {
    #[error("invalid input at cycle {cycle}: {source}")]
    Input {
        cycle: u64,
        #[source]
        source: InputError,
    },
    #[error("trace line {line}: {msg}")]
    Trace { line: usize, msg: String },
    #[error("frame sink failed: {0}")]
    Sink(String),
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing vehicle model")]
    MissingModel,
    #[error("unknown vehicle model: {0}")]
    UnknownModel(String),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

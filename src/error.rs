use thiserror::Error;

#[derive(Error, Debug)]
pub enum CombustionError {
    /// Mechanism, case or results file could not be read or written
    #[error("unable to access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Mechanism or case file is not valid JSON for the expected layout
    #[error("unable to parse {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    /// Inconsistent mechanism data (missing species, bad polynomial tables, ...)
    #[error("invalid mechanism: {0}")]
    Mechanism(String),

    /// Species name not present in the gas phase
    #[error("{0} not found in 'speciesArray'")]
    UnknownSpecies(String),

    /// Invalid or out-of-range input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Equilibrium or root solver failed
    #[error("{solver} did not converge: {message}")]
    Convergence { solver: &'static str, message: String },

    #[error("plotting failed: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, CombustionError>;

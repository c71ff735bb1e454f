use thiserror::Error;

/// The only failure the engine surfaces to callers. Everything else
/// (unknown problem types, tie scores, empty history, external-classifier
/// failures) resolves to a documented deterministic default.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

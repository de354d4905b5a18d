use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Aligned inputs disagree in shape, or a sentence id is reused.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// Estimation was attempted without a single training token.
    #[error("cannot estimate a model from empty training data")]
    EmptyModel,
    /// Every complete tag path has zero probability.
    #[error("no viterbi path with nonzero probability")]
    NoViterbiPath,
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

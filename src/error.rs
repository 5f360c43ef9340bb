use thiserror::Error;

/// Errors surfaced by [`NaiveBayesClassifier`](crate::bayes::NaiveBayesClassifier).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BayesError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("model has not been trained; call fit first")]
    ModelNotTrained,
}

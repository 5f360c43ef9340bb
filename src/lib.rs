//! Multinomial naive Bayes for short text messages.
//!
//! [`mod@tokenize`] normalizes text into word tokens, [`bayes`] holds the
//! classifier itself, and [`dataset`] plus [`config`] cover loading labeled
//! messages and running a train/test evaluation.
pub mod bayes;
pub mod config;
pub mod dataset;
pub mod error;
pub mod tokenize;

pub use bayes::NaiveBayesClassifier;
pub use error::BayesError;
pub use tokenize::{tokenize, Tokenizer};

use log::debug;
use std::{
    collections::{hash_map::Entry, BTreeMap, HashMap, HashSet},
    hash::Hash,
};

use crate::{error::BayesError, tokenize::Tokenizer};

/// Laplace smoothing.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Per-class parameters, all stored in log space.
#[derive(Debug, Clone)]
struct ClassParams {
    log_prior: f64,
    log_likelihoods: HashMap<String, f64>,
    unknown_log_likelihood: f64,
}

#[derive(Debug, Clone)]
struct TrainedModel<L> {
    vocabulary: HashSet<String>,
    // Sorted so that iteration order, and with it the tie-break, is stable.
    classes: BTreeMap<L, ClassParams>,
}

#[derive(Debug, Default)]
struct ClassCounts {
    num_docs: usize,
    num_words: usize,
    word_counts: HashMap<String, usize>,
}

/// Multinomial naive Bayes over bag-of-words token counts.
///
/// Labels can be any type with a total order; the order decides ties, where
/// the smallest label wins.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier<L> {
    alpha: f64,
    tokenizer: Tokenizer,
    model: Option<TrainedModel<L>>,
}

impl<L> Default for NaiveBayesClassifier<L> {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            tokenizer: Tokenizer::default(),
            model: None,
        }
    }
}

impl<L> NaiveBayesClassifier<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the additive smoothing constant. Checked when `fit` runs.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.model.as_ref().map_or(0, |model| model.vocabulary.len())
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.model
            .as_ref()
            .is_some_and(|model| model.vocabulary.contains(word))
    }

    fn trained(&self) -> Result<&TrainedModel<L>, BayesError> {
        self.model.as_ref().ok_or(BayesError::ModelNotTrained)
    }
}

impl<L: Clone + Eq + Hash + Ord> NaiveBayesClassifier<L> {
    /// Estimates class priors and smoothed per-word likelihoods.
    ///
    /// Any previously trained parameters are discarded. On error the model is
    /// left exactly as it was.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S], labels: &[L]) -> Result<(), BayesError> {
        if documents.len() != labels.len() {
            return Err(BayesError::InvalidInput(format!(
                "got {} documents but {} labels",
                documents.len(),
                labels.len()
            )));
        }
        if documents.is_empty() {
            return Err(BayesError::InvalidInput(
                "training set is empty".to_string(),
            ));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(BayesError::InvalidInput(format!(
                "smoothing constant must be positive and finite, got {}",
                self.alpha
            )));
        }

        // Count documents and word occurrences per class:

        let mut class_counts: HashMap<L, ClassCounts> = HashMap::new();
        let mut vocabulary = HashSet::new();
        for (document, label) in documents.iter().zip(labels) {
            let counts = match class_counts.entry(label.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(ClassCounts::default()),
            };
            counts.num_docs += 1;

            for word in self.tokenizer.tokenize(document.as_ref()) {
                if !vocabulary.contains(&word) {
                    vocabulary.insert(word.clone());
                }
                *counts.word_counts.entry(word).or_insert(0) += 1;
                counts.num_words += 1;
            }
        }

        // Turn the counts into log priors and smoothed log likelihoods:

        let num_documents = documents.len() as f64;
        let vocab_size = vocabulary.len() as f64; // V
        let alpha = self.alpha;
        let classes = class_counts
            .into_iter()
            .map(|(label, counts)| {
                let log_prior = (counts.num_docs as f64 / num_documents).ln();
                let denominator = counts.num_words as f64 + alpha * vocab_size;

                let log_likelihoods = vocabulary
                    .iter()
                    .map(|word| {
                        let count = counts.word_counts.get(word).copied().unwrap_or(0) as f64;
                        (word.clone(), ((count + alpha) / denominator).ln())
                    })
                    .collect();

                // Only zero when no training document produced a single token,
                // in which case "unknown" is the only outcome there is.
                let unknown_log_likelihood = if denominator > 0.0 {
                    (alpha / denominator).ln()
                } else {
                    0.0
                };

                // Every known word scores at least as high as an unknown one, so
                // a finite unknown term means all the others are finite too.
                if !unknown_log_likelihood.is_finite() {
                    return Err(BayesError::InvalidInput(format!(
                        "smoothing constant {} is out of range for a vocabulary of {} words",
                        alpha,
                        vocabulary.len()
                    )));
                }

                let params = ClassParams {
                    log_prior,
                    log_likelihoods,
                    unknown_log_likelihood,
                };
                Ok((label, params))
            })
            .collect::<Result<BTreeMap<L, ClassParams>, BayesError>>()?;

        debug!(
            "trained on {} documents: {} classes, {} vocabulary words, alpha {}",
            documents.len(),
            classes.len(),
            vocabulary.len(),
            alpha
        );

        self.model = Some(TrainedModel {
            vocabulary,
            classes,
        });

        Ok(())
    }

    /// Predicts one label per query, in query order.
    pub fn predict<S: AsRef<str>>(&self, queries: &[S]) -> Result<Vec<L>, BayesError> {
        let model = self.trained()?;

        Ok(queries
            .iter()
            .map(|query| model.best_class(&self.tokenizer.tokenize(query.as_ref())).clone())
            .collect())
    }

    pub fn predict_one(&self, text: &str) -> Result<L, BayesError> {
        let model = self.trained()?;
        Ok(model.best_class(&self.tokenizer.tokenize(text)).clone())
    }

    /// Unnormalized log score of `text` for every class, in class order.
    pub fn scores(&self, text: &str) -> Result<Vec<(L, f64)>, BayesError> {
        let model = self.trained()?;
        let words = self.tokenizer.tokenize(text);
        Ok(model
            .classes
            .iter()
            .map(|(class, params)| (class.clone(), params.score(&words)))
            .collect())
    }

    /// Classes the model can predict, in tie-break order. Empty until trained.
    pub fn classes(&self) -> Vec<&L> {
        self.model
            .as_ref()
            .map_or_else(Vec::new, |model| model.classes.keys().collect())
    }

    pub fn log_prior(&self, class: &L) -> Option<f64> {
        self.class_params(class).map(|params| params.log_prior)
    }

    /// `None` for an unknown class or a word outside the vocabulary.
    pub fn log_likelihood(&self, class: &L, word: &str) -> Option<f64> {
        self.class_params(class)
            .and_then(|params| params.log_likelihoods.get(word).copied())
    }

    /// Log probability charged for a token never seen during training.
    pub fn unknown_log_likelihood(&self, class: &L) -> Option<f64> {
        self.class_params(class)
            .map(|params| params.unknown_log_likelihood)
    }

    fn class_params(&self, class: &L) -> Option<&ClassParams> {
        self.model.as_ref()?.classes.get(class)
    }
}

impl ClassParams {
    fn score(&self, words: &[String]) -> f64 {
        words.iter().fold(self.log_prior, |acc, word| {
            acc + self
                .log_likelihoods
                .get(word)
                .copied()
                .unwrap_or(self.unknown_log_likelihood)
        })
    }
}

impl<L: Ord> TrainedModel<L> {
    /// Highest scoring class. Classes are visited in ascending order and only
    /// a strictly greater score replaces the current best.
    ///
    /// `fit` only stores a model after seeing at least one labeled document,
    /// so the class map is never empty here.
    fn best_class(&self, words: &[String]) -> &L {
        let mut classes = self.classes.iter();
        let Some((first_class, first_params)) = classes.next() else {
            unreachable!("trained model without classes");
        };

        let (best_class, _) = classes.fold(
            (first_class, first_params.score(words)),
            |(best_class, best_score), (class, params)| {
                let score = params.score(words);
                if score > best_score {
                    (class, score)
                } else {
                    (best_class, best_score)
                }
            },
        );

        best_class
    }
}

//! Integration tests for training and prediction through the public API.

use spam_bayes::{BayesError, NaiveBayesClassifier, Tokenizer};

fn spam_ham() -> (Vec<&'static str>, Vec<String>) {
    let documents = vec!["free money now", "lunch at noon", "free lunch offer"];
    let labels = vec!["spam".to_string(), "ham".to_string(), "spam".to_string()];
    (documents, labels)
}

fn trained() -> NaiveBayesClassifier<String> {
    let (documents, labels) = spam_ham();
    let mut classifier = NaiveBayesClassifier::new();
    classifier.fit(&documents, &labels).unwrap();
    classifier
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn words_seen_only_in_spam_predict_spam() {
    let classifier = trained();
    assert_eq!(classifier.vocabulary_len(), 7);
    assert_eq!(classifier.predict(&["free offer"]).unwrap(), vec!["spam"]);
}

#[test]
fn empty_query_predicts_highest_prior() {
    let classifier = trained();
    assert_eq!(classifier.predict(&[""]).unwrap(), vec!["spam"]);

    // prior-only score
    let scores = classifier.scores("").unwrap();
    for (class, score) in scores {
        assert_eq!(score, classifier.log_prior(&class).unwrap());
    }
}

#[test]
fn unknown_words_still_get_a_class() {
    let classifier = trained();
    let query = "zebra quantum xylophone";
    let predicted = classifier.predict_one(query).unwrap();
    assert!(classifier.classes().contains(&&predicted));

    for (class, score) in classifier.scores(query).unwrap() {
        let expected = classifier.log_prior(&class).unwrap()
            + 3.0 * classifier.unknown_log_likelihood(&class).unwrap();
        assert!((score - expected).abs() < 1e-12);
    }
}

#[test]
fn mismatched_lengths_fail_before_training() {
    let mut classifier = NaiveBayesClassifier::new();
    let err = classifier
        .fit(&["free money", "lunch"], &["spam".to_string()])
        .unwrap_err();
    assert!(matches!(err, BayesError::InvalidInput(_)));
    assert!(!classifier.is_trained());
    assert_eq!(classifier.vocabulary_len(), 0);
}

#[test]
fn predicting_untrained_model_fails() {
    let classifier: NaiveBayesClassifier<String> = NaiveBayesClassifier::new();
    assert_eq!(
        classifier.predict(&["hello"]),
        Err(BayesError::ModelNotTrained)
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn training_is_deterministic() {
    let first = trained();
    let second = trained();
    let queries = ["free lunch", "noon", "money money offer", "", "unheard of"];

    assert_eq!(first.predict(&queries).unwrap(), second.predict(&queries).unwrap());
    for class in first.classes() {
        assert_eq!(first.log_prior(class), second.log_prior(class));
        assert_eq!(
            first.unknown_log_likelihood(class),
            second.unknown_log_likelihood(class)
        );
        for word in ["free", "money", "now", "lunch", "at", "noon", "offer"] {
            assert_eq!(first.log_likelihood(class, word), second.log_likelihood(class, word));
        }
    }
}

#[test]
fn priors_are_valid_probabilities() {
    let classifier = trained();
    let mut total = 0.0;
    for class in classifier.classes() {
        let prior = classifier.log_prior(class).unwrap().exp();
        assert!(prior > 0.0 && prior <= 1.0);
        total += prior;
    }
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn observed_words_outscore_unknown_words() {
    let (documents, labels) = spam_ham();
    let classifier = trained();
    for (document, label) in documents.iter().zip(&labels) {
        let unknown = classifier.unknown_log_likelihood(label).unwrap();
        for word in document.split_whitespace() {
            assert!(classifier.log_likelihood(label, word).unwrap() > unknown);
        }
    }
}

#[test]
fn repeated_token_adds_its_log_likelihood() {
    let classifier = trained();
    let once = classifier.scores("free offer").unwrap();
    let twice = classifier.scores("free offer free").unwrap();

    for ((class, before), (_, after)) in once.into_iter().zip(twice) {
        let step = classifier.log_likelihood(&class, "free").unwrap();
        assert!((after - before - step).abs() < 1e-12);
        assert_ne!(after, before);
    }
}

#[test]
fn refit_discards_previous_parameters() {
    let mut classifier = trained();
    classifier
        .fit(&["buy now", "see you soon"], &["promo".to_string(), "personal".to_string()])
        .unwrap();

    assert_eq!(classifier.classes(), vec!["personal", "promo"]);
    assert!(!classifier.contains_word("free"));
    assert_eq!(classifier.log_prior(&"spam".to_string()), None);
    assert_eq!(classifier.predict_one("buy").unwrap(), "promo");
}

#[test]
fn labels_need_not_be_strings() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    enum Label {
        Ham,
        Spam,
    }

    let mut classifier = NaiveBayesClassifier::new();
    classifier
        .fit(
            &["win a prize", "meeting moved to friday", "claim your prize now"],
            &[Label::Spam, Label::Ham, Label::Spam],
        )
        .unwrap();

    assert_eq!(
        classifier
            .predict(&["prize inside", "friday meeting"])
            .unwrap(),
        vec![Label::Spam, Label::Ham]
    );
    assert_eq!(classifier.classes(), vec![&Label::Ham, &Label::Spam]);
}

#[test]
fn stop_word_tokenizer_shrinks_vocabulary() {
    let documents = ["the offer is free", "see you at the game"];
    let labels = [1u8, 0u8];

    let mut plain = NaiveBayesClassifier::new();
    plain.fit(&documents, &labels).unwrap();

    let mut filtered =
        NaiveBayesClassifier::new().with_tokenizer(Tokenizer::new().with_stop_words(true));
    filtered.fit(&documents, &labels).unwrap();

    assert!(plain.contains_word("the"));
    assert!(!filtered.contains_word("the"));
    assert!(filtered.vocabulary_len() < plain.vocabulary_len());
    assert_eq!(filtered.predict_one("free offer").unwrap(), 1);
}

#[test]
fn trained_model_is_shareable_across_threads() {
    let classifier = trained();
    std::thread::scope(|scope| {
        let handles: Vec<_> = ["free offer", "lunch at noon"]
            .into_iter()
            .map(|query| {
                let classifier = &classifier;
                scope.spawn(move || classifier.predict_one(query).unwrap())
            })
            .collect();
        let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec!["spam", "ham"]);
    });
}

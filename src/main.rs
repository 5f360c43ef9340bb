use anyhow::{ensure, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::{info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use spam_bayes::{
    config::{load_config, ExperimentConfig},
    dataset::{accuracy, Dataset},
    NaiveBayesClassifier, Tokenizer,
};

const SAMPLE_SPAM: &str = "Hi im Ana with a free offer meal";
const SAMPLE_HAM: &str = "Hey, are you around? I'm running a bit late with the lunch.";

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("SPAM_BAYES_LOG", "warn,spam_bayes=info"))
        .init();

    let matches = cli().get_matches();
    let config = config_from_arguments(&matches)?;
    let messages: Vec<String> = matches
        .get_many::<String>("message")
        .map(|values| values.cloned().collect())
        .unwrap_or_else(|| vec![SAMPLE_SPAM.to_string(), SAMPLE_HAM.to_string()]);

    run(&config, &messages)
}

fn cli() -> Command {
    Command::new("spam_bayes")
        .version(clap::crate_version!())
        .about("Train and evaluate a naive Bayes spam classifier")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a JSON experiment configuration")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .help("Path to the labeled CSV file. Overrides the configuration file.")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .help("Seed for the train/test shuffle")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("alpha")
                .short('a')
                .long("alpha")
                .help("Additive smoothing constant")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("train_fraction")
                .short('t')
                .long("train-fraction")
                .help("Fraction of messages used for training")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("stop_words")
                .long("stop-words")
                .help("Drop common English stop words before training")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("message")
                .help("Messages to classify after training")
                .num_args(0..)
                .value_parser(clap::builder::NonEmptyStringValueParser::new()),
        )
}

fn config_from_arguments(matches: &ArgMatches) -> Result<ExperimentConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config(path)?,
        None => ExperimentConfig::default(),
    };

    if let Some(path) = matches.get_one::<PathBuf>("data") {
        config.dataset.path = path.clone();
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }
    if let Some(&alpha) = matches.get_one::<f64>("alpha") {
        config.alpha = alpha;
    }
    if let Some(&fraction) = matches.get_one::<f64>("train_fraction") {
        config.train_fraction = fraction;
    }
    if matches.get_flag("stop_words") {
        config.stop_words = true;
    }

    Ok(config)
}

fn run(config: &ExperimentConfig, messages: &[String]) -> Result<()> {
    let dataset = Dataset::load(&config.dataset)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (train, test) = dataset.split(config.train_fraction, &mut rng)?;
    info!("split data: {} train, {} test", train.len(), test.len());
    ensure!(!train.is_empty(), "no training messages left after the split");

    let tokenizer = Tokenizer::new().with_stop_words(config.stop_words);
    let mut classifier: NaiveBayesClassifier<String> = NaiveBayesClassifier::new()
        .with_alpha(config.alpha)
        .with_tokenizer(tokenizer);

    info!(
        "training naive Bayes (alpha {}, stop words {})",
        config.alpha,
        if config.stop_words { "removed" } else { "kept" }
    );
    classifier.fit(&train.texts(), &train.labels())?;
    info!(
        "training finished: {} classes, {} vocabulary words",
        classifier.classes().len(),
        classifier.vocabulary_len()
    );

    if test.is_empty() {
        println!("No test messages, skipping evaluation.");
    } else {
        let predictions = classifier.predict(&test.texts())?;
        let percent = accuracy(&predictions, &test.labels()) * 100.0;
        println!("Test accuracy: {:.2}% on {} messages", percent, test.len());
    }

    let predictions = classifier.predict(messages)?;
    for (message, label) in messages.iter().zip(&predictions) {
        println!("'{}' -> {}", message, label);
    }

    Ok(())
}

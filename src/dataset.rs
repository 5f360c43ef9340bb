use anyhow::{bail, ensure, Context, Result};
use csv::ByteRecord;
use log::{debug, info};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How to decode the raw bytes of each field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Every byte maps to the code point of the same value. Never fails.
    #[default]
    Latin1,
    Utf8,
}

/// Where the labeled messages live and how the file is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub label_column: usize,
    pub text_column: usize,
    pub has_header: bool,
    pub delimiter: char,
    pub encoding: TextEncoding,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("combined_data.csv"),
            label_column: 0,
            text_column: 1,
            has_header: true,
            delimiter: ',',
            encoding: TextEncoding::Latin1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledText {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    examples: Vec<LabeledText>,
}

impl Dataset {
    pub fn new(examples: Vec<LabeledText>) -> Self {
        Self { examples }
    }

    /// Reads labeled messages from a delimited file.
    ///
    /// Rows missing the label or text column are skipped rather than treated
    /// as errors.
    pub fn load(config: &DatasetConfig) -> Result<Self> {
        if !config.delimiter.is_ascii() {
            bail!("delimiter must be a single ascii character, got {:?}", config.delimiter);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(config.has_header)
            .delimiter(config.delimiter as u8)
            .flexible(true)
            .from_path(&config.path)
            .with_context(|| format!("failed to open dataset: {}", config.path.display()))?;

        let mut examples = Vec::new();
        let mut skipped = 0;
        let mut record = ByteRecord::new();
        while reader
            .read_byte_record(&mut record)
            .with_context(|| format!("failed to read dataset: {}", config.path.display()))?
        {
            let (Some(label), Some(text)) = (
                record.get(config.label_column),
                record.get(config.text_column),
            ) else {
                let line = record.position().map_or(0, |pos| pos.line());
                debug!("skipping line {} with only {} fields", line, record.len());
                skipped += 1;
                continue;
            };

            examples.push(LabeledText {
                label: decode(label, config.encoding, &record)?,
                text: decode(text, config.encoding, &record)?,
            });
        }

        info!(
            "loaded {} messages from {} ({} rows skipped)",
            examples.len(),
            config.path.display(),
            skipped
        );

        Ok(Self { examples })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[LabeledText] {
        &self.examples
    }

    pub fn texts(&self) -> Vec<&str> {
        self.examples.iter().map(|ex| ex.text.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.examples.iter().map(|ex| ex.label.clone()).collect()
    }

    /// Shuffles a copy with `rng` and cuts it into (train, test), the train
    /// part holding `floor(len * train_fraction)` examples.
    pub fn split<R: Rng + ?Sized>(&self, train_fraction: f64, rng: &mut R) -> Result<(Self, Self)> {
        ensure!(
            (0.0..=1.0).contains(&train_fraction),
            "train fraction must be within [0, 1], got {}",
            train_fraction
        );

        let mut shuffled = self.examples.clone();
        shuffled.shuffle(rng);

        let split_index = (shuffled.len() as f64 * train_fraction) as usize;
        let test = shuffled.split_off(split_index);

        Ok((Self::new(shuffled), Self::new(test)))
    }
}

impl FromIterator<LabeledText> for Dataset {
    fn from_iter<I: IntoIterator<Item = LabeledText>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn decode(field: &[u8], encoding: TextEncoding, record: &ByteRecord) -> Result<String> {
    match encoding {
        TextEncoding::Latin1 => Ok(field.iter().map(|&b| b as char).collect()),
        TextEncoding::Utf8 => {
            let text = std::str::from_utf8(field).with_context(|| {
                let line = record.position().map_or(0, |pos| pos.line());
                format!("invalid utf-8 on line {}", line)
            })?;
            Ok(text.to_string())
        }
    }
}

/// Fraction of `predictions` equal to the matching entry of `truth`.
pub fn accuracy<L: PartialEq>(predictions: &[L], truth: &[L]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }

    let correct = predictions
        .iter()
        .zip(truth)
        .filter(|(pred, actual)| pred == actual)
        .count();

    correct as f64 / truth.len() as f64
}

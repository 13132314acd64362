//! Statistical slot extraction.
//!
//! A single TF-IDF vectorizer is fit on the training corpus and one softmax
//! classifier per slot is fit on the vectorized text. Models live only in
//! memory and are rebuilt on every process start.

pub mod classifier;
pub mod features;

use serde::Deserialize;

use logq_protocol::{SlotMap, SlotReadings, SlotResult, TrainingExample};

use crate::error::{ParserError, ParserResult};
use crate::extractor::SlotExtractor;

use self::classifier::{SoftmaxClassifier, TrainParams};
use self::features::TfidfVectorizer;

/// Hyper-parameters for the statistical tier.
#[derive(Debug, Clone, Deserialize)]
pub struct StatConfig {
    /// Vocabulary cap for the vectorizer.
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Longest word n-gram used as a feature.
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,

    #[serde(default = "default_epochs")]
    pub epochs: usize,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// L2 decay per epoch.
    #[serde(default = "default_l2")]
    pub l2: f64,
}

fn default_max_features() -> usize {
    3000
}

fn default_ngram_max() -> usize {
    2
}

fn default_epochs() -> usize {
    60
}

fn default_learning_rate() -> f64 {
    0.5
}

fn default_l2() -> f64 {
    1e-4
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            ngram_max: default_ngram_max(),
            epochs: default_epochs(),
            learning_rate: default_learning_rate(),
            l2: default_l2(),
        }
    }
}

impl StatConfig {
    pub fn validate(&self) -> ParserResult<()> {
        if self.max_features == 0 {
            return Err(ParserError::Config("stat.max_features must be > 0".into()));
        }
        if self.ngram_max == 0 {
            return Err(ParserError::Config("stat.ngram_max must be >= 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ParserError::Config(format!(
                "stat.learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(ParserError::Config(format!(
                "stat.l2 must be >= 0, got {}",
                self.l2
            )));
        }
        Ok(())
    }

    fn train_params(&self) -> TrainParams {
        TrainParams {
            epochs: self.epochs,
            learning_rate: self.learning_rate,
            l2: self.l2,
        }
    }
}

/// Per-slot classifiers over a shared TF-IDF vocabulary.
pub struct StatExtractor {
    vectorizer: TfidfVectorizer,
    classifiers: SlotMap<SoftmaxClassifier>,
    examples: usize,
}

impl StatExtractor {
    /// Fit the vectorizer and all four classifiers.
    pub fn fit(examples: &[TrainingExample], config: &StatConfig) -> ParserResult<Self> {
        if examples.is_empty() {
            return Err(ParserError::EmptyCorpus);
        }
        config.validate()?;

        let docs: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&docs, config.max_features, config.ngram_max);
        let xs: Vec<_> = docs.iter().map(|d| vectorizer.transform(d)).collect();
        let params = config.train_params();

        let classifiers = SlotMap::from_fn(|slot| {
            let labels: Vec<&str> = examples.iter().map(|e| e.label(slot).as_str()).collect();
            let clf = SoftmaxClassifier::fit(&xs, &labels, vectorizer.len(), &params);
            tracing::debug!(slot = %slot, classes = clf.classes().len(), "slot classifier fitted");
            clf
        });

        tracing::info!(
            examples = examples.len(),
            features = vectorizer.len(),
            epochs = config.epochs,
            "statistical extractor fitted"
        );

        Ok(Self {
            vectorizer,
            classifiers,
            examples: examples.len(),
        })
    }

    /// Number of training examples the models were fit on.
    pub fn example_count(&self) -> usize {
        self.examples
    }

    pub fn feature_count(&self) -> usize {
        self.vectorizer.len()
    }

    /// Value and confidence for every slot.
    ///
    /// Text with no known feature yields the wildcard at confidence 0.
    pub fn extract_stat(&self, text: &str) -> SlotReadings {
        let x = self.vectorizer.transform(text);
        if x.is_empty() {
            return SlotMap::from_fn(|_| SlotResult::unresolved());
        }
        self.classifiers.map(|slot, clf| {
            let reading = match clf.predict(&x) {
                Some((label, p)) => SlotResult::scored(label, p),
                None => SlotResult::unresolved(),
            };
            tracing::trace!(
                slot = %slot,
                value = %reading.value,
                confidence = reading.confidence.unwrap_or(0.0),
                "statistical reading"
            );
            reading
        })
    }
}

impl SlotExtractor for StatExtractor {
    fn extract(&self, text: &str) -> SlotReadings {
        self.extract_stat(text)
    }

    fn tier_name(&self) -> &str {
        "statistical"
    }
}

//! TF-IDF featurization over word unigrams and bigrams.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Word tokens of at least two characters.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Sparse feature vector as `(feature index, weight)` pairs, sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// Vocabulary and inverse document frequencies learned from a corpus.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    ngram_max: usize,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary from `docs`, keeping the `max_features` most
    /// frequent terms (ties broken alphabetically).
    pub fn fit(docs: &[&str], max_features: usize, ngram_max: usize) -> Self {
        let ngram_max = ngram_max.max(1);
        let mut term_count: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let terms = terms(doc, ngram_max);
            let mut seen = HashSet::new();
            for term in terms {
                *term_count.entry(term.clone()).or_default() += 1;
                if seen.insert(term.clone()) {
                    *doc_freq.entry(term).or_default() += 1;
                }
            }
        }

        let mut ranked: Vec<(&String, &usize)> = term_count.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_features);

        let mut selected: Vec<&String> = ranked.into_iter().map(|(t, _)| t).collect();
        selected.sort();

        let n = docs.len() as f64;
        let idf = selected
            .iter()
            .map(|t| {
                let df = doc_freq.get(*t).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let vocabulary = selected
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        Self {
            ngram_max,
            vocabulary,
            idf,
        }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// L2-normalized TF-IDF vector. Empty when no term is in the vocabulary.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms(text, self.ngram_max) {
            if let Some(&i) = self.vocabulary.get(&term) {
                *counts.entry(i).or_default() += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(i, tf)| (i, tf * self.idf[i]))
            .collect();
        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }
        vector
    }
}

/// Lowercased unigrams through `ngram_max`-grams, in text order.
fn terms(text: &str, ngram_max: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN_RE.find_iter(&lower).map(|m| m.as_str()).collect();
    let mut out = Vec::with_capacity(tokens.len() * ngram_max);
    for n in 1..=ngram_max {
        for window in tokens.windows(n) {
            out.push(window.join(" "));
        }
    }
    out
}

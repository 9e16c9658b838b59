use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, AppResult};
use crate::services::stop_words::is_stop_word;

/// Default vocabulary cap
pub const DEFAULT_MAX_FEATURES: usize = 20_000;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Sparse row of term weights, entries sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(index, _)| *index);
        entries.dedup_by(|next, kept| {
            if next.0 == kept.0 {
                kept.1 += next.1;
                true
            } else {
                false
            }
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut total = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    total += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        total
    }

    /// Adds `weight * other` into this vector
    pub fn add_scaled(&mut self, other: &SparseVector, weight: f64) {
        let mut merged = Vec::with_capacity(self.entries.len() + other.entries.len());
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() || j < other.entries.len() {
            let left = self.entries.get(i).copied();
            let right = other.entries.get(j).copied();
            match (left, right) {
                (Some((a_idx, a_w)), Some((b_idx, b_w))) if a_idx == b_idx => {
                    merged.push((a_idx, a_w + weight * b_w));
                    i += 1;
                    j += 1;
                }
                (Some((a_idx, a_w)), Some((b_idx, _))) if a_idx < b_idx => {
                    merged.push((a_idx, a_w));
                    i += 1;
                }
                (Some(entry), None) => {
                    merged.push(entry);
                    i += 1;
                }
                (_, Some((b_idx, b_w))) => {
                    merged.push((b_idx, weight * b_w));
                    j += 1;
                }
                (None, None) => break,
            }
        }
        self.entries = merged;
    }
}

/// Cosine of the angle between two rows; zero when either row is empty
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    a.dot(b) / denominator
}

/// TF-IDF vectorizer over unigrams and bigrams
///
/// Text is lowercased and split into runs of two or more word characters.
/// Stop words are removed before bigrams are formed. The vocabulary keeps the
/// `max_features` most frequent terms across the corpus. Weights are raw
/// counts times smoothed idf, and every row is L2-normalized.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    fitted: bool,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            fitted: false,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Splits text into the unigram and bigram terms the model counts
    pub fn analyze(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !is_stop_word(token))
            .collect();

        let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
        terms
    }

    /// Learns vocabulary and idf from the corpus and returns one row per document
    pub fn fit_transform(&mut self, documents: &[String]) -> Vec<SparseVector> {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| Self::analyze(d)).collect();

        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        let mut document_freq: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let mut seen: Vec<&str> = Vec::with_capacity(terms.len());
            for term in terms {
                *corpus_counts.entry(term.as_str()).or_default() += 1;
                seen.push(term.as_str());
            }
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *document_freq.entry(term).or_default() += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        let n_docs = documents.len() as f64;
        self.idf = kept
            .iter()
            .map(|term| {
                let df = document_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();
        self.fitted = true;

        analyzed.iter().map(|terms| self.weigh(terms)).collect()
    }

    /// Projects new text into the fitted space; unknown terms are dropped
    pub fn transform(&self, text: &str) -> AppResult<SparseVector> {
        if !self.fitted {
            return Err(AppError::NotFitted);
        }
        Ok(self.weigh(&Self::analyze(text)))
    }

    fn weigh(&self, terms: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in terms {
            if let Some(&index) = self.vocabulary.get(term) {
                *counts.entry(index).or_default() += 1.0;
            }
        }

        let mut row = SparseVector::from_entries(
            counts
                .into_iter()
                .map(|(index, count)| (index, count * self.idf[index]))
                .collect(),
        );
        let norm = row.norm();
        if norm > 0.0 {
            for (_, weight) in row.entries.iter_mut() {
                *weight /= norm;
            }
        }
        row
    }
}

//! TF-IDF term vectors and cosine similarity over catalog text soups.

use std::collections::HashMap;

use crate::error::{AppError, AppResult};

/// Terms discarded before weighting, sorted for binary search
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself",
    "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on",
    "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

fn is_stopword(term: &str) -> bool {
    STOPWORDS.binary_search(&term).is_ok()
}

/// Splits a normalized soup into indexable terms: whitespace tokens of at
/// least two characters that are not stopwords.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|term| term.chars().nth(1).is_some() && !is_stopword(term))
}

/// One item's sparse, L2-normalized term-weight vector
#[derive(Debug, Clone, Default)]
pub struct TermVector {
    /// (term id, weight) pairs sorted by term id
    terms: Vec<(usize, f32)>,
}

impl TermVector {
    /// Dot product of two L2-normalized vectors, i.e. their cosine
    /// similarity. Symmetric; in [-1, 1].
    pub fn cosine(&self, other: &TermVector) -> f32 {
        let mut dot = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() && j < other.terms.len() {
            let (term_a, weight_a) = self.terms[i];
            let (term_b, weight_b) = other.terms[j];
            match term_a.cmp(&term_b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += weight_a * weight_b;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// TF-IDF index over a catalog snapshot.
///
/// Row order is fixed and matches the snapshot's item order for the lifetime
/// of the index. Similarities are computed on demand per query; the full
/// pairwise matrix is never materialized.
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    vocabulary: HashMap<String, usize>,
    vectors: Vec<TermVector>,
}

impl SimilarityIndex {
    /// Builds one weighted term vector per soup.
    ///
    /// Term weight is term frequency scaled by the smoothed inverse document
    /// frequency `ln((1 + n) / (1 + df)) + 1`; each vector is L2-normalized
    /// so pairwise similarity reduces to a dot product.
    pub fn build(soups: &[String]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        let mut term_counts: Vec<HashMap<usize, usize>> = Vec::with_capacity(soups.len());

        for soup in soups {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            for term in tokenize(soup) {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(term.to_string()).or_insert(next_id);
                if id == document_frequency.len() {
                    document_frequency.push(0);
                }
                *counts.entry(id).or_insert(0) += 1;
            }
            for &id in counts.keys() {
                document_frequency[id] += 1;
            }
            term_counts.push(counts);
        }

        let total_docs = soups.len() as f32;
        let vectors = term_counts
            .into_iter()
            .map(|counts| {
                let mut terms: Vec<(usize, f32)> = counts
                    .into_iter()
                    .map(|(id, count)| {
                        let idf =
                            ((1.0 + total_docs) / (1.0 + document_frequency[id] as f32)).ln() + 1.0;
                        (id, count as f32 * idf)
                    })
                    .collect();
                let norm: f32 = terms.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for (_, weight) in terms.iter_mut() {
                        *weight /= norm;
                    }
                }
                terms.sort_by_key(|&(id, _)| id);
                TermVector { terms }
            })
            .collect();

        Self { vocabulary, vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Top `k` most similar items to `item_index`, excluding the item itself.
    ///
    /// Scores are sorted descending; ties keep the original catalog order.
    /// Fails when `item_index` is out of range.
    pub fn similar(&self, item_index: usize, k: usize) -> AppResult<Vec<(usize, f32)>> {
        let query = self
            .vectors
            .get(item_index)
            .ok_or_else(|| AppError::NotFound(format!("item index {item_index} out of range")))?;

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != item_index)
            .map(|(index, vector)| (index, query.cosine(vector)))
            .collect();
        // Stable sort: equal scores keep ascending catalog order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

//! Offline ranking-quality metrics.
//!
//! Pure functions over recommended/relevant id sequences. No catalog access,
//! no side effects; edge cases are pinned down so reimplementations can be
//! compared bit for bit.

use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

/// Per-query bundle of the four ranking metrics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvaluationReport {
    pub precision: f64,
    pub recall: f64,
    pub ndcg: f64,
    pub average_precision: f64,
}

/// Scores one recommendation list against its relevant set at cutoff `k`.
pub fn evaluate<T: Eq + Hash>(recommended: &[T], relevant: &[T], k: usize) -> EvaluationReport {
    EvaluationReport {
        precision: precision_at_k(recommended, relevant, k),
        recall: recall_at_k(recommended, relevant, k),
        ndcg: ndcg_at_k(recommended, relevant, k),
        average_precision: average_precision_at_k(recommended, relevant, k),
    }
}

/// Distinct hits in the top k divided by `min(k, |recommended|)`; 0 for an
/// empty recommendation list.
pub fn precision_at_k<T: Eq + Hash>(recommended: &[T], relevant: &[T], k: usize) -> f64 {
    if recommended.is_empty() || k == 0 {
        return 0.0;
    }
    let top = &recommended[..recommended.len().min(k)];
    distinct_hits(top, relevant) as f64 / top.len() as f64
}

/// Distinct hits in the top k divided by `|relevant|`; 0 for an empty
/// relevant set.
pub fn recall_at_k<T: Eq + Hash>(recommended: &[T], relevant: &[T], k: usize) -> f64 {
    if relevant.is_empty() || recommended.is_empty() || k == 0 {
        return 0.0;
    }
    let top = &recommended[..recommended.len().min(k)];
    distinct_hits(top, relevant) as f64 / relevant.len() as f64
}

/// Binary-relevance NDCG over the top k.
///
/// DCG gains are `1 / log2(rank + 2)` with 0-indexed ranks; the ideal DCG
/// places `min(k, |relevant|)` hits in the best positions. 0 when either
/// input is empty or the ideal DCG is 0.
pub fn ndcg_at_k<T: Eq + Hash>(recommended: &[T], relevant: &[T], k: usize) -> f64 {
    if recommended.is_empty() || relevant.is_empty() || k == 0 {
        return 0.0;
    }
    let relevant_set: HashSet<&T> = relevant.iter().collect();
    let top = &recommended[..recommended.len().min(k)];

    let dcg: f64 = top
        .iter()
        .enumerate()
        .filter(|(_, item)| relevant_set.contains(item))
        .map(|(rank, _)| 1.0 / (rank as f64 + 2.0).log2())
        .sum();
    let ideal_dcg: f64 = (0..k.min(relevant.len()))
        .map(|rank| 1.0 / (rank as f64 + 2.0).log2())
        .sum();

    if ideal_dcg == 0.0 {
        return 0.0;
    }
    dcg / ideal_dcg
}

/// Average precision over the top k; 0 with no hits or empty inputs.
pub fn average_precision_at_k<T: Eq + Hash>(recommended: &[T], relevant: &[T], k: usize) -> f64 {
    if recommended.is_empty() || relevant.is_empty() || k == 0 {
        return 0.0;
    }
    let relevant_set: HashSet<&T> = relevant.iter().collect();
    let top = &recommended[..recommended.len().min(k)];

    let mut hits = 0usize;
    let mut precision_sum = 0.0;
    for (rank, item) in top.iter().enumerate() {
        if relevant_set.contains(item) {
            hits += 1;
            precision_sum += hits as f64 / (rank + 1) as f64;
        }
    }
    if hits == 0 {
        return 0.0;
    }
    precision_sum / relevant.len().min(k) as f64
}

/// Mean of per-query average precision over aligned query lists; 0 when
/// there are no queries.
pub fn mean_average_precision<T: Eq + Hash>(
    recommended_lists: &[Vec<T>],
    relevant_lists: &[Vec<T>],
    k: usize,
) -> f64 {
    if recommended_lists.is_empty() {
        return 0.0;
    }
    let total: f64 = recommended_lists
        .iter()
        .zip(relevant_lists)
        .map(|(recommended, relevant)| average_precision_at_k(recommended, relevant, k))
        .sum();
    total / recommended_lists.len() as f64
}

fn distinct_hits<T: Eq + Hash>(top: &[T], relevant: &[T]) -> usize {
    let relevant_set: HashSet<&T> = relevant.iter().collect();
    let top_set: HashSet<&T> = top.iter().collect();
    top_set.intersection(&relevant_set).count()
}

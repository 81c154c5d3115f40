//! Top-k selection over scored positions.
//!
//! All strategies funnel their raw scores through [`top_k`], which keeps a
//! bounded min-heap (O(n log k)) and returns results by descending score.
//! Equal scores are ordered by ascending position so rankings are stable
//! across runs.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Select the `k` highest-scoring `(position, score)` pairs, best first.
/// NaN scores rank below every real score.
pub fn top_k<I>(scores: I, k: usize) -> Vec<(u32, f32)>
where
    I: IntoIterator<Item = (u32, f32)>,
{
    if k == 0 {
        return Vec::new();
    }

    let scores = scores.into_iter();
    let capacity = k
        .saturating_add(1)
        .min(scores.size_hint().0.saturating_add(1));
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f32>, Reverse<u32>)>> =
        BinaryHeap::with_capacity(capacity);
    for (id, score) in scores {
        let score = if score.is_nan() { f32::NEG_INFINITY } else { score };
        heap.push(Reverse((OrderedFloat(score), Reverse(id))));
        if heap.len() > k {
            heap.pop();
        }
    }

    let mut results: Vec<(u32, f32)> = heap
        .into_iter()
        .map(|Reverse((s, Reverse(id)))| (id, s.0))
        .collect();
    results.sort_unstable_by(|a, b| {
        OrderedFloat(b.1)
            .cmp(&OrderedFloat(a.1))
            .then_with(|| a.0.cmp(&b.0))
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_descending() {
        let out = top_k(vec![(0, 0.1), (1, 0.9), (2, 0.5)], 3);
        assert_eq!(out, vec![(1, 0.9), (2, 0.5), (0, 0.1)]);
    }

    #[test]
    fn test_truncates_to_k() {
        let out = top_k((0..50).map(|i| (i, i as f32)), 5);
        let ids: Vec<u32> = out.iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![49, 48, 47, 46, 45]);
    }

    #[test]
    fn test_ties_prefer_lower_position() {
        let out = top_k(vec![(3, 1.0), (1, 1.0), (2, 1.0), (0, 0.0)], 2);
        assert_eq!(out, vec![(1, 1.0), (2, 1.0)]);
    }

    #[test]
    fn test_k_zero_and_empty_input() {
        assert!(top_k(vec![(0, 1.0)], 0).is_empty());
        assert!(top_k(Vec::<(u32, f32)>::new(), 10).is_empty());
    }

    #[test]
    fn test_unbounded_k_returns_everything() {
        let out = top_k(vec![(0, 0.2), (1, 0.8)], usize::MAX);
        assert_eq!(out, vec![(1, 0.8), (0, 0.2)]);
        let out = top_k((0..3u32).map(|i| (i, 1.0)), usize::MAX);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_nan_ranks_last() {
        let out = top_k(vec![(0, f32::NAN), (1, -5.0)], 2);
        assert_eq!(out[0], (1, -5.0));
        assert_eq!(out[1].0, 0);
    }
}

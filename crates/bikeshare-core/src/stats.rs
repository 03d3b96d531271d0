use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::Serialize;

// ── Mode ──────────────────────────────────────────────────────────────────────

/// The most frequent value of a collection together with its frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popular<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Popular<T> {
    /// Apply `f` to the value, keeping the count.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Popular<U> {
        Popular {
            value: f(self.value),
            count: self.count,
        }
    }
}

/// Most frequent value of `values`.
///
/// Ties go to the lowest value in `Ord` order, so the result is deterministic
/// for any input order. Returns `None` for an empty input.
pub fn mode<T, I>(values: I) -> Option<Popular<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<Popular<T>> = None;
    // Ascending key order; only a strictly higher count replaces the leader.
    for (value, count) in counts {
        if best.as_ref().map_or(true, |b| count > b.count) {
            best = Some(Popular { value, count });
        }
    }
    best
}

// ── Frequency tables ──────────────────────────────────────────────────────────

/// Count occurrences of each distinct value.
///
/// Sorted by descending count; equal counts keep first-occurrence order.
pub fn frequency_table<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut table: Vec<(T, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => table[i].1 += 1,
            None => {
                index.insert(value.clone(), table.len());
                table.push((value, 1));
            }
        }
    }

    table.sort_by(|a, b| b.1.cmp(&a.1));
    table
}

// ── Compensated summation ─────────────────────────────────────────────────────

/// Running sum using Neumaier's compensated summation.
///
/// Keeps the rounding error of each addition in a separate term so that
/// summing millions of trip durations does not drift.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
    count: usize,
}

impl CompensatedSum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
        self.count += 1;
    }

    pub fn total(&self) -> f64 {
        self.sum + self.compensation
    }

    /// Number of values added.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, or `None` when nothing was added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.total() / self.count as f64)
    }
}

impl Extend<f64> for CompensatedSum {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl FromIterator<f64> for CompensatedSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── mode ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_mode_empty_returns_none() {
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        let m = mode(vec![3, 5, 3, 1, 3, 5]).unwrap();
        assert_eq!(m, Popular { value: 3, count: 3 });
    }

    #[test]
    fn test_mode_tie_goes_to_lowest_value() {
        assert_eq!(mode(vec![9, 2, 9, 2]).unwrap().value, 2);
        assert_eq!(mode(vec![2, 9, 2, 9]).unwrap().value, 2);
        assert_eq!(mode(vec!["b", "a", "b", "a"]).unwrap().value, "a");
    }

    #[test]
    fn test_mode_tuple_tie_is_lexicographic() {
        let pairs = vec![("B", "A"), ("A", "Z"), ("B", "A"), ("A", "Z")];
        assert_eq!(mode(pairs).unwrap().value, ("A", "Z"));
    }

    #[test]
    fn test_popular_map() {
        let p = Popular { value: 3u32, count: 7 }.map(|v| v * 10);
        assert_eq!(p, Popular { value: 30, count: 7 });
    }

    // ── frequency_table ──────────────────────────────────────────────────────

    #[test]
    fn test_frequency_table_sorted_by_count() {
        let table = frequency_table(vec!["x", "y", "y", "z", "y", "z"]);
        assert_eq!(table, vec![("y", 3), ("z", 2), ("x", 1)]);
    }

    #[test]
    fn test_frequency_table_ties_keep_first_occurrence() {
        let table = frequency_table(vec!["Subscriber", "Customer", "Customer", "Subscriber"]);
        assert_eq!(table, vec![("Subscriber", 2), ("Customer", 2)]);
    }

    #[test]
    fn test_frequency_table_empty() {
        assert!(frequency_table(Vec::<String>::new()).is_empty());
    }

    // ── CompensatedSum ───────────────────────────────────────────────────────

    #[test]
    fn test_compensated_sum_basic() {
        let acc: CompensatedSum = vec![60.0, 120.0, 180.0].into_iter().collect();
        assert_eq!(acc.total(), 360.0);
        assert_eq!(acc.count(), 3);
        assert_eq!(acc.mean(), Some(120.0));
    }

    #[test]
    fn test_compensated_sum_empty_mean_is_none() {
        let acc = CompensatedSum::new();
        assert_eq!(acc.total(), 0.0);
        assert_eq!(acc.mean(), None);
    }

    #[test]
    fn test_compensated_sum_recovers_lost_low_bits() {
        // A naive f64 sum of these three values is 0.0.
        let acc: CompensatedSum = vec![1e16, 1.0, -1e16].into_iter().collect();
        assert_eq!(acc.total(), 1.0);
    }

    #[test]
    fn test_compensated_sum_many_small_values() {
        let acc: CompensatedSum = std::iter::repeat(0.1).take(1_000_000).collect();
        assert!((acc.total() - 100_000.0).abs() < 1e-6);
    }
}

//! Numeric primitives shared by the preparation pipeline and the analyzers.
//!
//! Missing cells (`None`) are skipped by every reduction here.

use std::collections::BTreeMap;

/// Non-missing values of a column
pub fn present(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(sum(values) / values.len() as f64)
    }
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((squared / (values.len() - 1) as f64).sqrt())
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of already sorted values using linear interpolation between
/// the two closest ranks, position `(n - 1) * q`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Group values by key and reduce each group.
///
/// Rows where either the key or the value is missing are dropped. Groups come
/// back in ascending key order.
pub fn group_by_reduce<K, R, F>(keys: &[Option<K>], values: &[Option<f64>], reduce: F) -> BTreeMap<K, R>
where
    K: Ord + Copy,
    F: Fn(&[f64]) -> R,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for (key, value) in keys.iter().zip(values) {
        if let (Some(key), Some(value)) = (key, value) {
            groups.entry(*key).or_default().push(*value);
        }
    }

    groups
        .into_iter()
        .map(|(key, group)| (key, reduce(&group)))
        .collect()
}

/// Mean of each group; groups are never empty so the mean always exists
pub fn group_mean<K: Ord + Copy>(keys: &[Option<K>], values: &[Option<f64>]) -> BTreeMap<K, f64> {
    group_by_reduce(keys, values, |group| sum(group) / group.len() as f64)
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

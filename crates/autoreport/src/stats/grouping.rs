//! Ordered group-by aggregation.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Total-ordered wrapper so float columns can act as group keys.
#[derive(Debug, Clone, Copy)]
pub struct FloatKey(pub f64);

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatKey {}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // -0.0 and 0.0 must land in the same group.
        let a = if self.0 == 0.0 { 0.0 } else { self.0 };
        let b = if other.0 == 0.0 { 0.0 } else { other.0 };
        a.total_cmp(&b)
    }
}

/// Shortest form that reads back as the same value; whole numbers keep `.0`.
impl fmt::Display for FloatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Collect the values of each group, keyed and ordered by `key`.
///
/// Items whose key is `None` belong to no group.
pub fn group_values<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    FK: Fn(&T) -> Option<K>,
    FV: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for item in items {
        if let Some(k) = key(item) {
            groups.entry(k).or_default().push(value(item));
        }
    }
    groups
}

/// Sum `value` per group.
pub fn group_sums<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&T) -> Option<K>,
    FV: Fn(&T) -> f64,
{
    let mut sums: BTreeMap<K, f64> = BTreeMap::new();
    for item in items {
        if let Some(k) = key(item) {
            *sums.entry(k).or_insert(0.0) += value(item);
        }
    }
    sums
}

/// The `n` largest groups by sum, largest first; equal sums keep key order.
pub fn top_n<K: Ord + Clone>(sums: &BTreeMap<K, f64>, n: usize) -> Vec<(K, f64)> {
    let mut ranked: Vec<(K, f64)> = sums.iter().map(|(k, v)| (k.clone(), *v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    ranked
}

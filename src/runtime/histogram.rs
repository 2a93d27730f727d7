/// Outcome histogram: the sampler's only output.
///
/// Keys are classical bitstrings with **classical bit 0 as the rightmost
/// character**, so the key reads as the binary integer the register holds
/// ("001" means bit 0 set). Counts always add up to the shot count.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Render a classical register as a histogram key (bit 0 rightmost).
pub fn bits_to_key(bits: &[bool]) -> String {
    bits.iter().rev().map(|&b| if b { '1' } else { '0' }).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHistogram")]
pub struct OutcomeHistogram {
    counts: BTreeMap<String, u64>,
    shots: u64,
}

impl OutcomeHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn record(&mut self, key: String) {
        *self.counts.entry(key).or_insert(0) += 1;
        self.shots += 1;
    }

    pub fn record_bits(&mut self, bits: &[bool]) {
        self.record(bits_to_key(bits));
    }

    /// Fold `other` into `self`. Addition of counts, so merge order never
    /// changes the result.
    pub fn merge(&mut self, other: OutcomeHistogram) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
        self.shots += other.shots;
    }

    /// Count for `key`, 0 when the outcome never occurred.
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Total number of recorded shots (sum of all counts).
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    /// Outcomes in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Relative frequency of `key`.
    pub fn probability(&self, key: &str) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.get(key) as f64 / self.shots as f64
    }

    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        self.counts
            .keys()
            .map(|k| (k.clone(), self.probability(k)))
            .collect()
    }

    /// Most frequent outcome; ties go to the smallest key.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.iter()
            .fold(None, |best: Option<(&str, u64)>, (k, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((k, v)),
            })
    }

    /// Counts keyed by the integer each bitstring encodes.
    pub fn outcomes_as_integers(&self) -> BTreeMap<u64, u64> {
        self.counts
            .iter()
            .filter_map(|(k, &v)| u64::from_str_radix(k, 2).ok().map(|i| (i, v)))
            .collect()
    }
}

/// Wire form checked on the way in: `shots` must equal the sum of the
/// counts and every key must be a bitstring.
#[derive(Deserialize)]
struct RawHistogram {
    counts: BTreeMap<String, u64>,
    shots: u64,
}

impl TryFrom<RawHistogram> for OutcomeHistogram {
    type Error = String;

    fn try_from(raw: RawHistogram) -> Result<Self, Self::Error> {
        if let Some(key) = raw
            .counts
            .keys()
            .find(|k| k.is_empty() || k.chars().any(|c| c != '0' && c != '1'))
        {
            return Err(format!("histogram key {key:?} is not a bitstring"));
        }
        let total = raw
            .counts
            .values()
            .try_fold(0u64, |acc, &v| acc.checked_add(v))
            .ok_or_else(|| "histogram counts overflow".to_string())?;
        if total != raw.shots {
            return Err(format!("counts add up to {total} but shots is {}", raw.shots));
        }
        Ok(Self { counts: raw.counts, shots: raw.shots })
    }
}

impl FromIterator<String> for OutcomeHistogram {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut hist = Self::new();
        for key in iter {
            hist.record(key);
        }
        hist
    }
}

impl fmt::Display for OutcomeHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{key}': {count}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist(keys: &[&str]) -> OutcomeHistogram {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_bits_to_key_puts_bit_zero_last() {
        assert_eq!(bits_to_key(&[true, false, false]), "001");
        assert_eq!(bits_to_key(&[false, true]), "10");
        assert_eq!(bits_to_key(&[]), "");
    }

    #[test]
    fn test_record_and_totals() {
        let h = hist(&["00", "11", "00"]);
        assert_eq!(h.get("00"), 2);
        assert_eq!(h.get("11"), 1);
        assert_eq!(h.get("01"), 0);
        assert_eq!(h.shots(), 3);
        assert_eq!(h.len(), 2);
        assert_eq!(h.counts().values().sum::<u64>(), h.shots());
    }

    #[test]
    fn test_merge_adds_counts() {
        let mut a = hist(&["0", "1"]);
        a.merge(hist(&["1", "1"]));
        assert_eq!(a.get("0"), 1);
        assert_eq!(a.get("1"), 3);
        assert_eq!(a.shots(), 4);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let mut ab = hist(&["00"]);
        ab.merge(hist(&["11", "00"]));
        let mut ba = hist(&["11", "00"]);
        ba.merge(hist(&["00"]));
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_probability() {
        let h = hist(&["0", "0", "0", "1"]);
        assert!((h.probability("0") - 0.75).abs() < 1e-12);
        assert_eq!(OutcomeHistogram::new().probability("0"), 0.0);
        assert_eq!(h.probabilities().len(), 2);
    }

    #[test]
    fn test_most_frequent_ties_to_smallest_key() {
        let h = hist(&["10", "01", "10", "01"]);
        assert_eq!(h.most_frequent(), Some(("01", 2)));
        assert_eq!(OutcomeHistogram::new().most_frequent(), None);
    }

    #[test]
    fn test_outcomes_as_integers() {
        let h = hist(&["001", "001", "100"]);
        let ints = h.outcomes_as_integers();
        assert_eq!(ints.get(&1), Some(&2));
        assert_eq!(ints.get(&4), Some(&1));
    }

    #[test]
    fn test_display() {
        assert_eq!(hist(&["11", "00"]).to_string(), "{'00': 1, '11': 1}");
    }

    #[test]
    fn test_serializes_as_plain_data() {
        let json = serde_json::to_string(&hist(&["1"])).unwrap();
        assert_eq!(json, r#"{"counts":{"1":1},"shots":1}"#);
    }

    #[test]
    fn test_deserialize_round_trip() {
        let h = hist(&["01", "11", "11"]);
        let json = serde_json::to_string(&h).unwrap();
        let back: OutcomeHistogram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn test_deserialize_rejects_shot_mismatch() {
        let err = serde_json::from_str::<OutcomeHistogram>(r#"{"counts":{"1":5},"shots":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("counts add up to 5 but shots is 1"));
    }

    #[test]
    fn test_deserialize_rejects_non_bitstring_key() {
        let result = serde_json::from_str::<OutcomeHistogram>(r#"{"counts":{"1x":1},"shots":1}"#);
        assert!(result.is_err());
    }
}

//! Response distributions.
//!
//! Weighted and round-robin routing are checked empirically: hit a route N
//! times, tally which backend answered, and compare the split with the
//! configured weights within a tolerance.

use std::collections::BTreeMap;

use serde::Serialize;

/// Tally of sampled responses.
///
/// Successful responses are counted by key (the body, or a JSON field of
/// it). Non-success statuses and transport errors are counted separately so
/// they never masquerade as a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    counts: BTreeMap<String, usize>,
    failed_statuses: BTreeMap<u16, usize>,
    errors: usize,
    total: usize,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: u16, key: impl Into<String>) {
        self.total += 1;
        if (200..300).contains(&status) {
            *self.counts.entry(key.into()).or_default() += 1;
        } else {
            *self.failed_statuses.entry(status).or_default() += 1;
        }
    }

    pub fn record_error(&mut self) {
        self.total += 1;
        self.errors += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn failures(&self) -> usize {
        self.errors + self.failed_statuses.values().sum::<usize>()
    }

    /// Number of different successful keys seen.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Fraction of all samples answered with `key`.
    pub fn share_of(&self, key: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(key) as f64 / self.total as f64
    }

    /// Whether `key` was seen `expected_fraction * total` times, give or take
    /// `tolerance` samples.
    pub fn within_tolerance(&self, key: &str, expected_fraction: f64, tolerance: usize) -> bool {
        let expected = expected_fraction * self.total as f64;
        (self.count(key) as f64 - expected).abs() <= tolerance as f64
    }
}

/// Key a sampled body by a JSON field when asked to, else by the whole body.
pub fn sample_key(body: &str, field: Option<&str>) -> String {
    let Some(field) = field else {
        return body.to_string();
    };

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get(field) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_ninety_split_within_ten() {
        let mut d = Distribution::new();
        for i in 0..100 {
            d.record(200, if i % 7 == 0 { "hello" } else { "hola" });
        }
        // 15 hellos, 85 holas
        assert_eq!(d.count("hello"), 15);
        assert!(d.within_tolerance("hello", 0.1, 10));
        assert!(d.within_tolerance("hola", 0.9, 10));
        assert!(!d.within_tolerance("hello", 0.5, 10));
        assert_eq!(d.distinct(), 2);
    }

    #[test]
    fn failures_do_not_count_as_backends() {
        let mut d = Distribution::new();
        d.record(200, "Success!");
        d.record(500, "Failure!");
        d.record(502, "bad gateway");
        d.record_error();

        assert_eq!(d.total(), 4);
        assert_eq!(d.count("Failure!"), 0);
        assert_eq!(d.failures(), 3);
        assert_eq!(d.share_of("Success!"), 0.25);
        assert_eq!(d.keys().collect::<Vec<_>>(), vec!["Success!"]);
    }

    #[test]
    fn empty_distribution_has_no_share() {
        let d = Distribution::new();
        assert_eq!(d.share_of("anything"), 0.0);
        assert!(d.within_tolerance("anything", 0.5, 0));
    }

    #[test]
    fn keys_by_json_field() {
        let body = r#"{"greeting":"hola","instance_index":"1"}"#;
        assert_eq!(sample_key(body, Some("greeting")), "hola");
        assert_eq!(sample_key(body, Some("missing")), body);
        assert_eq!(sample_key(body, None), body);
        assert_eq!(sample_key("plain text", Some("greeting")), "plain text");
        assert_eq!(sample_key(r#"{"n":3}"#, Some("n")), "3");
    }
}

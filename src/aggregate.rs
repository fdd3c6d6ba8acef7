//! Filter and aggregate functions behind the charts
//!
//! All functions here are pure and total: given the same records and the
//! same selection they always produce the same output, and an out-of-range
//! or unknown selection yields an empty result rather than an error.
//!
//! Groups are reported in first-seen order. A group with no matching
//! records is absent from the output (no zero-count rows).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dataset::{ALL_SITES, LaunchRecord, Outcome};

/// Launch site selection from the dropdown
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteFilter {
    /// The `ALL` sentinel - no site filter
    #[default]
    All,
    /// A single launch site
    Site(String),
}

impl SiteFilter {
    /// Interpret a dropdown value; `ALL` is the no-filter sentinel
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteFilter::All
        } else {
            SiteFilter::Site(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SiteFilter::All => ALL_SITES,
            SiteFilter::Site(site) => site,
        }
    }

    /// Check whether a launch site passes this filter
    pub fn matches(&self, launch_site: &str) -> bool {
        match self {
            SiteFilter::All => true,
            SiteFilter::Site(site) => site == launch_site,
        }
    }
}

impl fmt::Display for SiteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SiteFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SiteFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(SiteFilter::parse(&value))
    }
}

/// Closed payload mass interval `[min, max]` in kilograms
///
/// Serialized as a two-element array, matching the range slider's value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PayloadRange {
    pub min: f64,
    pub max: f64,
}

impl PayloadRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// An inverted (or NaN-bounded) range matches nothing
    pub fn is_empty(&self) -> bool {
        !(self.min <= self.max)
    }

    /// Inclusive on both ends
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.min <= payload_mass_kg && payload_mass_kg <= self.max
    }
}

impl From<[f64; 2]> for PayloadRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<PayloadRange> for [f64; 2] {
    fn from(range: PayloadRange) -> Self {
        [range.min, range.max]
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] kg", self.min, self.max)
    }
}

/// Count occurrences of each key, preserving first-seen order
fn count_in_order<K: PartialEq>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

/// Number of successful launches per site
///
/// Sites without any success do not appear.
pub fn success_counts_by_site(records: &[LaunchRecord]) -> Vec<(String, usize)> {
    count_in_order(
        records
            .iter()
            .filter(|r| r.outcome.is_success())
            .map(|r| r.launch_site.as_str()),
    )
    .into_iter()
    .map(|(site, n)| (site.to_string(), n))
    .collect()
}

/// Success/failure counts for one launch site
///
/// An unknown site yields an empty result.
pub fn outcome_counts_for_site(records: &[LaunchRecord], site: &str) -> Vec<(Outcome, usize)> {
    count_in_order(
        records
            .iter()
            .filter(|r| r.launch_site == site)
            .map(|r| r.outcome),
    )
}

/// Records within the payload range, restricted to `site` unless it is `ALL`
pub fn filter_for_scatter<'a>(
    records: &'a [LaunchRecord],
    site: &SiteFilter,
    payload: PayloadRange,
) -> Vec<&'a LaunchRecord> {
    if payload.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|r| site.matches(&r.launch_site) && payload.contains(r.payload_mass_kg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(site: &str, payload: f64, outcome: Outcome) -> LaunchRecord {
        LaunchRecord {
            launch_site: site.to_string(),
            booster_version: format!("F9 {site}"),
            booster_version_category: "FT".to_string(),
            payload_mass_kg: payload,
            outcome,
        }
    }

    fn three_launches() -> Vec<LaunchRecord> {
        vec![
            record("A", 500.0, Outcome::Success),
            record("A", 1500.0, Outcome::Failure),
            record("B", 3000.0, Outcome::Success),
        ]
    }

    fn mixed_launches() -> Vec<LaunchRecord> {
        vec![
            record("CCAFS LC-40", 0.0, Outcome::Failure),
            record("KSC LC-39A", 2490.0, Outcome::Success),
            record("CCAFS LC-40", 3170.0, Outcome::Success),
            record("VAFB SLC-4E", 9600.0, Outcome::Failure),
            record("KSC LC-39A", 5300.0, Outcome::Failure),
            record("CCAFS SLC-40", 4707.0, Outcome::Success),
            record("KSC LC-39A", 3600.0, Outcome::Success),
        ]
    }

    #[test]
    fn test_success_counts_by_site() {
        let counts = success_counts_by_site(&three_launches());
        assert_eq!(counts, vec![("A".to_string(), 1), ("B".to_string(), 1)]);
    }

    #[test]
    fn test_site_without_success_is_absent() {
        let counts = success_counts_by_site(&mixed_launches());
        assert!(counts.iter().all(|(site, _)| site != "VAFB SLC-4E"));
        assert_eq!(counts[0], ("KSC LC-39A".to_string(), 2));
    }

    #[test]
    fn test_outcome_counts_for_site() {
        let counts = outcome_counts_for_site(&three_launches(), "A");
        assert_eq!(counts, vec![(Outcome::Success, 1), (Outcome::Failure, 1)]);
    }

    #[test]
    fn test_outcome_counts_unknown_site() {
        assert!(outcome_counts_for_site(&three_launches(), "Boca Chica").is_empty());
    }

    #[test]
    fn test_per_site_counts_decompose_totals() {
        let records = mixed_launches();
        let total_success = records.iter().filter(|r| r.outcome.is_success()).count();
        let total_failure = records.len() - total_success;

        let by_site = success_counts_by_site(&records);
        assert_eq!(by_site.iter().map(|(_, n)| n).sum::<usize>(), total_success);

        let mut success = 0;
        let mut failure = 0;
        for site in ["CCAFS LC-40", "KSC LC-39A", "VAFB SLC-4E", "CCAFS SLC-40"] {
            for (outcome, n) in outcome_counts_for_site(&records, site) {
                match outcome {
                    Outcome::Success => success += n,
                    Outcome::Failure => failure += n,
                }
            }
            let site_success = by_site
                .iter()
                .find(|(s, _)| s == site)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            let per_site = outcome_counts_for_site(&records, site)
                .into_iter()
                .find(|(o, _)| o.is_success())
                .map(|(_, n)| n)
                .unwrap_or(0);
            assert_eq!(site_success, per_site, "site {site}");
        }
        assert_eq!(success, total_success);
        assert_eq!(failure, total_failure);
    }

    #[test]
    fn test_filter_all_sites_full_range() {
        let records = mixed_launches();
        let filtered = filter_for_scatter(
            &records,
            &SiteFilter::All,
            PayloadRange::new(0.0, 10000.0),
        );
        assert_eq!(filtered.len(), records.len());
    }

    #[test]
    fn test_filter_is_inclusive() {
        let records = three_launches();
        let filtered = filter_for_scatter(
            &records,
            &SiteFilter::All,
            PayloadRange::new(500.0, 1500.0),
        );
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_by_site_and_range() {
        let records = mixed_launches();
        let site = SiteFilter::parse("KSC LC-39A");
        let filtered = filter_for_scatter(&records, &site, PayloadRange::new(3000.0, 6000.0));
        let payloads: Vec<f64> = filtered.iter().map(|r| r.payload_mass_kg).collect();
        assert_eq!(payloads, vec![5300.0, 3600.0]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = mixed_launches();
        let site = SiteFilter::parse("KSC LC-39A");
        let range = PayloadRange::new(1000.0, 5000.0);

        let once: Vec<LaunchRecord> = filter_for_scatter(&records, &site, range)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<LaunchRecord> = filter_for_scatter(&once, &site, range)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let records = mixed_launches();
        let range = PayloadRange::new(6000.0, 1000.0);
        assert!(range.is_empty());
        assert!(filter_for_scatter(&records, &SiteFilter::All, range).is_empty());
    }

    #[test]
    fn test_nan_range_is_empty() {
        assert!(PayloadRange::new(f64::NAN, 1000.0).is_empty());
    }

    #[test]
    fn test_unknown_site_yields_no_points() {
        let records = mixed_launches();
        let filtered = filter_for_scatter(
            &records,
            &SiteFilter::parse("Boca Chica"),
            PayloadRange::new(0.0, 10000.0),
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_site_filter_serde() {
        let all: SiteFilter = serde_json::from_str("\"ALL\"").unwrap();
        assert_eq!(all, SiteFilter::All);
        let site: SiteFilter = serde_json::from_str("\"VAFB SLC-4E\"").unwrap();
        assert_eq!(site, SiteFilter::Site("VAFB SLC-4E".to_string()));
        assert_eq!(serde_json::to_string(&SiteFilter::All).unwrap(), "\"ALL\"");
    }

    #[test]
    fn test_payload_range_serde() {
        let range: PayloadRange = serde_json::from_str("[1000, 4000]").unwrap();
        assert_eq!(range, PayloadRange::new(1000.0, 4000.0));
        assert_eq!(serde_json::to_string(&range).unwrap(), "[1000.0,4000.0]");
    }
}

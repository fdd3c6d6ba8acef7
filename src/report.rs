//! Plain-text dataset summary
//!
//! Used by `spacex-dash --summary` to inspect a dataset without starting the server.

use std::io::{self, Write};

use crate::aggregate::{outcome_counts_for_site, success_counts_by_site};
use crate::dataset::{LaunchDataset, Outcome};

/// Write a summary of the dataset and the per-site outcome table
pub fn write_summary<W: Write>(dataset: &LaunchDataset, writer: &mut W) -> io::Result<()> {
    let records = dataset.records();
    let extent = dataset.payload_extent();
    // Skip the ALL sentinel
    let sites: Vec<String> = dataset.distinct_sites().into_iter().skip(1).collect();
    let boosters = dataset.distinct_boosters().len() - 1;
    let total_success: usize = success_counts_by_site(records).iter().map(|(_, n)| n).sum();

    writeln!(writer, "SpaceX Launch Records")?;
    writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Launches: {} | Successes: {} | Sites: {} | Booster versions: {}",
        records.len(),
        total_success,
        sites.len(),
        boosters
    )?;
    writeln!(
        writer,
        "Payload mass: {:.0} - {:.0} kg",
        extent.min, extent.max
    )?;
    writeln!(
        writer,
        "Booster categories: {}",
        dataset.distinct_booster_categories().join(", ")
    )?;
    writeln!(writer)?;

    let width = sites.iter().map(|s| s.len()).max().unwrap_or(4).max(4);
    writeln!(
        writer,
        "{:<width$}  {:>7}  {:>7}  {:>5}  {:>6}",
        "Site", "Success", "Failure", "Total", "Rate"
    )?;
    writeln!(writer, "{}", "─".repeat(width + 35))?;

    for site in &sites {
        let counts = outcome_counts_for_site(records, site);
        let count_of = |outcome: Outcome| {
            counts
                .iter()
                .find(|(o, _)| *o == outcome)
                .map(|(_, n)| *n)
                .unwrap_or(0)
        };
        let success = count_of(Outcome::Success);
        let failure = count_of(Outcome::Failure);
        let total = success + failure;
        let rate = if total > 0 {
            success as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        writeln!(
            writer,
            "{:<width$}  {:>7}  {:>7}  {:>5}  {:>5.1}%",
            site, success, failure, total, rate
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LaunchRecord;

    #[test]
    fn test_summary_lists_every_site() {
        let record = |site: &str, payload: f64, outcome| LaunchRecord {
            launch_site: site.to_string(),
            booster_version: "F9 FT B1021.1".to_string(),
            booster_version_category: "FT".to_string(),
            payload_mass_kg: payload,
            outcome,
        };
        let dataset = LaunchDataset::from_records(vec![
            record("KSC LC-39A", 2490.0, Outcome::Success),
            record("KSC LC-39A", 5300.0, Outcome::Failure),
            record("VAFB SLC-4E", 9600.0, Outcome::Failure),
        ])
        .unwrap();

        let mut out = Vec::new();
        write_summary(&dataset, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Launches: 3 | Successes: 1 | Sites: 2 | Booster versions: 1"));
        assert!(text.contains("Payload mass: 2490 - 9600 kg"));
        assert!(text.contains("KSC LC-39A"));
        assert!(text.contains("50.0%"));
        assert!(text.contains("VAFB SLC-4E"));
        assert!(text.contains("0.0%"));
    }
}

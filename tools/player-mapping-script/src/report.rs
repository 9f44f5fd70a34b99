use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use player_identity::{ForeignRecord, IndexStats, MatchOutcome, MatchStats, MatchedRecord};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// A mapped row ready for upsert, keyed by `sleeper_id` + `source`
///
/// The provider row stays nested under `record`, so its own fields never
/// collide with the upsert key.
#[derive(Debug, Serialize)]
pub struct MappingRow {
    pub source: String,
    #[serde(flatten)]
    pub record: MatchedRecord,
}

/// Output of one mapping run
#[derive(Debug, Serialize)]
pub struct MappingReport {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub index: IndexStats,
    pub stats: MatchStats,
    pub matched: Vec<MappingRow>,

    /// First unmatched rows, for manual review
    pub unmatched_sample: Vec<ForeignRecord>,
}

impl MappingReport {
    pub fn new(
        source: &str,
        index: IndexStats,
        outcome: MatchOutcome,
        unmatched_sample: usize,
    ) -> Self {
        let stats = outcome.stats();
        let matched = outcome
            .matched
            .into_iter()
            .map(|record| MappingRow { source: source.to_string(), record })
            .collect();
        let unmatched_sample = outcome.unmatched.into_iter().take(unmatched_sample).collect();

        Self {
            source: source.to_string(),
            generated_at: Utc::now(),
            index,
            stats,
            matched,
            unmatched_sample,
        }
    }

    /// Write the report as pretty JSON, creating parent directories
    pub async fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;

        info!("💾 Wrote {} mappings to {}", self.matched.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_identity::{match_records, parse_players, parse_records, IdentityIndex};

    fn create_test_outcome() -> (IndexStats, MatchOutcome) {
        let players = parse_players(
            r#"{
                "6794": {"search_full_name": "justinjefferson", "espn_id": 4262921},
                "4866": {"search_full_name": "saquonbarkley"}
            }"#,
        )
        .unwrap();
        let records = parse_records(
            r#"[
                {"player_name": "Justin Jefferson", "espn_id": "4262921", "pts": 301.2},
                {"player_name": "Saquon Barkley", "pts": 288.0},
                {"player_name": "Unknown One"},
                {"player_name": "Unknown Two"},
                {"player_name": "Unknown Three"}
            ]"#,
        )
        .unwrap();

        let index = IdentityIndex::build(&players);
        (index.stats(), match_records(records, &index))
    }

    #[test]
    fn test_report_shape() {
        let (index, outcome) = create_test_outcome();
        let report = MappingReport::new("fantasypros", index, outcome, 2);

        assert_eq!(report.stats.total, 5);
        assert_eq!(report.stats.matched, 2);
        assert_eq!(report.stats.unmatched, 3);
        assert_eq!(report.matched.len(), 2);
        assert_eq!(report.unmatched_sample.len(), 2);
        assert_eq!(report.unmatched_sample[0].name.as_deref(), Some("Unknown One"));
        assert_eq!(report.index.players, 2);
    }

    #[test]
    fn test_rows_carry_source_discriminator() {
        let (index, outcome) = create_test_outcome();
        let report = MappingReport::new("fantasypros", index, outcome, 0);

        let row = serde_json::to_value(&report.matched[0]).unwrap();
        assert_eq!(row["source"], "fantasypros");
        assert_eq!(row["sleeper_id"], "6794");
        assert_eq!(row["match_method"], "espn_id");
        assert_eq!(row["record"]["pts"], 301.2);
    }

    #[test]
    fn test_provider_source_field_does_not_replace_discriminator() {
        let players =
            parse_players(r#"[{"player_id": "200", "search_full_name": "tyreekhill"}]"#).unwrap();
        let records = parse_records(r#"[{"name": "Tyreek Hill", "source": "fp-ecr"}]"#).unwrap();
        let index = IdentityIndex::build(&players);
        let report =
            MappingReport::new("fantasypros", index.stats(), match_records(records, &index), 0);

        let json = serde_json::to_string(&report.matched[0]).unwrap();
        let row: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(row["source"], "fantasypros");
        assert_eq!(row["sleeper_id"], "200");
        assert_eq!(row["record"]["source"], "fp-ecr");
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings").join("report.json");
        let (index, outcome) = create_test_outcome();

        MappingReport::new("fantasypros", index, outcome, 10).write(&path).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["source"], "fantasypros");
        assert_eq!(written["stats"]["by_method"]["name"], 1);
        assert_eq!(written["matched"].as_array().map(Vec::len), Some(2));
        assert_eq!(written["unmatched_sample"].as_array().map(Vec::len), Some(3));
    }
}

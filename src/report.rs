use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use offersift_types::Extraction;

pub const PUSH_OFFERS_FILE: &str = "push_offers.json";
pub const READ_OFFERS_FILE: &str = "read_offers.json";
pub const FAILED_CASES_FILE: &str = "failed_cases.json";
pub const WANTED_FILE: &str = "wanted.json";
pub const ACTUAL_FILE: &str = "actual.json";
pub const ANOMALIES_FILE: &str = "anomalies.json";

/// Persist each extracted collection as a pretty-printed JSON array.
///
/// The directory is created if absent. The anomalies file is only written
/// when something was actually skipped.
pub fn write_reports(dir: &Path, extraction: &Extraction) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    write_json(dir, PUSH_OFFERS_FILE, &extraction.push_offers)?;
    write_json(dir, READ_OFFERS_FILE, &extraction.read_configs)?;
    write_json(dir, FAILED_CASES_FILE, &extraction.failed_cases)?;
    write_json(dir, WANTED_FILE, &extraction.wanted_results)?;
    write_json(dir, ACTUAL_FILE, &extraction.actual_results)?;
    if !extraction.anomalies.is_empty() {
        write_json(dir, ANOMALIES_FILE, &extraction.anomalies)?;
    }

    Ok(())
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<()> {
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use offersift_types::Anomaly;
    use serde_json::json;

    #[test]
    fn test_writes_five_collection_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");

        let mut extraction = Extraction::new();
        extraction.push_offers.push(json!({"id": 1}));
        write_reports(&out, &extraction).unwrap();

        for name in [
            PUSH_OFFERS_FILE,
            READ_OFFERS_FILE,
            FAILED_CASES_FILE,
            WANTED_FILE,
            ACTUAL_FILE,
        ] {
            assert!(out.join(name).exists(), "missing {name}");
        }
        assert!(!out.join(ANOMALIES_FILE).exists());

        let push: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(PUSH_OFFERS_FILE)).unwrap()).unwrap();
        assert_eq!(push, json!([{"id": 1}]));
    }

    #[test]
    fn test_anomalies_file_written_when_present() {
        let dir = tempfile::tempdir().unwrap();

        let mut extraction = Extraction::new();
        extraction.anomalies.push(Anomaly::new(7, "push record without write_config.Offers array"));
        write_reports(dir.path(), &extraction).unwrap();

        let anomalies: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(ANOMALIES_FILE)).unwrap())
                .unwrap();
        assert_eq!(anomalies[0]["line"], json!(7));
    }
}

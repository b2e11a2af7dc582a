use serde_json::Value;
use tracing::{debug, trace};

use crate::diff::diff_result_maps;
use offersift_types::{
    Anomaly, DiffEntry, DiffMode, Extraction, FailedCase, RequestKind, SiftOptions,
};

/// Classifier and differ for request-log lines
///
/// Consumes raw text lines, parses each as JSON and routes push and read
/// records into the [`Extraction`] accumulators. Lines are independent; no
/// state survives from one line to the next.
pub struct LogSifter {
    options: SiftOptions,
}

impl LogSifter {
    pub fn new(options: SiftOptions) -> Self {
        Self { options }
    }

    /// Process a line sequence into a fresh [`Extraction`].
    ///
    /// Append order equals input line order. Malformed JSON lines are
    /// skipped silently; structurally incomplete records become anomalies.
    pub fn process<I, S>(&self, lines: I) -> Extraction
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Extraction::new();
        for (index, line) in lines.into_iter().enumerate() {
            self.sift_line(index + 1, line.as_ref(), &mut out);
        }
        out
    }

    fn sift_line(&self, line: usize, raw: &str, out: &mut Extraction) {
        let Ok(record) = serde_json::from_str::<Value>(raw) else {
            // Malformed lines are expected noise in real logs
            trace!(line, "skipping malformed line");
            return;
        };

        let request_type = record
            .get("requestType")
            .and_then(Value::as_str)
            .unwrap_or("");

        match RequestKind::classify(request_type) {
            RequestKind::Push => self.sift_push(line, &record, out),
            RequestKind::Read => self.sift_read(line, &record, out),
            RequestKind::Other => {}
        }
    }

    /// Append every element of `log.write_config.Offers` to the push pile
    fn sift_push(&self, line: usize, record: &Value, out: &mut Extraction) {
        let offers = record
            .get("log")
            .and_then(|log| log.get("write_config"))
            .and_then(|config| config.get("Offers"))
            .and_then(Value::as_array);

        match offers {
            Some(offers) => out.push_offers.extend(offers.iter().cloned()),
            None => record_anomaly(line, "push record without write_config.Offers array", out),
        }
    }

    /// Extract search config and results, diffing them when both are present
    fn sift_read(&self, line: usize, record: &Value, out: &mut Extraction) {
        let entry = record.get("log");

        let Some(config) = entry.and_then(|e| e.get("search_config")) else {
            record_anomaly(line, "read record without search_config", out);
            return;
        };
        out.read_configs.push(config.clone());

        let Some(wanted) = entry.and_then(|e| e.get("expected_result")) else {
            return;
        };
        out.wanted_results.push(wanted.clone());

        let Some(actual) = entry.and_then(|e| e.get("actual_result")) else {
            return;
        };
        out.actual_results.push(actual.clone());

        if wanted == actual {
            return;
        }

        let case = match self.options.mode {
            DiffMode::Coarse => FailedCase::Coarse(config.clone()),
            DiffMode::Detailed => FailedCase::Detailed(DiffEntry {
                input: vec![config.clone()],
                diff: diff_result_maps(wanted, actual, self.options.key_policy),
            }),
        };
        out.failed_cases.push(case);
    }
}

fn record_anomaly(line: usize, reason: &str, out: &mut Extraction) {
    debug!(line, reason, "skipping structurally incomplete record");
    out.anomalies.push(Anomaly::new(line, reason));
}

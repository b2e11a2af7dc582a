use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use offersift_parse::LogSifter;
use offersift_types::{DiffMode, Extraction, KeyPolicy, SiftOptions};

mod report;
mod source;

use source::SourceError;

/// Offersift - extracts offers and result diffs from request-serving JSON logs
#[derive(Parser, Debug)]
#[command(name = "offersift")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the line-delimited JSON log file
    #[arg(value_name = "LOG_FILE")]
    log_file: PathBuf,

    /// Directory for the extracted JSON reports
    #[arg(value_name = "OUTPUT_DIR", default_value = "offersift-out")]
    output_dir: PathBuf,

    /// Record failed cases as bare search configs instead of per-field diffs
    #[arg(long)]
    coarse: bool,

    /// Key set driving the per-field diff: "wanted" or "union"
    #[arg(long, default_value = "wanted", value_parser = parse_key_policy)]
    diff_keys: KeyPolicy,
}

fn parse_key_policy(s: &str) -> Result<KeyPolicy, String> {
    match s {
        "wanted" => Ok(KeyPolicy::WantedOnly),
        "union" => Ok(KeyPolicy::Union),
        _ => Err(format!("unknown key policy '{s}', expected 'wanted' or 'union'")),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run(args);

    // Handle any errors
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    let options = SiftOptions {
        mode: if args.coarse {
            DiffMode::Coarse
        } else {
            DiffMode::Detailed
        },
        key_policy: args.diff_keys,
    };

    let extraction = sift_log(&args.log_file, options)?;

    report::write_reports(&args.output_dir, &extraction)?;

    println!(
        "{} push offers, {} read configs, {} wanted, {} actual, {} failed cases ({} anomalous) -> {}",
        extraction.push_offers.len(),
        extraction.read_configs.len(),
        extraction.wanted_results.len(),
        extraction.actual_results.len(),
        extraction.failed_cases.len(),
        extraction.anomalies.len(),
        args.output_dir.display()
    );

    Ok(())
}

/// Sift a log file, surfacing mid-read failures.
///
/// Malformed JSON stays a per-line skip inside the sifter, but an I/O error
/// from the reader (disk failure, invalid UTF-8 bytes) aborts the invocation
/// instead of producing reports from a truncated stream.
fn sift_log(path: &Path, options: SiftOptions) -> Result<Extraction, SourceError> {
    let lines = source::open_lines(path)?;

    let mut read_error = None;
    let extraction = LogSifter::new(options).process(lines.map_while(|line| match line {
        Ok(line) => Some(line),
        Err(e) => {
            read_error = Some(e);
            None
        }
    }));

    match read_error {
        Some(e) => Err(SourceError::Io(e)),
        None => Ok(extraction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sift_log_reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        fs::write(
            &path,
            concat!(
                r#"{"requestType":"Push","log":{"write_config":{"Offers":[1,2]}}}"#,
                "\n",
                r#"{"requestType":"Read","log":{"search_config":{"q":"x"}}}"#,
                "\n",
            ),
        )
        .unwrap();

        let extraction = sift_log(&path, SiftOptions::default()).unwrap();
        assert_eq!(extraction.push_offers.len(), 2);
        assert_eq!(extraction.read_configs.len(), 1);
    }

    #[test]
    fn test_sift_log_surfaces_mid_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        let mut bytes =
            br#"{"requestType":"Push","log":{"write_config":{"Offers":[1]}}}"#.to_vec();
        bytes.extend_from_slice(b"\n\xff\xfe\n");
        fs::write(&path, bytes).unwrap();

        let err = sift_log(&path, SiftOptions::default()).err().unwrap();
        assert!(matches!(err, SourceError::Io(_)));
    }
}

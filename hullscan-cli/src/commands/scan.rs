//! `hullscan scan` command handler

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use hullscan_analyzer::BollardImageSource;
use hullscan_core::config::HullscanConfig;
use hullscan_core::error::HullscanError;
use hullscan_core::types::{ScanOptions, VulnType};
use hullscan_scanner::advisory::AdvisoryDb;
use hullscan_scanner::library::LockfileLibraryScanner;
use hullscan_scanner::ospkg::DetectorRegistry;
use hullscan_scanner::scan::ScanRunner;

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output;

/// Execute the `scan` command.
pub async fn execute(args: ScanArgs, config: &HullscanConfig) -> Result<(), CliError> {
    // Usage checks happen before any pipeline component is constructed.
    if args.image.is_none() && args.input.is_none() {
        return Err(CliError::Usage(
            "an image reference or --input <archive> must be specified".to_owned(),
        ));
    }
    if let Some(input) = &args.input {
        super::ensure_piped_stdin(input)?;
    }

    let options = scan_options(&args, config)?;

    let db = Arc::new(
        AdvisoryDb::load_from_dir(Path::new(&config.scan.advisory_db_path))
            .map_err(HullscanError::from)?,
    );
    info!(advisories = db.entry_count(), "advisory database loaded");

    let registry = DetectorRegistry::with_defaults(Arc::clone(&db));
    let library = Arc::new(LockfileLibraryScanner::new(db));
    let source = connect_docker(config)?;
    let runner = ScanRunner::new(source, registry, library);

    let outcome = runner
        .scan_image(args.image.as_deref(), args.input.as_deref(), &options)
        .await?;

    let format = output::resolve_format(args.format, &config.report.format);
    let out_path = output::resolve_output(args.output.as_deref(), &config.report.output);
    output::write_report(format, out_path, outcome.os.as_ref(), &outcome.results)?;

    let total = outcome.results.total_vulnerabilities();
    if total > 0 {
        return Err(CliError::VulnerabilitiesFound(format!(
            "found {total} vulnerabilities"
        )));
    }
    Ok(())
}

/// CLI `--vuln-type` wins over the config file value.
fn scan_options(args: &ScanArgs, config: &HullscanConfig) -> Result<ScanOptions, CliError> {
    if args.vuln_type.is_empty() {
        return config
            .scan
            .scan_options()
            .map_err(|e| CliError::Config(e.to_string()));
    }

    let mut vuln_types = Vec::with_capacity(args.vuln_type.len());
    for value in &args.vuln_type {
        let parsed = VulnType::from_str_loose(value).ok_or_else(|| {
            CliError::Usage(format!(
                "invalid scan type '{value}' (expected: os, library)"
            ))
        })?;
        if !vuln_types.contains(&parsed) {
            vuln_types.push(parsed);
        }
    }
    Ok(ScanOptions { vuln_types })
}

/// The connection is lazy: no daemon I/O happens until an image export
/// is actually requested, so archive scans work without Docker.
fn connect_docker(config: &HullscanConfig) -> Result<BollardImageSource, CliError> {
    let source = if config.docker.socket.is_empty() {
        BollardImageSource::connect_local()
    } else {
        BollardImageSource::connect_with_socket(&config.docker.socket)
    };
    source.map_err(|e| CliError::Core(e.into()))
}

//! `hullscan manifest` command handler -- single-file library mode

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use hullscan_core::config::HullscanConfig;
use hullscan_core::contract::LibraryScanner;
use hullscan_core::error::HullscanError;
use hullscan_core::types::ScanResults;
use hullscan_scanner::advisory::AdvisoryDb;
use hullscan_scanner::library::LockfileLibraryScanner;

use crate::cli::ManifestArgs;
use crate::error::CliError;
use crate::output;

/// Execute the `manifest` command.
///
/// The scan-target name is the file's name as given on the command line.
pub fn execute(args: ManifestArgs, config: &HullscanConfig) -> Result<(), CliError> {
    super::ensure_piped_stdin(&args.path)?;

    let name = args.path.display().to_string();
    let content = read_manifest(&args.path)?;

    let db = Arc::new(
        AdvisoryDb::load_from_dir(Path::new(&config.scan.advisory_db_path))
            .map_err(HullscanError::from)?,
    );
    let scanner = LockfileLibraryScanner::new(db);
    let vulnerabilities = scanner
        .scan_manifest(&name, &content)
        .map_err(HullscanError::from)?;

    let mut results = ScanResults::new();
    results
        .push(name, vulnerabilities)
        .map_err(HullscanError::from)?;

    let format = output::resolve_format(args.format, &config.report.format);
    let out_path = output::resolve_output(args.output.as_deref(), &config.report.output);
    output::write_report(format, out_path, None, &results)?;

    let total = results.total_vulnerabilities();
    if total > 0 {
        return Err(CliError::VulnerabilitiesFound(format!(
            "found {total} vulnerabilities"
        )));
    }
    Ok(())
}

fn read_manifest(path: &Path) -> Result<Vec<u8>, CliError> {
    if path == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        return Ok(data);
    }
    Ok(std::fs::read(path)?)
}

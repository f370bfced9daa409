//! Report output resolution -- format, sink, and rich-formatting policy
//!
//! The "supports rich formatting" property of a sink is decided exactly
//! once, here, when the sink is constructed: colored severity cells are
//! enabled only for the process's interactive standard output. Files and
//! pipes always receive plain text.

use std::fs::File;
use std::io::{IsTerminal, Write};
use std::path::Path;

use hullscan_core::types::{OsRelease, ScanResults};
use hullscan_report::{JsonWriter, ReportWriter, TableWriter};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Write the report to the resolved sink.
pub fn write_report(
    format: OutputFormat,
    output: Option<&Path>,
    os: Option<&OsRelease>,
    results: &ScanResults,
) -> Result<(), CliError> {
    match output {
        Some(path) => {
            let file = File::create(path)?;
            render(format, file, false, os, results)
        }
        None => {
            let stdout = std::io::stdout();
            let rich = stdout.is_terminal();
            render(format, stdout.lock(), rich, os, results)
        }
    }
}

fn render<W: Write>(
    format: OutputFormat,
    sink: W,
    rich: bool,
    os: Option<&OsRelease>,
    results: &ScanResults,
) -> Result<(), CliError> {
    let rendered = match format {
        OutputFormat::Table => TableWriter::new(sink, rich).write(os, results),
        OutputFormat::Json => JsonWriter::new(sink).write(os, results),
    };
    rendered.map_err(|e| CliError::Core(e.into()))
}

/// CLI flag wins over the config file value.
pub fn resolve_format(arg: Option<OutputFormat>, config_value: &str) -> OutputFormat {
    arg.unwrap_or(match config_value {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    })
}

/// CLI flag wins over the config file value; empty config means stdout.
pub fn resolve_output<'a>(arg: Option<&'a Path>, config_value: &'a str) -> Option<&'a Path> {
    arg.or_else(|| {
        if config_value.is_empty() {
            None
        } else {
            Some(Path::new(config_value))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_prefers_cli_flag() {
        assert_eq!(
            resolve_format(Some(OutputFormat::Json), "table"),
            OutputFormat::Json
        );
        assert_eq!(resolve_format(None, "json"), OutputFormat::Json);
        assert_eq!(resolve_format(None, "table"), OutputFormat::Table);
    }

    #[test]
    fn test_resolve_output_prefers_cli_flag() {
        let arg = Path::new("cli.json");
        assert_eq!(resolve_output(Some(arg), "config.json"), Some(arg));
        assert_eq!(
            resolve_output(None, "config.json"),
            Some(Path::new("config.json"))
        );
        assert_eq!(resolve_output(None, ""), None);
    }

    #[test]
    fn test_file_sink_renders_plain_text() {
        use hullscan_core::types::{DetectedVulnerability, ScanResults, Severity};

        let mut results = ScanResults::new();
        results
            .push(
                "app",
                vec![DetectedVulnerability {
                    id: "CVE-1".to_owned(),
                    package: "pkg".to_owned(),
                    installed_version: "1.0".to_owned(),
                    fixed_version: None,
                    severity: Severity::Critical,
                    title: "t".to_owned(),
                    description: String::new(),
                }],
            )
            .unwrap();

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.txt");
        write_report(OutputFormat::Table, Some(&path), None, &results).expect("write report");

        let written = std::fs::read_to_string(&path).expect("read report");
        assert!(written.contains("CRITICAL"));
        assert!(
            !written.contains('\u{1b}'),
            "file sink must not contain ANSI color codes"
        );
    }
}

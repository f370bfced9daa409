//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Hullscan -- container image vulnerability scanner.
///
/// Use `hullscan <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "hullscan", version, about, long_about = None)]
pub struct Cli {
    /// Path to the hullscan.toml configuration file.
    #[arg(short, long, default_value = "hullscan.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table output.
    Table,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a container image or a filesystem archive.
    Scan(ScanArgs),

    /// Scan a single dependency manifest file (library mode).
    Manifest(ManifestArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Scan a container image or a filesystem archive.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image reference to scan (e.g. alpine:3.10). Mutually exclusive with --input.
    pub image: Option<String>,

    /// Read the filesystem from a tar(.gz) archive instead ("-" reads stdin).
    #[arg(short, long, conflicts_with = "image")]
    pub input: Option<PathBuf>,

    /// Comma-separated scan types to run (os, library). Defaults to the config value.
    #[arg(long, value_delimiter = ',')]
    pub vuln_type: Vec<String>,

    /// Report format. Defaults to the config value.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// ---- manifest ----

/// Scan a single dependency manifest (Cargo.lock, package-lock.json).
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Manifest path ("-" reads stdin).
    pub path: PathBuf,

    /// Report format. Defaults to the config value.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// ---- config ----

/// Manage hullscan configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_scan_image() {
        let cli = Cli::try_parse_from(["hullscan", "scan", "alpine:3.10"])
            .expect("should parse scan with image");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.image.as_deref(), Some("alpine:3.10"));
                assert!(args.input.is_none());
                assert!(args.vuln_type.is_empty());
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_input_archive() {
        let cli = Cli::try_parse_from(["hullscan", "scan", "--input", "rootfs.tar"])
            .expect("should parse scan with --input");
        match cli.command {
            Commands::Scan(args) => {
                assert!(args.image.is_none());
                assert_eq!(args.input, Some(PathBuf::from("rootfs.tar")));
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_stdin_dash() {
        let cli = Cli::try_parse_from(["hullscan", "scan", "-i", "-"])
            .expect("should parse '-' as input path");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.input, Some(PathBuf::from("-")));
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_scan_image_and_input_conflict() {
        let result =
            Cli::try_parse_from(["hullscan", "scan", "alpine:3.10", "--input", "rootfs.tar"]);
        assert!(result.is_err(), "image and --input must be mutually exclusive");
    }

    #[test]
    fn test_cli_parse_vuln_type_csv() {
        let cli = Cli::try_parse_from(["hullscan", "scan", "alpine:3.10", "--vuln-type", "os,library"])
            .expect("should parse csv vuln types");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.vuln_type, vec!["os", "library"]);
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_format_json() {
        let cli = Cli::try_parse_from(["hullscan", "scan", "alpine:3.10", "--format", "json"])
            .expect("should parse json format");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.format, Some(OutputFormat::Json));
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_output_file() {
        let cli = Cli::try_parse_from([
            "hullscan", "scan", "alpine:3.10", "--output", "report.json",
        ])
        .expect("should parse output path");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.output, Some(PathBuf::from("report.json")));
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_manifest() {
        let cli = Cli::try_parse_from(["hullscan", "manifest", "Cargo.lock"])
            .expect("should parse manifest command");
        match cli.command {
            Commands::Manifest(args) => {
                assert_eq!(args.path, PathBuf::from("Cargo.lock"));
            }
            _ => panic!("expected Manifest command"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["hullscan", "config", "validate"])
            .expect("should parse config validate");
        match cli.command {
            Commands::Config(args) => {
                assert!(matches!(args.action, ConfigAction::Validate));
            }
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_custom_config_path() {
        let cli = Cli::try_parse_from(["hullscan", "-c", "/etc/hullscan.toml", "config", "show"])
            .expect("should parse custom config path");
        assert_eq!(cli.config, PathBuf::from("/etc/hullscan.toml"));
    }

    #[test]
    fn test_cli_parse_log_level_override() {
        let cli = Cli::try_parse_from(["hullscan", "--log-level", "debug", "scan", "app:1"])
            .expect("should parse log level");
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        assert!(Cli::try_parse_from(["hullscan"]).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "hullscan");

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        assert!(subcommands.contains(&"scan"), "should have 'scan' subcommand");
        assert!(
            subcommands.contains(&"manifest"),
            "should have 'manifest' subcommand"
        );
        assert!(
            subcommands.contains(&"config"),
            "should have 'config' subcommand"
        );
    }
}

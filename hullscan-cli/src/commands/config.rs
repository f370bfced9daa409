//! `hullscan config` command handler

use std::path::Path;

use hullscan_core::config::HullscanConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;

/// Execute the `config` command.
///
/// `validate` re-loads the file strictly (a missing file is an error here,
/// unlike the scan commands which fall back to defaults). `show` prints the
/// effective configuration already resolved by the caller.
pub async fn execute(
    args: ConfigArgs,
    config: &HullscanConfig,
    config_path: &Path,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => {
            HullscanConfig::load(config_path)
                .await
                .map_err(|e| CliError::Config(e.to_string()))?;
            println!("configuration OK: {}", config_path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let rendered =
                toml::to_string_pretty(config).map_err(|e| CliError::Config(e.to_string()))?;
            print!("{rendered}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_validate_accepts_valid_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[general]\nlog_level = \"debug\"").expect("write config");

        let args = ConfigArgs {
            action: ConfigAction::Validate,
        };
        let result = execute(args, &HullscanConfig::default(), file.path()).await;
        assert!(result.is_ok(), "valid config should pass validation");
    }

    #[tokio::test]
    async fn test_validate_rejects_missing_file() {
        let args = ConfigArgs {
            action: ConfigAction::Validate,
        };
        let err = execute(
            args,
            &HullscanConfig::default(),
            Path::new("/nonexistent/hullscan.toml"),
        )
        .await
        .expect_err("missing file must fail validation");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_validate_rejects_invalid_value() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[report]\nformat = \"yaml\"").expect("write config");

        let args = ConfigArgs {
            action: ConfigAction::Validate,
        };
        let err = execute(args, &HullscanConfig::default(), file.path())
            .await
            .expect_err("invalid value must fail validation");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_show_renders_config() {
        let args = ConfigArgs {
            action: ConfigAction::Show,
        };
        let result = execute(args, &HullscanConfig::default(), Path::new("hullscan.toml")).await;
        assert!(result.is_ok(), "show should render the default config");
    }
}

//! hullscan CLI 진입점
//!
//! 설정 로딩 → 로깅 초기화 → 서브커맨드 디스패치 순서로 실행하며,
//! 에러는 [`CliError::exit_code`] 매핑에 따라 종료 코드로 변환됩니다.
//! 사용법 에러(종료 코드 64)는 도움말을 함께 출력합니다.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::{CommandFactory, Parser};

use hullscan_core::config::HullscanConfig;
use hullscan_core::error::{ConfigError, HullscanError};

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("hullscan: {e}");
        if matches!(e, CliError::Usage(_)) {
            let _ = Cli::command().print_help();
        }
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli).await?;

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.general.log_level.clone());
    logging::init_tracing(&log_level, &config.general.log_format)?;

    tracing::debug!(config = %cli.config.display(), "hullscan starting");

    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &config).await,
        Commands::Manifest(args) => commands::manifest::execute(args, &config),
        Commands::Config(args) => commands::config::execute(args, &config, &cli.config).await,
    }
}

/// 설정 파일을 로드합니다.
///
/// 기본 경로에 파일이 없으면 기본값 + 환경변수 오버라이드로 동작합니다
/// (`config validate`만 파일 부재를 에러로 취급).
async fn load_config(cli: &Cli) -> Result<HullscanConfig, CliError> {
    match HullscanConfig::load(&cli.config).await {
        Ok(config) => Ok(config),
        Err(HullscanError::Config(ConfigError::FileNotFound { .. })) => {
            let mut config = HullscanConfig::default();
            config.apply_env_overrides();
            config
                .validate()
                .map_err(|e| CliError::Config(e.to_string()))?;
            Ok(config)
        }
        Err(e) => Err(CliError::Config(e.to_string())),
    }
}

//! 설정 관리 — hullscan.toml 파싱 및 런타임 설정
//!
//! [`HullscanConfig`]는 모든 크레이트가 공유하는 최상위 설정 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HULLSCAN_SCAN_VULN_TYPES=os,library` 형식)
//! 3. 설정 파일 (`hullscan.toml`)
//! 4. 기본값 (`Default` 구현)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HullscanError};
use crate::types::{ScanOptions, VulnType};

/// Hullscan 통합 설정
///
/// `hullscan.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HullscanConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// Docker 데몬 설정
    #[serde(default)]
    pub docker: DockerConfig,
    /// 스캔 설정
    #[serde(default)]
    pub scan: ScanConfig,
    /// 리포트 설정
    #[serde(default)]
    pub report: ReportConfig,
}

impl HullscanConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, HullscanError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, HullscanError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HullscanError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                HullscanError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, HullscanError> {
        toml::from_str(toml_str).map_err(|e| {
            HullscanError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HULLSCAN_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "HULLSCAN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HULLSCAN_GENERAL_LOG_FORMAT");

        override_string(&mut self.docker.socket, "HULLSCAN_DOCKER_SOCKET");

        override_csv(&mut self.scan.vuln_types, "HULLSCAN_SCAN_VULN_TYPES");
        override_string(
            &mut self.scan.advisory_db_path,
            "HULLSCAN_SCAN_ADVISORY_DB_PATH",
        );

        override_string(&mut self.report.format, "HULLSCAN_REPORT_FORMAT");
        override_string(&mut self.report.output, "HULLSCAN_REPORT_OUTPUT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HullscanError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        for value in &self.scan.vuln_types {
            if VulnType::from_str_loose(value).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "scan.vuln_types".to_owned(),
                    reason: format!("unknown scan type '{value}' (expected: os, library)"),
                }
                .into());
            }
        }

        let valid_report_formats = ["table", "json"];
        if !valid_report_formats.contains(&self.report.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "report.format".to_owned(),
                reason: format!("must be one of: {}", valid_report_formats.join(", ")),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// Docker 데몬 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Docker 소켓 경로 (비어 있으면 플랫폼 기본값 사용)
    pub socket: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: String::new(),
        }
    }
}

/// 스캔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 실행할 스캔 종류 (os, library)
    pub vuln_types: Vec<String>,
    /// advisory DB 디렉토리 경로
    pub advisory_db_path: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            vuln_types: vec!["os".to_owned(), "library".to_owned()],
            advisory_db_path: "/var/lib/hullscan/advisory-db".to_owned(),
        }
    }
}

impl ScanConfig {
    /// 설정 문자열을 [`ScanOptions`]로 변환합니다.
    ///
    /// `validate()`를 통과한 설정에서는 실패하지 않습니다.
    pub fn scan_options(&self) -> Result<ScanOptions, ConfigError> {
        let mut vuln_types = Vec::with_capacity(self.vuln_types.len());
        for value in &self.vuln_types {
            let parsed =
                VulnType::from_str_loose(value).ok_or_else(|| ConfigError::InvalidValue {
                    field: "scan.vuln_types".to_owned(),
                    reason: format!("unknown scan type '{value}'"),
                })?;
            if !vuln_types.contains(&parsed) {
                vuln_types.push(parsed);
            }
        }
        Ok(ScanOptions { vuln_types })
    }
}

/// 리포트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 리포트 형식 (table, json)
    pub format: String,
    /// 출력 파일 경로 (비어 있으면 표준 출력)
    pub output: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "table".to_owned(),
            output: String::new(),
        }
    }
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(value) = std::env::var(env_key)
        && !value.is_empty()
    {
        *target = value;
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(value) = std::env::var(env_key)
        && !value.is_empty()
    {
        *target = value
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

//! JSON 렌더러
//!
//! 하나의 문서를 출력합니다:
//!
//! - `summary`: OS 패밀리/버전과 전체 대상 합산 심각도별 개수
//! - `detail`: 집계된 결과 집합 전체 — 잘림도 색상도 없는 원본 그대로
//!
//! 필드 순서는 구조체 선언 순서, 들여쓰기는 2칸으로 결정적입니다.
//! 직렬화 실패는 치명적이며, 부분 출력은 성공으로 간주되지 않습니다.

use std::io::Write;

use serde::{Deserialize, Serialize};

use hullscan_core::error::ReportError;
use hullscan_core::types::{OsRelease, ScanResults};

use crate::ReportWriter;

/// JSON 리포트 문서
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonReport {
    pub summary: JsonSummary,
    pub detail: ScanResults,
}

/// 최상위 요약 — 전체 대상의 취약점 합산
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSummary {
    /// OS 패밀리 (OS 스캔이 실행되지 않았으면 빈 문자열)
    pub os_family: String,
    /// OS 버전
    pub os_version: String,
    #[serde(rename = "CRITICAL")]
    pub critical: usize,
    #[serde(rename = "HIGH")]
    pub high: usize,
    #[serde(rename = "MEDIUM")]
    pub medium: usize,
    #[serde(rename = "LOW")]
    pub low: usize,
    #[serde(rename = "UNKNOWN")]
    pub unknown: usize,
}

impl JsonReport {
    /// 결과 집합에서 리포트 문서를 구성합니다.
    pub fn build(os: Option<&OsRelease>, results: &ScanResults) -> Self {
        let counts = results.severity_counts();
        let summary = JsonSummary {
            os_family: os.map(|o| o.family.to_string()).unwrap_or_default(),
            os_version: os.map(|o| o.version.clone()).unwrap_or_default(),
            critical: counts.critical,
            high: counts.high,
            medium: counts.medium,
            low: counts.low,
            unknown: counts.unknown,
        };
        Self {
            summary,
            detail: results.clone(),
        }
    }
}

/// JSON 리포트 작성기
pub struct JsonWriter<W> {
    output: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    /// 내부 싱크를 꺼냅니다 (테스트용).
    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write(
        &mut self,
        os: Option<&OsRelease>,
        results: &ScanResults,
    ) -> Result<(), ReportError> {
        let report = JsonReport::build(os, results);
        let json = serde_json::to_string_pretty(&report).map_err(ReportError::Serialize)?;
        writeln!(self.output, "{json}")?;
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hullscan_core::types::{DetectedVulnerability, OsFamily, Severity};

    fn finding(id: &str, severity: Severity) -> DetectedVulnerability {
        DetectedVulnerability {
            id: id.to_owned(),
            package: "openssl".to_owned(),
            installed_version: "1.1.1c-r0".to_owned(),
            fixed_version: None,
            severity,
            title: "title".to_owned(),
            description: "description".to_owned(),
        }
    }

    fn sample_results() -> ScanResults {
        let mut results = ScanResults::new();
        results
            .push(
                "app (alpine 3.10.2)",
                vec![
                    finding("CVE-1", Severity::Critical),
                    finding("CVE-2", Severity::Medium),
                ],
            )
            .unwrap();
        results
            .push("app/Cargo.lock", vec![finding("RUSTSEC-1", Severity::Critical)])
            .unwrap();
        results
    }

    fn alpine() -> OsRelease {
        OsRelease {
            family: OsFamily::Alpine,
            version: "3.10.2".to_owned(),
        }
    }

    #[test]
    fn summary_counts_union_across_targets() {
        let report = JsonReport::build(Some(&alpine()), &sample_results());
        assert_eq!(report.summary.critical, 2);
        assert_eq!(report.summary.medium, 1);
        assert_eq!(report.summary.high + report.summary.low + report.summary.unknown, 0);

        let total = report.summary.critical
            + report.summary.high
            + report.summary.medium
            + report.summary.low
            + report.summary.unknown;
        assert_eq!(total, sample_results().total_vulnerabilities());
    }

    #[test]
    fn summary_carries_os_identity() {
        let report = JsonReport::build(Some(&alpine()), &sample_results());
        assert_eq!(report.summary.os_family, "alpine");
        assert_eq!(report.summary.os_version, "3.10.2");
    }

    #[test]
    fn missing_os_serializes_as_empty_strings() {
        let report = JsonReport::build(None, &ScanResults::new());
        assert_eq!(report.summary.os_family, "");
        assert_eq!(report.summary.os_version, "");
    }

    #[test]
    fn severity_keys_are_canonical_names() {
        let mut writer = JsonWriter::new(Vec::new());
        writer.write(Some(&alpine()), &sample_results()).unwrap();
        let output = String::from_utf8(writer.into_inner()).unwrap();

        for key in ["\"CRITICAL\"", "\"HIGH\"", "\"MEDIUM\"", "\"LOW\"", "\"UNKNOWN\""] {
            assert!(output.contains(key), "summary should contain {key}");
        }
    }

    #[test]
    fn output_is_deterministic() {
        let render = || {
            let mut writer = JsonWriter::new(Vec::new());
            writer.write(Some(&alpine()), &sample_results()).unwrap();
            String::from_utf8(writer.into_inner()).unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn roundtrip_preserves_detail_and_summary() {
        let results = sample_results();
        let mut writer = JsonWriter::new(Vec::new());
        writer.write(Some(&alpine()), &results).unwrap();
        let output = String::from_utf8(writer.into_inner()).unwrap();

        let decoded: JsonReport = serde_json::from_str(&output).expect("decode");
        assert_eq!(decoded.detail, results);
        assert_eq!(decoded, JsonReport::build(Some(&alpine()), &results));
    }
}

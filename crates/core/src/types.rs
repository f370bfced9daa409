//! 도메인 타입 — 스캔 파이프라인 전역에서 사용되는 공통 타입
//!
//! 심각도, 탐지된 취약점, OS 패키지, 스캔 결과 집합 등
//! 모든 크레이트가 공유하는 데이터 구조를 정의합니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// 추출된 파일시스템의 파일 맵
///
/// 정규화된 경로(선행 `/`, `./` 제거)를 키로, 파일 내용을 값으로 가집니다.
/// `BTreeMap`이므로 순회 순서가 결정적이며, 매니페스트 발견 순서가 곧
/// 리포트 순서가 됩니다.
pub type FileMap = BTreeMap<String, Vec<u8>>;

/// 심각도 레벨
///
/// 닫힌 열거형으로, 우선순위는 `Critical > High > Medium > Low > Unknown`입니다.
/// 오름차순으로 선언되어 있어 파생된 `Ord`가 이 우선순위와 일치합니다.
/// 표시 순서는 [`Severity::DISPLAY_ORDER`]를 사용합니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// 인식되지 않은 심각도
    #[default]
    Unknown,
    /// 낮은 심각도
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도
    High,
    /// 치명적
    Critical,
}

impl Severity {
    /// 리포트 표시 순서 (심각한 것부터)
    pub const DISPLAY_ORDER: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Unknown,
    ];

    /// 원시 심각도 문자열을 정규 레벨로 분류합니다.
    ///
    /// 대소문자를 구분하지 않으며, 인식되지 않는 값(빈 문자열 포함)은
    /// 항상 [`Severity::Unknown`]으로 분류됩니다. 전역적(total) 함수입니다.
    pub fn classify(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }

    /// 정규 심각도 이름을 반환합니다.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 심각도별 취약점 개수
///
/// 두 렌더러의 요약 라인이 모두 이 구조를 사용합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
}

impl SeverityCounts {
    /// 취약점 목록을 심각도별로 집계합니다.
    pub fn tally<'a>(findings: impl IntoIterator<Item = &'a DetectedVulnerability>) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            counts.add(finding.severity);
        }
        counts
    }

    /// 단일 심각도를 집계에 더합니다.
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Unknown => self.unknown += 1,
        }
    }

    /// 주어진 심각도의 개수를 반환합니다.
    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Unknown => self.unknown,
        }
    }

    /// 전체 취약점 수를 반환합니다.
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.unknown
    }
}

/// 탐지된 취약점
///
/// 설치된 아티팩트 하나에 매칭된 취약점 하나를 나타냅니다.
/// 식별자 + 패키지명 + 설치 버전이 스캔 대상 내에서 고유성을 결정하지만,
/// 이 코어는 중복 제거를 수행하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedVulnerability {
    /// 취약점 식별자 (예: CVE-2019-1549)
    pub id: String,
    /// 영향받는 패키지/라이브러리명
    pub package: String,
    /// 설치된 버전
    pub installed_version: String,
    /// 수정된 버전 (None이면 수정 버전 없음)
    pub fixed_version: Option<String>,
    /// 심각도
    pub severity: Severity,
    /// 취약점 제목
    pub title: String,
    /// 상세 설명
    pub description: String,
}

impl fmt::Display for DetectedVulnerability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} {} (fixed: {})",
            self.id,
            self.severity,
            self.package,
            self.installed_version,
            self.fixed_version.as_deref().unwrap_or("N/A"),
        )
    }
}

/// 설치된 OS 패키지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// 패키지 이름
    pub name: String,
    /// 설치된 버전
    pub version: String,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// OS 패밀리
///
/// 탐지기 레지스트리의 키로 사용됩니다. 지원되지 않는 배포판은
/// [`OsFamily::Other`]로 보존되어 unsupported-os 에러 경로에서
/// 원본 식별자를 드러낼 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Alpine,
    Debian,
    Ubuntu,
    RedHat,
    CentOs,
    /// 인식은 되었지만 지원 목록에 없는 패밀리
    Other(String),
}

impl OsFamily {
    /// os-release의 `ID` 값(또는 동등한 마커)에서 패밀리를 판별합니다.
    pub fn from_release_id(id: &str) -> Self {
        match id.to_lowercase().as_str() {
            "alpine" => Self::Alpine,
            "debian" => Self::Debian,
            "ubuntu" => Self::Ubuntu,
            "rhel" | "redhat" => Self::RedHat,
            "centos" => Self::CentOs,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alpine => f.write_str("alpine"),
            Self::Debian => f.write_str("debian"),
            Self::Ubuntu => f.write_str("ubuntu"),
            Self::RedHat => f.write_str("redhat"),
            Self::CentOs => f.write_str("centos"),
            Self::Other(id) => f.write_str(id),
        }
    }
}

/// 식별된 OS 배포판 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsRelease {
    /// OS 패밀리
    pub family: OsFamily,
    /// 배포판 버전 (예: "3.10.2", "9.8", "18.04")
    pub version: String,
}

impl fmt::Display for OsRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.version)
    }
}

/// 스캔 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VulnType {
    /// OS 패키지 취약점 스캔
    Os,
    /// 애플리케이션 라이브러리 취약점 스캔
    Library,
}

impl VulnType {
    /// 문자열에서 스캔 종류를 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "os" | "ospkg" => Some(Self::Os),
            "library" | "lib" => Some(Self::Library),
            _ => None,
        }
    }
}

impl fmt::Display for VulnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Os => f.write_str("os"),
            Self::Library => f.write_str("library"),
        }
    }
}

/// 스캔 옵션
///
/// 어떤 스캔 종류를 실행할지 열거합니다. 값이 없는 종류는 단순히
/// 건너뛰며, 이는 에러가 아닙니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// 실행할 스캔 종류 목록
    pub vuln_types: Vec<VulnType>,
}

impl ScanOptions {
    /// 주어진 스캔 종류가 요청되었는지 확인합니다.
    pub fn includes(&self, vuln_type: VulnType) -> bool {
        self.vuln_types.contains(&vuln_type)
    }
}

impl Default for ScanOptions {
    /// 기본값은 OS와 라이브러리 스캔을 모두 실행합니다.
    fn default() -> Self {
        Self {
            vuln_types: vec![VulnType::Os, VulnType::Library],
        }
    }
}

/// 스캔 대상 하나의 결과
///
/// 대상 이름(OS 식별 문자열 또는 매니페스트 경로)과 해당 대상에서
/// 발견된 취약점 목록의 쌍입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// 스캔 대상 이름
    pub target: String,
    /// 발견된 취약점 목록 (탐지기가 반환한 순서 그대로)
    pub vulnerabilities: Vec<DetectedVulnerability>,
}

/// 집계된 스캔 결과 집합
///
/// (스캔 대상 이름, 취약점 목록) 쌍의 순서 있는 시퀀스입니다.
/// 삽입 순서 = 리포트 순서이며(OS 대상 먼저, 이후 매니페스트 발견 순),
/// 이 순서는 외부에서 관찰 가능한 계약입니다.
///
/// 대상 이름의 고유성은 [`ScanResults::push`]에서 명시적으로 강제됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanResults {
    entries: Vec<ScanEntry>,
}

impl ScanResults {
    /// 빈 결과 집합을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 스캔 대상 하나를 결과 집합 끝에 추가합니다.
    ///
    /// 이미 같은 이름의 대상이 있으면 [`ScanError::DuplicateTarget`]을
    /// 반환합니다. 덮어쓰기는 수행하지 않습니다.
    pub fn push(
        &mut self,
        target: impl Into<String>,
        vulnerabilities: Vec<DetectedVulnerability>,
    ) -> Result<(), ScanError> {
        let target = target.into();
        if self.entries.iter().any(|e| e.target == target) {
            return Err(ScanError::DuplicateTarget { target });
        }
        self.entries.push(ScanEntry {
            target,
            vulnerabilities,
        });
        Ok(())
    }

    /// 결과 집합의 모든 항목을 순서대로 반환합니다.
    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 모든 대상의 취약점을 합쳐 심각도별로 집계합니다.
    ///
    /// 구조화 리포트의 최상위 요약이 이 값을 사용합니다.
    pub fn severity_counts(&self) -> SeverityCounts {
        SeverityCounts::tally(self.entries.iter().flat_map(|e| &e.vulnerabilities))
    }

    /// 전체 취약점 수를 반환합니다.
    pub fn total_vulnerabilities(&self) -> usize {
        self.entries.iter().map(|e| e.vulnerabilities.len()).sum()
    }
}

impl<'a> IntoIterator for &'a ScanResults {
    type Item = &'a ScanEntry;
    type IntoIter = std::slice::Iter<'a, ScanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(id: &str, severity: Severity) -> DetectedVulnerability {
        DetectedVulnerability {
            id: id.to_owned(),
            package: "openssl".to_owned(),
            installed_version: "1.1.1c-r0".to_owned(),
            fixed_version: Some("1.1.1d-r0".to_owned()),
            severity,
            title: "test".to_owned(),
            description: "test vulnerability".to_owned(),
        }
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Unknown < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_default_is_unknown() {
        assert_eq!(Severity::default(), Severity::Unknown);
    }

    #[test]
    fn severity_display_uses_canonical_names() {
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
        assert_eq!(Severity::High.to_string(), "HIGH");
        assert_eq!(Severity::Medium.to_string(), "MEDIUM");
        assert_eq!(Severity::Low.to_string(), "LOW");
        assert_eq!(Severity::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn classify_recognized_labels() {
        assert_eq!(Severity::classify("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::classify("high"), Severity::High);
        assert_eq!(Severity::classify("Medium"), Severity::Medium);
        assert_eq!(Severity::classify("LOW"), Severity::Low);
    }

    #[test]
    fn classify_is_total() {
        assert_eq!(Severity::classify(""), Severity::Unknown);
        assert_eq!(Severity::classify("negligible"), Severity::Unknown);
        assert_eq!(Severity::classify("IMPORTANT"), Severity::Unknown);
        assert_eq!(Severity::classify("  high  "), Severity::Unknown);
    }

    #[test]
    fn display_order_is_severe_first() {
        assert_eq!(Severity::DISPLAY_ORDER[0], Severity::Critical);
        assert_eq!(Severity::DISPLAY_ORDER[4], Severity::Unknown);
        assert_eq!(Severity::DISPLAY_ORDER.len(), 5);
    }

    #[test]
    fn severity_serialize_roundtrip() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::Critical);
    }

    #[test]
    fn severity_counts_tally_and_total() {
        let findings = vec![
            finding("CVE-1", Severity::Critical),
            finding("CVE-2", Severity::High),
            finding("CVE-3", Severity::High),
            finding("CVE-4", Severity::Unknown),
        ];
        let counts = SeverityCounts::tally(&findings);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.total(), findings.len());
    }

    #[test]
    fn severity_counts_by_level() {
        let mut counts = SeverityCounts::default();
        counts.add(Severity::Low);
        counts.add(Severity::Low);
        assert_eq!(counts.count(Severity::Low), 2);
        assert_eq!(counts.count(Severity::Critical), 0);
    }

    #[test]
    fn vulnerability_display() {
        let v = finding("CVE-2019-1549", Severity::Medium);
        let display = v.to_string();
        assert!(display.contains("CVE-2019-1549"));
        assert!(display.contains("MEDIUM"));
        assert!(display.contains("1.1.1d-r0"));
    }

    #[test]
    fn vulnerability_display_without_fix() {
        let mut v = finding("CVE-2019-1549", Severity::Medium);
        v.fixed_version = None;
        assert!(v.to_string().contains("N/A"));
    }

    #[test]
    fn os_family_from_release_id() {
        assert_eq!(OsFamily::from_release_id("alpine"), OsFamily::Alpine);
        assert_eq!(OsFamily::from_release_id("Ubuntu"), OsFamily::Ubuntu);
        assert_eq!(OsFamily::from_release_id("rhel"), OsFamily::RedHat);
        assert_eq!(OsFamily::from_release_id("centos"), OsFamily::CentOs);
        assert_eq!(
            OsFamily::from_release_id("fedora"),
            OsFamily::Other("fedora".to_owned())
        );
    }

    #[test]
    fn os_release_display() {
        let os = OsRelease {
            family: OsFamily::Alpine,
            version: "3.10.2".to_owned(),
        };
        assert_eq!(os.to_string(), "alpine 3.10.2");
    }

    #[test]
    fn vuln_type_from_str_loose() {
        assert_eq!(VulnType::from_str_loose("os"), Some(VulnType::Os));
        assert_eq!(VulnType::from_str_loose("LIBRARY"), Some(VulnType::Library));
        assert_eq!(VulnType::from_str_loose("lib"), Some(VulnType::Library));
        assert_eq!(VulnType::from_str_loose("sbom"), None);
    }

    #[test]
    fn scan_options_default_runs_both() {
        let options = ScanOptions::default();
        assert!(options.includes(VulnType::Os));
        assert!(options.includes(VulnType::Library));
    }

    #[test]
    fn scan_options_empty_skips_everything() {
        let options = ScanOptions { vuln_types: vec![] };
        assert!(!options.includes(VulnType::Os));
        assert!(!options.includes(VulnType::Library));
    }

    #[test]
    fn scan_results_preserve_insertion_order() {
        let mut results = ScanResults::new();
        results.push("app (alpine 3.10.2)", vec![]).unwrap();
        results.push("app/Cargo.lock", vec![]).unwrap();
        results.push("app/package-lock.json", vec![]).unwrap();

        let targets: Vec<&str> = results.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(
            targets,
            vec!["app (alpine 3.10.2)", "app/Cargo.lock", "app/package-lock.json"]
        );
    }

    #[test]
    fn scan_results_reject_duplicate_target() {
        let mut results = ScanResults::new();
        results.push("Cargo.lock", vec![]).unwrap();
        let err = results.push("Cargo.lock", vec![]).unwrap_err();
        assert!(matches!(err, ScanError::DuplicateTarget { target } if target == "Cargo.lock"));
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn scan_results_union_counts() {
        let mut results = ScanResults::new();
        results
            .push("a", vec![finding("CVE-1", Severity::Critical)])
            .unwrap();
        results
            .push(
                "b",
                vec![
                    finding("CVE-2", Severity::Critical),
                    finding("CVE-3", Severity::Low),
                ],
            )
            .unwrap();

        let counts = results.severity_counts();
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.total(), results.total_vulnerabilities());
    }

    #[test]
    fn scan_results_serialize_as_array() {
        let mut results = ScanResults::new();
        results.push("Cargo.lock", vec![]).unwrap();
        let json = serde_json::to_string(&results).unwrap();
        assert!(json.starts_with('['));
        let back: ScanResults = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }
}

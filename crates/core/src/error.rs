//! 에러 타입 — 단계별 에러 정의
//!
//! 각 파이프라인 단계(설정, 분석, 스캔, 리포트)가 자기 에러 열거형을
//! 가지며, [`HullscanError`]가 `#[from]` 변환으로 이를 감쌉니다.
//! 단계 태그와 원인이 함께 보존되어 호출자가 단계 단위로 매칭하면서도
//! 원본 원인을 조회할 수 있습니다.

/// Hullscan 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum HullscanError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파일시스템 분석 에러 (추출, OS 식별, 패키지 열거)
    #[error("analyze error: {0}")]
    Analyze(#[from] AnalyzeError),

    /// 스캔 파이프라인 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// 리포트 렌더링 에러
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파일시스템 분석 에러
///
/// 이미지/아카이브 추출과 파일 맵 분석 단계에서 발생합니다.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// 아카이브 추출 실패
    #[error("failed to extract archive: {reason}")]
    Extract { reason: String },

    /// Docker 데몬 연결 실패
    #[error("docker connection failed: {0}")]
    DockerConnection(String),

    /// 이미지 내보내기 실패
    #[error("failed to export image '{image}': {reason}")]
    ImageExport { image: String, reason: String },

    /// 이미지 아카이브 구조가 올바르지 않음
    #[error("malformed image archive: {reason}")]
    ImageLayout { reason: String },

    /// OS 마커 파일이 손상됨
    #[error("os marker file '{path}' is not valid: {reason}")]
    OsMarker { path: String, reason: String },

    /// 패키지 데이터베이스 파싱 실패
    #[error("package database '{path}' could not be parsed: {reason}")]
    PackageDb { path: String, reason: String },

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 스캔 파이프라인 에러
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 이미지 이름도 입력 파일도 지정되지 않음 (또는 둘 다 지정됨)
    #[error("either an image name or an input file must be specified")]
    MissingInput,

    /// 지원되지 않는 OS 패밀리 — OS 스캔 단계의 종료 에러
    #[error("unsupported os family: {family}")]
    UnsupportedOs { family: String },

    /// OS 식별 단계 실패 (마커 부재가 아닌 실제 실패)
    #[error("failed to detect os identity: {source}")]
    OsDetection {
        #[source]
        source: AnalyzeError,
    },

    /// 패키지 열거 단계 실패
    #[error("failed to enumerate os packages: {source}")]
    PackageEnumeration {
        #[source]
        source: AnalyzeError,
    },

    /// 탐지기 호출 실패
    #[error("vulnerability detection failed for {family}: {reason}")]
    Detection { family: String, reason: String },

    /// 라이브러리 스캔 실패
    #[error("library scan failed: {path}: {reason}")]
    Library { path: String, reason: String },

    /// 취약점 advisory 데이터베이스 에러
    #[error("advisory db error: {reason}")]
    AdvisoryDb { reason: String },

    /// 스캔 대상 이름 충돌
    #[error("duplicate scan target: {target}")]
    DuplicateTarget { target: String },
}

/// 리포트 렌더링 에러
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// 직렬화 실패 — 부분 출력은 성공으로 간주되지 않습니다
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 출력 싱크 쓰기 실패
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

//! OS 식별 — 마커 파일 기반 배포판 판별
//!
//! 파일 맵에서 배포판 마커 파일을 찾아 (패밀리, 버전)을 판별합니다.
//! 마커 우선순위:
//!
//! 1. `etc/alpine-release`
//! 2. `etc/os-release` (또는 `usr/lib/os-release`)
//! 3. `etc/debian_version`
//! 4. `etc/centos-release`, `etc/redhat-release`
//!
//! 어떤 마커도 없으면 `Ok(None)` — 에러가 아니라 "OS 스캔 미적용"
//! 조건이며, 호출자가 OS 스캔 대상을 생략합니다.

use tracing::debug;

use hullscan_core::error::AnalyzeError;
use hullscan_core::types::{FileMap, OsFamily, OsRelease};

/// 파일 맵에서 OS 배포판을 식별합니다.
pub fn identify_os(files: &FileMap) -> Result<Option<OsRelease>, AnalyzeError> {
    if let Some(content) = files.get("etc/alpine-release") {
        let version = marker_text("etc/alpine-release", content)?.trim().to_owned();
        if !version.is_empty() {
            return found(OsRelease {
                family: OsFamily::Alpine,
                version,
            });
        }
    }

    for path in ["etc/os-release", "usr/lib/os-release"] {
        if let Some(content) = files.get(path)
            && let Some(os) = from_os_release(path, content, files)?
        {
            return found(os);
        }
    }

    if let Some(content) = files.get("etc/debian_version") {
        let version = marker_text("etc/debian_version", content)?.trim().to_owned();
        if !version.is_empty() {
            return found(OsRelease {
                family: OsFamily::Debian,
                version,
            });
        }
    }

    if let Some(content) = files.get("etc/centos-release") {
        let text = marker_text("etc/centos-release", content)?;
        if let Some(version) = release_file_version(&text) {
            return found(OsRelease {
                family: OsFamily::CentOs,
                version,
            });
        }
    }
    if let Some(content) = files.get("etc/redhat-release") {
        let text = marker_text("etc/redhat-release", content)?;
        if let Some(version) = release_file_version(&text) {
            let family = if text.contains("CentOS") {
                OsFamily::CentOs
            } else {
                OsFamily::RedHat
            };
            return found(OsRelease { family, version });
        }
    }

    debug!("no os marker file found");
    Ok(None)
}

fn found(os: OsRelease) -> Result<Option<OsRelease>, AnalyzeError> {
    debug!(family = %os.family, version = %os.version, "os identified");
    Ok(Some(os))
}

/// os-release 파일에서 ID / VERSION_ID를 읽습니다.
///
/// `ID`가 debian인데 `VERSION_ID`가 없으면(sid 등)
/// `etc/debian_version`으로 버전을 보충합니다.
fn from_os_release(
    path: &str,
    content: &[u8],
    files: &FileMap,
) -> Result<Option<OsRelease>, AnalyzeError> {
    let text = marker_text(path, content)?;

    let mut id = None;
    let mut version_id = None;
    for line in text.lines() {
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"').to_owned();
            match key.trim() {
                "ID" => id = Some(value),
                "VERSION_ID" => version_id = Some(value),
                _ => {}
            }
        }
    }

    let Some(id) = id else { return Ok(None) };
    let family = OsFamily::from_release_id(&id);

    let version = match version_id {
        Some(v) if !v.is_empty() => v,
        _ if family == OsFamily::Debian => match files.get("etc/debian_version") {
            Some(raw) => marker_text("etc/debian_version", raw)?.trim().to_owned(),
            None => return Ok(None),
        },
        _ => return Ok(None),
    };

    Ok(Some(OsRelease { family, version }))
}

/// "CentOS Linux release 7.6.1810 (Core)" 류의 릴리스 파일에서
/// 버전 토큰을 추출합니다.
fn release_file_version(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .map(str::to_owned)
}

fn marker_text(path: &str, content: &[u8]) -> Result<String, AnalyzeError> {
    String::from_utf8(content.to_vec()).map_err(|e| AnalyzeError::OsMarker {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}

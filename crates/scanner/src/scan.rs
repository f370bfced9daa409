//! 스캔 실행 — 추출부터 결과 집계까지
//!
//! [`ScanRunner`]는 한 번의 스캔 호출을 끝까지 수행합니다:
//!
//! ```text
//! image ──(ImageSource::export_image)──> unpack_image_archive ─┐
//! input ──(파일 또는 stdin 읽기)──────> extract_archive ───────┤
//!                                                              ▼
//!                                                           FileMap
//!                                                              │
//!                               [os 요청 시] scan_os_packages ──┤
//!                        [library 요청 시] scan_manifests ──────┤
//!                                                              ▼
//!                                                         ScanResults
//! ```
//!
//! 결과 집합의 순서는 OS 대상(식별된 경우) 먼저, 이후 매니페스트
//! 발견 순서입니다. 한 호출 안에서 어떤 단계도 겹쳐 실행되지 않습니다.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use hullscan_core::contract::LibraryScanner;
use hullscan_core::error::{HullscanError, ScanError};
use hullscan_core::types::{FileMap, OsRelease, ScanOptions, ScanResults, VulnType};

use hullscan_analyzer::docker::ImageSource;
use hullscan_analyzer::extract::{extract_archive, unpack_image_archive};

use crate::ospkg::{DetectorRegistry, scan_os_packages};

/// 한 번의 스캔 호출이 낳는 전체 결과
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// 식별된 OS (OS 스캔이 실행되어 패밀리를 찾은 경우)
    pub os: Option<OsRelease>,
    /// 집계된 결과 집합
    pub results: ScanResults,
}

/// 스캔 실행기
///
/// 이미지 소스, 탐지기 레지스트리, 라이브러리 스캐너를 묶어
/// 스캔 호출의 진입점을 제공합니다. 호출 간 공유 가변 상태는 없습니다.
pub struct ScanRunner<S> {
    image_source: S,
    registry: DetectorRegistry,
    library: Arc<dyn LibraryScanner>,
}

impl<S> ScanRunner<S> {
    pub fn new(
        image_source: S,
        registry: DetectorRegistry,
        library: Arc<dyn LibraryScanner>,
    ) -> Self {
        Self {
            image_source,
            registry,
            library,
        }
    }

    /// 추출이 끝난 파일 맵을 스캔합니다.
    ///
    /// `target`은 OS 스캔 대상 이름의 앞부분이 되는 이미지/경로
    /// 문자열입니다.
    pub fn scan_filesystem(
        &self,
        target: &str,
        files: &FileMap,
        options: &ScanOptions,
    ) -> Result<ScanOutcome, HullscanError> {
        let mut results = ScanResults::new();
        let mut os = None;

        if options.includes(VulnType::Os) {
            match scan_os_packages(files, &self.registry)? {
                Some(scan) => {
                    let target_name =
                        format!("{} ({} {})", target, scan.os.family, scan.os.version);
                    results.push(target_name, scan.vulnerabilities)?;
                    os = Some(scan.os);
                }
                None => info!("no supported os detected, skipping os target"),
            }
        }

        if options.includes(VulnType::Library) {
            for (path, vulnerabilities) in self.library.scan_manifests(files, options)? {
                results.push(path, vulnerabilities)?;
            }
        }

        debug!(targets = results.len(), "scan aggregated");
        Ok(ScanOutcome { os, results })
    }

    /// 단일 매니페스트 파일을 스캔합니다 (단일 파일 모드).
    ///
    /// 결과 집합에는 파일 이름을 대상으로 하는 항목 하나가 들어갑니다.
    pub fn scan_file(&self, name: &str, content: &[u8]) -> Result<ScanResults, HullscanError> {
        let vulnerabilities = self.library.scan_manifest(name, content)?;
        let mut results = ScanResults::new();
        results.push(name, vulnerabilities)?;
        Ok(results)
    }
}

impl<S: ImageSource> ScanRunner<S> {
    /// 이미지 또는 입력 파일을 스캔합니다.
    ///
    /// `image`와 `input` 중 정확히 하나만 지정되어야 하며, 그렇지 않으면
    /// [`ScanError::MissingInput`]입니다. `input`이 `-`이면 표준 입력을
    /// 읽습니다 (대화형 단말 검사는 호출자 책임).
    pub async fn scan_image(
        &self,
        image: Option<&str>,
        input: Option<&Path>,
        options: &ScanOptions,
    ) -> Result<ScanOutcome, HullscanError> {
        let (target, files) = match (image, input) {
            (Some(image), None) => {
                info!(image = %image, "exporting image");
                let archive = self.image_source.export_image(image).await?;
                (image.to_owned(), unpack_image_archive(&archive)?)
            }
            (None, Some(path)) => {
                let data = read_input(path)?;
                (path.display().to_string(), extract_archive(&data)?)
            }
            _ => return Err(ScanError::MissingInput.into()),
        };

        self.scan_filesystem(&target, &files, options)
    }
}

/// 입력 경로를 읽습니다. `-`는 표준 입력을 의미합니다.
fn read_input(path: &Path) -> Result<Vec<u8>, HullscanError> {
    if path == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        return Ok(data);
    }
    Ok(std::fs::read(path)?)
}

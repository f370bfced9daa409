//! 아카이브 추출 — tar/tar.gz rootfs와 docker-save 이미지 아카이브 전개
//!
//! 추출 결과는 정규화된 경로를 키로 하는 [`FileMap`]입니다.
//! 일반 파일만 보존하며, 디렉토리·심볼릭 링크·디바이스 노드는 버립니다.
//!
//! # 지원 형식
//!
//! - rootfs tar / tar.gz (`docker export` 출력 등) — [`extract_archive`]
//! - docker-save 아카이브 (`manifest.json` + 레이어 tar) —
//!   [`unpack_image_archive`]. 레이어는 manifest 순서대로 적용되고
//!   `.wh.` whiteout 항목이 하위 레이어의 파일을 제거합니다.

use std::io::Read;

use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::debug;

use hullscan_core::error::AnalyzeError;
use hullscan_core::types::FileMap;

/// gzip 매직 바이트
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// whiteout 파일명 접두사 (OCI layer 규약)
const WHITEOUT_PREFIX: &str = ".wh.";

/// opaque whiteout 파일명 — 디렉토리 전체를 가립니다
const OPAQUE_WHITEOUT: &str = ".wh..wh..opq";

/// rootfs tar(.gz) 아카이브를 파일 맵으로 전개합니다.
pub fn extract_archive(data: &[u8]) -> Result<FileMap, AnalyzeError> {
    let mut files = FileMap::new();
    apply_layer(&mut files, data)?;
    debug!(files = files.len(), "archive extracted");
    Ok(files)
}

/// docker-save 형식 이미지 아카이브를 파일 맵으로 전개합니다.
///
/// `manifest.json`의 레이어 목록 순서대로 각 레이어 tar를 적용합니다.
/// `manifest.json`이 없는 아카이브는 단일 rootfs tar(`docker export`
/// 출력)로 간주합니다.
pub fn unpack_image_archive(data: &[u8]) -> Result<FileMap, AnalyzeError> {
    let entries = read_entries(data)?;

    let Some(manifest_raw) = entries.iter().find(|(p, _)| p == "manifest.json") else {
        debug!("no manifest.json, treating archive as a flat rootfs");
        return extract_archive(data);
    };

    let manifests: Vec<ImageManifest> =
        serde_json::from_slice(&manifest_raw.1).map_err(|e| AnalyzeError::ImageLayout {
            reason: format!("invalid manifest.json: {e}"),
        })?;
    let manifest = manifests.first().ok_or_else(|| AnalyzeError::ImageLayout {
        reason: "manifest.json contains no images".to_owned(),
    })?;

    let mut files = FileMap::new();
    for layer_path in &manifest.layers {
        let normalized = normalize_path(layer_path);
        let layer = entries
            .iter()
            .find(|(p, _)| *p == normalized)
            .ok_or_else(|| AnalyzeError::ImageLayout {
                reason: format!("layer '{layer_path}' missing from archive"),
            })?;
        apply_layer(&mut files, &layer.1)?;
    }
    debug!(
        layers = manifest.layers.len(),
        files = files.len(),
        "image archive unpacked"
    );
    Ok(files)
}

/// docker-save `manifest.json`의 이미지 항목
#[derive(Debug, Deserialize)]
struct ImageManifest {
    #[serde(rename = "Layers")]
    layers: Vec<String>,
}

/// tar 아카이브의 일반 파일 항목을 (경로, 내용) 목록으로 읽습니다.
fn read_entries(data: &[u8]) -> Result<Vec<(String, Vec<u8>)>, AnalyzeError> {
    let reader = decompressed(data);
    let mut archive = tar::Archive::new(reader);
    let mut entries = Vec::new();

    for entry in archive.entries().map_err(extract_error)? {
        let mut entry = entry.map_err(extract_error)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = normalize_path(&entry.path().map_err(extract_error)?.to_string_lossy());
        let mut content = Vec::new();
        entry.read_to_end(&mut content).map_err(extract_error)?;
        entries.push((path, content));
    }
    Ok(entries)
}

/// 레이어 tar 하나를 파일 맵 위에 적용합니다.
///
/// whiteout 항목(`.wh.<name>`)은 하위 레이어가 만든 파일을 제거하고,
/// opaque whiteout(`.wh..wh..opq`)은 해당 디렉토리 아래 전체를 제거합니다.
fn apply_layer(files: &mut FileMap, data: &[u8]) -> Result<(), AnalyzeError> {
    let reader = decompressed(data);
    let mut archive = tar::Archive::new(reader);

    for entry in archive.entries().map_err(extract_error)? {
        let mut entry = entry.map_err(extract_error)?;
        let path = normalize_path(&entry.path().map_err(extract_error)?.to_string_lossy());

        let (dir, name) = match path.rsplit_once('/') {
            Some((dir, name)) => (dir, name),
            None => ("", path.as_str()),
        };

        if name == OPAQUE_WHITEOUT {
            let prefix = format!("{dir}/");
            files.retain(|p, _| !p.starts_with(&prefix));
            continue;
        }
        if let Some(hidden) = name.strip_prefix(WHITEOUT_PREFIX) {
            let target = if dir.is_empty() {
                hidden.to_owned()
            } else {
                format!("{dir}/{hidden}")
            };
            // 파일 또는 디렉토리 전체가 가려질 수 있음
            let dir_prefix = format!("{target}/");
            files.retain(|p, _| p != &target && !p.starts_with(&dir_prefix));
            continue;
        }

        if !entry.header().entry_type().is_file() {
            continue;
        }
        let mut content = Vec::new();
        entry.read_to_end(&mut content).map_err(extract_error)?;
        files.insert(path, content);
    }
    Ok(())
}

/// gzip 여부를 매직 바이트로 판별해 적절한 리더를 반환합니다.
fn decompressed(data: &[u8]) -> Box<dyn Read + '_> {
    if data.starts_with(&GZIP_MAGIC) {
        Box::new(GzDecoder::new(data))
    } else {
        Box::new(data)
    }
}

/// 선행 `/`와 `./`를 제거해 경로를 정규화합니다.
fn normalize_path(raw: &str) -> String {
    let mut path = raw;
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            break;
        }
    }
    path.to_owned()
}

fn extract_error(e: std::io::Error) -> AnalyzeError {
    AnalyzeError::Extract {
        reason: e.to_string(),
    }
}

//! Docker 이미지 소스 — bollard 기반 이미지 내보내기
//!
//! [`ImageSource`] trait은 이미지 이름을 docker-save 형식 아카이브로
//! 해석하는 능력을 추상화합니다. 운영 코드는 [`BollardImageSource`]를,
//! 테스트는 고정 아카이브를 돌려주는 mock 구현을 사용합니다.
//!
//! 레지스트리 인증 정보 해석은 이 코어의 범위 밖입니다 — 로컬 Docker
//! 데몬이 이미 가진 이미지만 내보냅니다.

use std::future::Future;
use std::sync::Arc;

use futures_util::StreamExt;
use tracing::debug;

use hullscan_core::error::AnalyzeError;

/// 이미지 아카이브 소스 trait
///
/// `Send + Sync`이며, 구현은 이미지 참조를 받아 docker-save 형식
/// 아카이브 바이트를 반환합니다.
pub trait ImageSource: Send + Sync {
    /// 이미지를 아카이브로 내보냅니다.
    fn export_image(
        &self,
        image: &str,
    ) -> impl Future<Output = Result<Vec<u8>, AnalyzeError>> + Send;
}

/// bollard 기반 운영 구현
///
/// 로컬 Docker 데몬과 Unix 소켓(또는 플랫폼 기본값)으로 통신합니다.
pub struct BollardImageSource {
    docker: Arc<bollard::Docker>,
}

impl BollardImageSource {
    /// 플랫폼 기본 소켓으로 Docker에 연결합니다.
    pub fn connect_local() -> Result<Self, AnalyzeError> {
        let docker = bollard::Docker::connect_with_local_defaults().map_err(|e| {
            AnalyzeError::DockerConnection(format!("failed to connect to docker: {e}"))
        })?;
        Ok(Self {
            docker: Arc::new(docker),
        })
    }

    /// 지정된 소켓 경로로 Docker에 연결합니다.
    pub fn connect_with_socket(socket_path: &str) -> Result<Self, AnalyzeError> {
        let docker =
            bollard::Docker::connect_with_socket(socket_path, 120, bollard::API_DEFAULT_VERSION)
                .map_err(|e| {
                    AnalyzeError::DockerConnection(format!(
                        "failed to connect to docker at {socket_path}: {e}"
                    ))
                })?;
        Ok(Self {
            docker: Arc::new(docker),
        })
    }
}

impl ImageSource for BollardImageSource {
    async fn export_image(&self, image: &str) -> Result<Vec<u8>, AnalyzeError> {
        let mut stream = Box::pin(self.docker.export_image(image));
        let mut data = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AnalyzeError::ImageExport {
                image: image.to_owned(),
                reason: e.to_string(),
            })?;
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(AnalyzeError::ImageExport {
                image: image.to_owned(),
                reason: "export stream was empty".to_owned(),
            });
        }

        debug!(image = %image, bytes = data.len(), "image exported");
        Ok(data)
    }
}

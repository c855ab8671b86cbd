//! Transport to the face registration/recognition backend.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;

use facechat_core::config::FaceClientConfig;
use facechat_core::types::{
    DeleteNameRequest, FaceBackendResponse, RecognizeRequest, RegisterRequest,
};

use crate::error::FaceError;

/// Calls to the face backend.
///
/// Each method issues exactly one request. A well-formed response is
/// returned as-is whatever its `status`; only transport faults, non-2xx
/// codes and unparseable bodies are errors.
pub trait FaceBackend: Send + Sync {
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<FaceBackendResponse, FaceError>> + Send;

    fn recognize(
        &self,
        request: &RecognizeRequest,
    ) -> impl Future<Output = Result<FaceBackendResponse, FaceError>> + Send;

    fn list_registered(
        &self,
    ) -> impl Future<Output = Result<FaceBackendResponse, FaceError>> + Send;

    fn delete_name(
        &self,
        request: &DeleteNameRequest,
    ) -> impl Future<Output = Result<FaceBackendResponse, FaceError>> + Send;

    fn clear_registry(&self)
        -> impl Future<Output = Result<FaceBackendResponse, FaceError>> + Send;
}

/// HTTP client for the face backend.
#[derive(Debug, Clone)]
pub struct HttpFaceBackend {
    client: Client,
    base_url: String,
}

impl HttpFaceBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FaceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &FaceClientConfig) -> Result<Self, FaceError> {
        Self::new(&config.backend_url, config.request_timeout())
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn post<T: Serialize + Sync>(
        &self,
        route: &str,
        body: &T,
    ) -> Result<FaceBackendResponse, FaceError> {
        let response = self.client.post(self.url(route)).json(body).send().await?;
        decode(response).await
    }
}

async fn decode(response: Response) -> Result<FaceBackendResponse, FaceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FaceError::BackendStatus(status.as_u16()));
    }
    response
        .json::<FaceBackendResponse>()
        .await
        .map_err(|e| FaceError::MalformedResponse(e.to_string()))
}

impl FaceBackend for HttpFaceBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<FaceBackendResponse, FaceError> {
        self.post("/register", request).await
    }

    async fn recognize(
        &self,
        request: &RecognizeRequest,
    ) -> Result<FaceBackendResponse, FaceError> {
        self.post("/recognize", request).await
    }

    async fn list_registered(&self) -> Result<FaceBackendResponse, FaceError> {
        let response = self.client.get(self.url("/list-db")).send().await?;
        decode(response).await
    }

    async fn delete_name(
        &self,
        request: &DeleteNameRequest,
    ) -> Result<FaceBackendResponse, FaceError> {
        self.post("/delete-name", request).await
    }

    async fn clear_registry(&self) -> Result<FaceBackendResponse, FaceError> {
        let response = self.client.post(self.url("/clear-db")).send().await?;
        decode(response).await
    }
}

// ==========================================
// Perseo nómina - Depósito en Google Cloud Storage
// ==========================================
// Subida simple (uploadType=media) con token OAuth de portador
// La URL pública sigue el formato storage.googleapis.com/<depósito>/<ruta>
// ==========================================

use crate::storage::error::{StorageResult, StorageUploadError};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, instrument};

pub const GCS_UPLOAD_BASE_URL: &str = "https://storage.googleapis.com/upload/storage/v1/b";
pub const GCS_PUBLIC_BASE_URL: &str = "https://storage.googleapis.com";

const CONNECT_TIMEOUT_SECS: u64 = 15;
const UPLOAD_TIMEOUT_SECS: u64 = 60;

/// Destino para los archivos exportados
pub trait ObjectStorage {
    /// Subir `data` a `bucket/path`
    ///
    /// # Retorna
    /// - URL pública del objeto
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        data: &[u8],
    ) -> StorageResult<String>;
}

/// URL pública de un objeto
pub fn public_url(bucket: &str, path: &str) -> String {
    format!("{GCS_PUBLIC_BASE_URL}/{bucket}/{path}")
}

/// Traducir una respuesta fallida a un error del depósito
pub fn classify_failure(status: StatusCode, bucket: &str, path: &str, body: &str) -> StorageUploadError {
    match status {
        StatusCode::NOT_FOUND => StorageUploadError::BucketNotFound(bucket.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageUploadError::NotAllowed {
            path: path.to_string(),
            message: format!("{status} {body}").trim().to_string(),
        },
        _ => StorageUploadError::Upload {
            path: path.to_string(),
            message: format!("{status} {body}").trim().to_string(),
        },
    }
}

// ==========================================
// GcsStorage
// ==========================================
pub struct GcsStorage {
    client: Client,
    token: Option<String>,
    upload_base_url: String,
}

impl GcsStorage {
    /// Crear el cliente con el token de acceso (si lo hay)
    pub fn new(token: Option<String>) -> StorageResult<Self> {
        Self::with_upload_base_url(token, GCS_UPLOAD_BASE_URL)
    }

    /// Igual que `new`, contra otro punto de subida compatible
    pub fn with_upload_base_url(token: Option<String>, upload_base_url: &str) -> StorageResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageUploadError::Upload {
                path: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            token,
            upload_base_url: upload_base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ObjectStorage for GcsStorage {
    #[instrument(skip(self, data), fields(size = data.len()))]
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        data: &[u8],
    ) -> StorageResult<String> {
        if data.is_empty() {
            return Err(StorageUploadError::EmptyPayload);
        }

        let url = format!("{}/{}/o", self.upload_base_url, bucket);
        let mut request = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", path)])
            .header(CONTENT_TYPE, content_type)
            .body(data.to_vec());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| StorageUploadError::Upload {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_failure(status, bucket, path, &body));
        }

        debug!(bucket, path, "objeto subido");
        Ok(public_url(bucket, path))
    }
}

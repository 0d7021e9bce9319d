// ==========================================
// Perseo nómina - Errores del depósito de archivos
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageUploadError {
    #[error("El archivo a subir está vacío.")]
    EmptyPayload,

    #[error("No existe el depósito {0}.")]
    BucketNotFound(String),

    #[error("No se permite subir {path}: {message}")]
    NotAllowed { path: String, message: String },

    #[error("Falló la subida de {path}: {message}")]
    Upload { path: String, message: String },
}

pub type StorageResult<T> = Result<T, StorageUploadError>;

// ==========================================
// Perseo nómina - Depósito de archivos
// ==========================================

pub mod error;
pub mod gcs;

pub use error::{StorageResult, StorageUploadError};
pub use gcs::{public_url, GcsStorage, ObjectStorage};

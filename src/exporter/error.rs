// ==========================================
// Perseo nómina - Errores de exportación
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No hay {0} para exportar.")]
    EmptyResult(String),

    #[error("Error de archivo: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error al escribir el XLSX: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ExportResult<T> = Result<T, ExportError>;

// ==========================================
// Perseo nómina - Errores de validación
// ==========================================

use thiserror::Error;

/// Un valor no cumple su formato después de normalizarse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("RFC inválido: {0}")]
    InvalidRfc(String),

    #[error("CURP inválida: {0}")]
    InvalidCurp(String),

    #[error("E-mail inválido: {0}")]
    InvalidEmail(String),

    #[error("Quincena inválida: {0}")]
    InvalidQuincena(String),

    #[error("Concepto inválido: {0}")]
    InvalidConcepto(String),

    #[error("Plaza inválida: {0}")]
    InvalidPlaza(String),
}

/// Alias de Result para la limpieza de textos
pub type ValidationResult<T> = Result<T, ValidationError>;

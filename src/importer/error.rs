// ==========================================
// Perseo nómina - Errores de la alimentación
// ==========================================
// Herramienta: thiserror
// ==========================================

use crate::repository::RepositoryError;
use crate::sanitize::ValidationError;
use thiserror::Error;

/// Errores de la alimentación de percepciones-deducciones
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Precondiciones =====
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Variable de entorno {0} no definida.")]
    MissingEnvVar(String),

    #[error("{0} no se encontró.")]
    FileNotFound(String),

    #[error("{0} no es un archivo.")]
    NotAFile(String),

    // ===== Hoja de cálculo =====
    #[error("No se pudo abrir la hoja de cálculo {path}: {message}")]
    SpreadsheetOpen { path: String, message: String },

    // ===== Renglones =====
    #[error("Renglón {row} mal formado: {message}")]
    MalformedRow { row: usize, message: String },

    // ===== Almacén =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ImportError {
    /// Errores que se reportan como mensaje y terminan sin tocar el almacén
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ImportError::Validation(_)
                | ImportError::MissingEnvVar(_)
                | ImportError::FileNotFound(_)
                | ImportError::NotAFile(_)
        )
    }

    /// Línea para el operador cuando falla una precondición
    pub fn operator_message(&self) -> String {
        match self {
            ImportError::Validation(ValidationError::InvalidQuincena(_)) => {
                "Quincena inválida".to_string()
            }
            ImportError::FileNotFound(_) | ImportError::NotAFile(_) => format!("AVISO: {self}"),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_messages() {
        let err = ImportError::from(ValidationError::InvalidQuincena("12345".to_string()));
        assert!(err.is_precondition());
        assert_eq!(err.operator_message(), "Quincena inválida");

        let err = ImportError::MissingEnvVar("EXPLOTACION_BASE_DIR".to_string());
        assert_eq!(
            err.operator_message(),
            "Variable de entorno EXPLOTACION_BASE_DIR no definida."
        );

        let err = ImportError::NotAFile("/srv/202501/NominaFmt2.XLS".to_string());
        assert_eq!(
            err.operator_message(),
            "AVISO: /srv/202501/NominaFmt2.XLS no es un archivo."
        );

        let err = ImportError::MalformedRow {
            row: 3,
            message: "RFC vacío".to_string(),
        };
        assert!(!err.is_precondition());
    }
}

/// Alias de Result para la alimentación
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// Perseo nómina - Errores de la capa de repositorio
// ==========================================
// Herramienta: thiserror
// ==========================================

use thiserror::Error;

/// Errores de acceso a datos
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Restricciones =====
    /// Clave natural repetida (alimentaciones concurrentes o datos inconsistentes)
    #[error("Clave duplicada: {0}")]
    DuplicateKey(String),

    #[error("Llave foránea violada: {0}")]
    ForeignKeyViolation(String),

    // ===== Base de datos =====
    #[error("Registro no encontrado: {entity} con clave={key}")]
    NotFound { entity: String, key: String },

    #[error("No se pudo obtener el candado de la base de datos: {0}")]
    LockError(String),

    #[error("Falló la transacción: {0}")]
    DatabaseTransactionError(String),

    #[error("Falló la consulta: {0}")]
    DatabaseQueryError(String),

    // ===== Datos =====
    #[error("Falló la serialización: {0}")]
    SerializationError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::DuplicateKey(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Desconocida".to_string(),
                key: "Desconocida".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// Alias de Result para el repositorio
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_failure_maps_to_duplicate_key() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: RepositoryError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::DuplicateKey(_)));
    }
}

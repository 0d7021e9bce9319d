// ==========================================
// Perseo nómina - Sesión SQLite de un lote
// ==========================================
// Una sesión = una transacción. commit() la vuelve durable;
// si la sesión se suelta sin commit, SQLite la descarta completa
// ==========================================

use crate::domain::{EntityKind, EntityStub, IngestionBatch, NewPercepcionDeduccion};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::CatalogStore;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::debug;

// ==========================================
// SqliteSession
// ==========================================
pub struct SqliteSession<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> SqliteSession<'conn> {
    /// Iniciar la transacción del lote
    ///
    /// Usa unchecked_transaction para poder trabajar sobre una conexión
    /// compartida detrás de un Mutex
    pub fn begin(conn: &'conn Connection) -> RepositoryResult<Self> {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(Self { tx })
    }

    /// Confirmar todo lo agregado en la sesión
    ///
    /// Una clave única repetida se reporta como DuplicateKey
    pub fn commit(self) -> RepositoryResult<()> {
        self.tx.commit().map_err(RepositoryError::from)
    }

    /// Descartar todo lo agregado en la sesión
    pub fn rollback(self) -> RepositoryResult<()> {
        self.tx
            .rollback()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))
    }

    fn insert_clave_descripcion(
        &self,
        kind: EntityKind,
        clave: &str,
        descripcion: &str,
    ) -> RepositoryResult<i64> {
        let now = Utc::now().to_rfc3339();
        let sql = format!(
            "INSERT INTO {} (clave, descripcion, estatus, creado, modificado)
             VALUES (?1, ?2, 'A', ?3, ?3)",
            kind.table()
        );
        self.tx.execute(&sql, params![clave, descripcion, now])?;
        Ok(self.tx.last_insert_rowid())
    }
}

impl CatalogStore for SqliteSession<'_> {
    fn find_id_by_key(&self, kind: EntityKind, key: &str) -> RepositoryResult<Option<i64>> {
        let sql = format!(
            "SELECT id FROM {} WHERE {} = ?1 LIMIT 1",
            kind.table(),
            kind.key_column()
        );
        let id = self
            .tx
            .query_row(&sql, params![key], |row| row.get::<_, i64>(0))
            .optional()?;
        Ok(id)
    }

    fn insert_stub(&mut self, stub: &EntityStub) -> RepositoryResult<i64> {
        let id = match stub {
            EntityStub::Concepto { clave, descripcion }
            | EntityStub::CentroTrabajo { clave, descripcion }
            | EntityStub::Plaza { clave, descripcion } => {
                self.insert_clave_descripcion(stub.kind(), clave, descripcion)?
            }
            EntityStub::Persona {
                rfc,
                nombres,
                apellido_primero,
                apellido_segundo,
            } => {
                let now = Utc::now().to_rfc3339();
                self.tx.execute(
                    r#"
                    INSERT INTO personas (
                        rfc, nombres, apellido_primero, apellido_segundo,
                        estatus, creado, modificado
                    ) VALUES (?1, ?2, ?3, ?4, 'A', ?5, ?5)
                    "#,
                    params![rfc, nombres, apellido_primero, apellido_segundo, now],
                )?;
                self.tx.last_insert_rowid()
            }
        };
        debug!(kind = %stub.kind(), key = stub.key(), id, "registro mínimo agregado");
        Ok(id)
    }

    fn insert_percepcion_deduccion(
        &mut self,
        fact: &NewPercepcionDeduccion,
    ) -> RepositoryResult<i64> {
        self.tx.execute(
            r#"
            INSERT INTO percepciones_deducciones (
                centro_trabajo_id, concepto_id, persona_id, plaza_id,
                quincena, importe, estatus, creado
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'A', ?7)
            "#,
            params![
                fact.centro_trabajo_id,
                fact.concepto_id,
                fact.persona_id,
                fact.plaza_id,
                fact.quincena,
                fact.importe,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.tx.last_insert_rowid())
    }

    fn insert_ingestion_batch(&mut self, batch: &IngestionBatch) -> RepositoryResult<()> {
        let new_conceptos_json = serde_json::to_string(&batch.new_conceptos)?;
        self.tx.execute(
            r#"
            INSERT INTO ingestion_batches (
                batch_id, quincena, file_path, rows_read, rows_skipped,
                facts_created, new_conceptos_json, started_at, finished_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                batch.batch_id,
                batch.quincena,
                batch.file_path,
                batch.rows_read as i64,
                batch.rows_skipped as i64,
                batch.facts_created as i64,
                new_conceptos_json,
                batch.started_at.to_rfc3339(),
                batch.finished_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

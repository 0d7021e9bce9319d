// ==========================================
// Perseo nómina - Repositorio de catálogos
// ==========================================
// Consultas de solo lectura para la capa web y la exportación,
// más el alta directa de conceptos
// ==========================================

use crate::domain::{
    CentroTrabajo, Concepto, Estatus, IngestionBatch, PercepcionDeduccion, Persona, Plaza,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// Interpretar una fecha RFC 3339 guardada en la base de datos
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn map_concepto(row: &Row<'_>) -> rusqlite::Result<Concepto> {
    Ok(Concepto {
        id: row.get(0)?,
        clave: row.get(1)?,
        descripcion: row.get(2)?,
        estatus: Estatus::from_db_str(&row.get::<_, String>(3)?),
        creado: parse_timestamp(&row.get::<_, String>(4)?),
        modificado: parse_timestamp(&row.get::<_, String>(5)?),
    })
}

fn map_persona(row: &Row<'_>) -> rusqlite::Result<Persona> {
    Ok(Persona {
        id: row.get(0)?,
        rfc: row.get(1)?,
        nombres: row.get(2)?,
        apellido_primero: row.get(3)?,
        apellido_segundo: row.get(4)?,
        curp: row.get(5)?,
        num_empleado: row.get(6)?,
        estatus: Estatus::from_db_str(&row.get::<_, String>(7)?),
        creado: parse_timestamp(&row.get::<_, String>(8)?),
        modificado: parse_timestamp(&row.get::<_, String>(9)?),
    })
}

fn map_percepcion_deduccion(row: &Row<'_>) -> rusqlite::Result<PercepcionDeduccion> {
    Ok(PercepcionDeduccion {
        id: row.get(0)?,
        centro_trabajo_id: row.get(1)?,
        concepto_id: row.get(2)?,
        persona_id: row.get(3)?,
        plaza_id: row.get(4)?,
        quincena: row.get(5)?,
        importe: row.get(6)?,
        creado: parse_timestamp(&row.get::<_, String>(7)?),
    })
}

// ==========================================
// CatalogRepository
// ==========================================
pub struct CatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepository {
    /// Crear el repositorio sobre una conexión compartida
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Dar de alta un concepto con su descripción
    pub fn create_concepto(
        &self,
        clave: &str,
        descripcion: &str,
        estatus: Estatus,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO conceptos (clave, descripcion, estatus, creado, modificado)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
            params![clave, descripcion, estatus.to_db_str(), now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Conceptos con el estatus dado, ordenados por clave
    pub fn list_conceptos(&self, estatus: Estatus) -> RepositoryResult<Vec<Concepto>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, clave, descripcion, estatus, creado, modificado
            FROM conceptos
            WHERE estatus = ?1
            ORDER BY clave ASC
            "#,
        )?;
        let conceptos = stmt
            .query_map(params![estatus.to_db_str()], map_concepto)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(conceptos)
    }

    pub fn find_concepto_by_clave(&self, clave: &str) -> RepositoryResult<Option<Concepto>> {
        let conn = self.get_conn()?;
        let concepto = conn
            .query_row(
                r#"
                SELECT id, clave, descripcion, estatus, creado, modificado
                FROM conceptos WHERE clave = ?1
                "#,
                params![clave],
                map_concepto,
            )
            .optional()?;
        Ok(concepto)
    }

    pub fn find_centro_trabajo_by_clave(
        &self,
        clave: &str,
    ) -> RepositoryResult<Option<CentroTrabajo>> {
        let conn = self.get_conn()?;
        let centro_trabajo = conn
            .query_row(
                r#"
                SELECT id, clave, descripcion, estatus, creado, modificado
                FROM centros_trabajos WHERE clave = ?1
                "#,
                params![clave],
                |row| {
                    Ok(CentroTrabajo {
                        id: row.get(0)?,
                        clave: row.get(1)?,
                        descripcion: row.get(2)?,
                        estatus: Estatus::from_db_str(&row.get::<_, String>(3)?),
                        creado: parse_timestamp(&row.get::<_, String>(4)?),
                        modificado: parse_timestamp(&row.get::<_, String>(5)?),
                    })
                },
            )
            .optional()?;
        Ok(centro_trabajo)
    }

    pub fn find_plaza_by_clave(&self, clave: &str) -> RepositoryResult<Option<Plaza>> {
        let conn = self.get_conn()?;
        let plaza = conn
            .query_row(
                r#"
                SELECT id, clave, descripcion, estatus, creado, modificado
                FROM plazas WHERE clave = ?1
                "#,
                params![clave],
                |row| {
                    Ok(Plaza {
                        id: row.get(0)?,
                        clave: row.get(1)?,
                        descripcion: row.get(2)?,
                        estatus: Estatus::from_db_str(&row.get::<_, String>(3)?),
                        creado: parse_timestamp(&row.get::<_, String>(4)?),
                        modificado: parse_timestamp(&row.get::<_, String>(5)?),
                    })
                },
            )
            .optional()?;
        Ok(plaza)
    }

    pub fn find_persona_by_rfc(&self, rfc: &str) -> RepositoryResult<Option<Persona>> {
        let conn = self.get_conn()?;
        let persona = conn
            .query_row(
                r#"
                SELECT id, rfc, nombres, apellido_primero, apellido_segundo,
                       curp, num_empleado, estatus, creado, modificado
                FROM personas WHERE rfc = ?1
                "#,
                params![rfc],
                map_persona,
            )
            .optional()?;
        Ok(persona)
    }

    /// Número de percepciones-deducciones de una quincena
    pub fn count_percepciones_deducciones(&self, quincena: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let total = conn.query_row(
            "SELECT COUNT(*) FROM percepciones_deducciones WHERE quincena = ?1",
            params![quincena],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Percepciones-deducciones de una quincena en orden de inserción
    pub fn list_percepciones_deducciones(
        &self,
        quincena: &str,
    ) -> RepositoryResult<Vec<PercepcionDeduccion>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, centro_trabajo_id, concepto_id, persona_id, plaza_id,
                   quincena, importe, creado
            FROM percepciones_deducciones
            WHERE quincena = ?1
            ORDER BY id ASC
            "#,
        )?;
        let registros = stmt
            .query_map(params![quincena], map_percepcion_deduccion)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(registros)
    }

    /// Bitácora de alimentaciones de una quincena, la más reciente primero
    pub fn list_batches_by_quincena(&self, quincena: &str) -> RepositoryResult<Vec<IngestionBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, quincena, file_path, rows_read, rows_skipped,
                   facts_created, new_conceptos_json, started_at, finished_at
            FROM ingestion_batches
            WHERE quincena = ?1
            ORDER BY started_at DESC
            "#,
        )?;
        let raw = stmt
            .query_map(params![quincena], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut batches = Vec::with_capacity(raw.len());
        for (batch_id, quincena, file_path, read, skipped, created, json, started, finished) in raw
        {
            batches.push(IngestionBatch {
                batch_id,
                quincena,
                file_path,
                rows_read: read.max(0) as usize,
                rows_skipped: skipped.max(0) as usize,
                facts_created: created.max(0) as usize,
                new_conceptos: serde_json::from_str(&json)?,
                started_at: parse_timestamp(&started),
                finished_at: parse_timestamp(&finished),
            });
        }
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn repo() -> CatalogRepository {
        CatalogRepository::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    #[test]
    fn test_list_conceptos_filters_and_orders() {
        let repo = repo();
        repo.create_concepto("P07", "PRIMA VACACIONAL", Estatus::Activo).unwrap();
        repo.create_concepto("D01", "ISR", Estatus::Activo).unwrap();
        repo.create_concepto("P99", "OBSOLETO", Estatus::Inactivo).unwrap();

        let activos = repo.list_conceptos(Estatus::Activo).unwrap();
        let claves: Vec<&str> = activos.iter().map(|c| c.clave.as_str()).collect();
        assert_eq!(claves, vec!["D01", "P07"]);

        let inactivos = repo.list_conceptos(Estatus::Inactivo).unwrap();
        assert_eq!(inactivos.len(), 1);
        assert_eq!(inactivos[0].clave, "P99");
    }

    #[test]
    fn test_find_concepto_by_clave() {
        let repo = repo();
        repo.create_concepto("P01", "SUELDO", Estatus::Activo).unwrap();
        let concepto = repo.find_concepto_by_clave("P01").unwrap().unwrap();
        assert_eq!(concepto.descripcion, "SUELDO");
        assert!(repo.find_concepto_by_clave("P02").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_concepto_rejected() {
        let repo = repo();
        repo.create_concepto("P01", "SUELDO", Estatus::Activo).unwrap();
        let err = repo
            .create_concepto("P01", "OTRO", Estatus::Activo)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey(_)));
    }
}

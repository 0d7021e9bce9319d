// ==========================================
// Perseo nómina - Conexión SQLite y esquema
// ==========================================
// Objetivo:
// - Todas las conexiones con los mismos PRAGMA (llaves foráneas, busy_timeout)
// - Esquema creado de forma idempotente al abrir la base de datos
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// busy_timeout por defecto (milisegundos)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Versión del esquema que espera este código
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS conceptos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    clave TEXT NOT NULL,
    descripcion TEXT NOT NULL,
    estatus TEXT NOT NULL DEFAULT 'A',
    creado TEXT NOT NULL,
    modificado TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS ux_conceptos_clave ON conceptos (clave);

CREATE TABLE IF NOT EXISTS centros_trabajos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    clave TEXT NOT NULL,
    descripcion TEXT NOT NULL,
    estatus TEXT NOT NULL DEFAULT 'A',
    creado TEXT NOT NULL,
    modificado TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS ux_centros_trabajos_clave ON centros_trabajos (clave);

CREATE TABLE IF NOT EXISTS plazas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    clave TEXT NOT NULL,
    descripcion TEXT NOT NULL,
    estatus TEXT NOT NULL DEFAULT 'A',
    creado TEXT NOT NULL,
    modificado TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS ux_plazas_clave ON plazas (clave);

CREATE TABLE IF NOT EXISTS personas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    rfc TEXT NOT NULL,
    nombres TEXT NOT NULL,
    apellido_primero TEXT NOT NULL,
    apellido_segundo TEXT NOT NULL DEFAULT '',
    curp TEXT NOT NULL DEFAULT '',
    num_empleado INTEGER,
    estatus TEXT NOT NULL DEFAULT 'A',
    creado TEXT NOT NULL,
    modificado TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS ux_personas_rfc ON personas (rfc);

CREATE TABLE IF NOT EXISTS percepciones_deducciones (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    centro_trabajo_id INTEGER NOT NULL REFERENCES centros_trabajos (id),
    concepto_id INTEGER NOT NULL REFERENCES conceptos (id),
    persona_id INTEGER NOT NULL REFERENCES personas (id),
    plaza_id INTEGER NOT NULL REFERENCES plazas (id),
    quincena TEXT NOT NULL,
    importe REAL NOT NULL,
    estatus TEXT NOT NULL DEFAULT 'A',
    creado TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS ix_percepciones_deducciones_quincena
    ON percepciones_deducciones (quincena);

CREATE TABLE IF NOT EXISTS ingestion_batches (
    batch_id TEXT PRIMARY KEY,
    quincena TEXT NOT NULL,
    file_path TEXT NOT NULL,
    rows_read INTEGER NOT NULL,
    rows_skipped INTEGER NOT NULL,
    facts_created INTEGER NOT NULL,
    new_conceptos_json TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL
);
"#;

/// Configurar los PRAGMA comunes de la conexión
///
/// foreign_keys y busy_timeout se configuran por conexión
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Crear las tablas que falten y registrar la versión del esquema
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Abrir la base de datos, aplicar PRAGMA y asegurar el esquema
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Base de datos en memoria con el esquema completo (pruebas y simulaciones)
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Leer schema_version (None si la tabla no existe)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

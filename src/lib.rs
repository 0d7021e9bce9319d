// ==========================================
// Perseo nómina - Biblioteca principal
// ==========================================
// Alcance: alimentación de percepciones-deducciones desde la
// explotación quincenal (NominaFmt2.XLS) y exportación de catálogos
// Tecnología: Rust + SQLite
// ==========================================

// Inicializar la internacionalización
rust_i18n::i18n!("locales", fallback = "es-MX");

// ==========================================
// Módulos
// ==========================================

// Capa de dominio - entidades y tipos
pub mod domain;

// Limpieza y validación de textos
pub mod sanitize;

// Capa de repositorio - acceso a datos
pub mod repository;

// Capa de importación - alimentación desde hojas de cálculo
pub mod importer;

// Capa de exportación - catálogos a XLSX
pub mod exporter;

// Depósito de archivos en la nube
pub mod storage;

// Configuración desde variables de entorno
pub mod config;

// Infraestructura de base de datos (conexión, PRAGMA, esquema)
pub mod db;

// Bitácora
pub mod logging;

// Internacionalización
pub mod i18n;

// ==========================================
// Reexportaciones
// ==========================================

pub use config::Settings;
pub use domain::{
    CentroTrabajo, Concepto, EntityKind, Estatus, PercepcionDeduccion, Persona, Plaza, Quincena,
};
pub use exporter::{ConceptosExporter, ExportError, ExportOutcome};
pub use importer::{
    ImportError, ImportProgress, IngestionReport, PercepcionesDeduccionesImporter,
};
pub use repository::{CatalogRepository, RepositoryError, SqliteSession};

// ==========================================
// Constantes
// ==========================================

// Versión del sistema
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Nombre del sistema
pub const APP_NAME: &str = "Perseo nómina";

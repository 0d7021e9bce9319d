// ==========================================
// Perseo nómina - Exportación de catálogos
// ==========================================

pub mod conceptos;
pub mod error;

pub use conceptos::{ConceptosExporter, ExportOutcome, XLSX_CONTENT_TYPE};
pub use error::{ExportError, ExportResult};

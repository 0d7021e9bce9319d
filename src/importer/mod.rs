// ==========================================
// Perseo nómina - Alimentación de percepciones-deducciones
// ==========================================
// Entrada: {EXPLOTACION_BASE_DIR}/{quincena}/NominaFmt2.XLS
// Salida: percepciones-deducciones y catálogos mínimos en una sola transacción
// ==========================================

pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod resolver;
pub mod row_transformer;
pub mod spreadsheet;

pub use error::{ImportError, ImportResult};
pub use orchestrator::{
    ingest_rows, preparar_alimentacion, source_path, AlimentacionPreparada, BatchTotals,
    IngestionReport, PercepcionesDeduccionesImporter, NOMINAS_FILENAME_XLS,
};
pub use progress::{CollectingProgress, ImportProgress, SilentProgress, StdoutProgress};
pub use resolver::{EntityResolver, Resolved};
pub use row_transformer::{derive_amount, split_nombre_completo, NameParts, RowTransformer};
pub use spreadsheet::{CellValue, RowCells, SpreadsheetReader};

// ==========================================
// Perseo nómina - Alimentación de percepciones-deducciones
// ==========================================
// Flujo: validar quincena → validar archivo → abrir hoja →
//        transformar renglones → bitácora → un solo commit
// Cualquier error no previsto suelta la sesión sin commit
// (SQLite descarta la transacción completa)
// ==========================================

use crate::config::{settings_keys, Settings};
use crate::domain::{EntityKind, IngestionBatch, Quincena};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::progress::ImportProgress;
use crate::importer::row_transformer::RowTransformer;
use crate::importer::spreadsheet::{RowCells, SpreadsheetReader};
use crate::repository::{CatalogStore, RepositoryError, SqliteSession};
use chrono::Utc;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Nombre fijo del archivo de explotación dentro de cada quincena
pub const NOMINAS_FILENAME_XLS: &str = "NominaFmt2.XLS";

// ==========================================
// IngestionReport - resultado de un lote
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionReport {
    pub batch_id: String,
    pub quincena: String,
    pub file_path: PathBuf,
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub facts_created: usize,
    /// Claves de conceptos que no existían, sin repetir, en orden de aparición
    pub new_conceptos: Vec<String>,
    /// Un mensaje por renglón omitido
    pub diagnostics: Vec<String>,
}

/// Totales de los renglones procesados
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchTotals {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub facts_created: usize,
    pub new_conceptos: Vec<String>,
    pub diagnostics: Vec<String>,
}

/// Transformar los renglones de datos de un lote
///
/// Los renglones mal formados se omiten con un diagnóstico;
/// cualquier otro error detiene el lote
///
/// # Parámetros
/// - store: almacén con la transacción del lote
/// - quincena: periodo ya validado
/// - rows: pares (número de renglón, celdas)
/// - progress: salida para el operador
pub fn ingest_rows<S, I, R>(
    store: &mut S,
    quincena: &Quincena,
    rows: I,
    progress: &dyn ImportProgress,
) -> ImportResult<BatchTotals>
where
    S: CatalogStore + ?Sized,
    I: IntoIterator<Item = (usize, R)>,
    R: RowCells,
{
    let mut transformer = RowTransformer::new(quincena.clone(), progress);
    let mut totals = BatchTotals::default();

    for (row_idx, row) in rows {
        totals.rows_read += 1;
        match transformer.transform(store, row_idx, &row) {
            Ok(_) => {}
            Err(ImportError::MalformedRow { row, message }) => {
                let diagnostic = format!("  Renglón {row} omitido: {message}");
                warn!(row, %message, "renglón mal formado omitido");
                progress.line(&diagnostic);
                totals.rows_skipped += 1;
                totals.diagnostics.push(diagnostic);
            }
            Err(e) => return Err(e),
        }
    }

    totals.facts_created = transformer.facts_created();
    totals.new_conceptos = transformer.resolver().created_keys(EntityKind::Concepto);
    Ok(totals)
}

// ==========================================
// Precondiciones
// ==========================================
// Se validan antes de abrir la base de datos

/// Quincena y archivo de explotación ya validados
#[derive(Debug, Clone, PartialEq)]
pub struct AlimentacionPreparada {
    pub quincena: Quincena,
    pub ruta: PathBuf,
}

/// Ruta esperada: {EXPLOTACION_BASE_DIR}/{quincena}/NominaFmt2.XLS
///
/// # Errores
/// - MissingEnvVar, FileNotFound o NotAFile
pub fn source_path(base_dir: Option<&Path>, quincena: &Quincena) -> ImportResult<PathBuf> {
    let base_dir = base_dir
        .ok_or_else(|| ImportError::MissingEnvVar(settings_keys::EXPLOTACION_BASE_DIR.to_string()))?;

    let ruta = base_dir.join(quincena.as_str()).join(NOMINAS_FILENAME_XLS);
    if !ruta.exists() {
        return Err(ImportError::FileNotFound(ruta.display().to_string()));
    }
    if !ruta.is_file() {
        return Err(ImportError::NotAFile(ruta.display().to_string()));
    }
    Ok(ruta)
}

/// Validar la quincena y luego el archivo, en ese orden
///
/// Si algo falla se avisa por `progress` y se regresa el error;
/// no se abre la base de datos ni la hoja
pub fn preparar_alimentacion(
    explotacion_base_dir: Option<&Path>,
    quincena: &str,
    progress: &dyn ImportProgress,
) -> ImportResult<AlimentacionPreparada> {
    let checked = Quincena::parse(quincena)
        .map_err(ImportError::from)
        .and_then(|quincena| {
            let ruta = source_path(explotacion_base_dir, &quincena)?;
            Ok(AlimentacionPreparada { quincena, ruta })
        });

    if let Err(e) = &checked {
        progress.line(&e.operator_message());
        warn!(error = %e, "alimentación cancelada");
    }
    checked
}

// ==========================================
// PercepcionesDeduccionesImporter
// ==========================================
pub struct PercepcionesDeduccionesImporter {
    conn: Arc<Mutex<Connection>>,
    explotacion_base_dir: Option<PathBuf>,
}

impl PercepcionesDeduccionesImporter {
    /// Crear el importador sobre una conexión compartida
    pub fn new(conn: Arc<Mutex<Connection>>, settings: &Settings) -> Self {
        Self {
            conn,
            explotacion_base_dir: settings.explotacion_base_dir.clone(),
        }
    }

    pub fn source_path(&self, quincena: &Quincena) -> ImportResult<PathBuf> {
        source_path(self.explotacion_base_dir.as_deref(), quincena)
    }

    /// Alimentar las percepciones-deducciones de una quincena
    ///
    /// # Parámetros
    /// - quincena: seis dígitos, por ejemplo "202501"
    /// - progress: salida para el operador
    ///
    /// # Retorna
    /// - IngestionReport del lote confirmado
    ///
    /// # Errores
    /// - Precondiciones (quincena, variable de entorno, archivo): se avisa por
    ///   `progress` y no se toca la base de datos
    /// - SpreadsheetOpen: el archivo no se pudo leer; no se toca la base de datos
    /// - Repository: el lote se descarta completo
    #[instrument(skip(self, progress))]
    pub fn alimentar(
        &self,
        quincena: &str,
        progress: &dyn ImportProgress,
    ) -> ImportResult<IngestionReport> {
        let preparada =
            preparar_alimentacion(self.explotacion_base_dir.as_deref(), quincena, progress)?;
        self.alimentar_preparada(&preparada, progress)
    }

    /// Alimentar una quincena cuyas precondiciones ya pasaron
    #[instrument(skip_all, fields(quincena = %preparada.quincena.as_str()))]
    pub fn alimentar_preparada(
        &self,
        preparada: &AlimentacionPreparada,
        progress: &dyn ImportProgress,
    ) -> ImportResult<IngestionReport> {
        let AlimentacionPreparada { quincena, ruta } = preparada;

        progress.line("Alimentando percepciones-deducciones...");
        let started_at = Utc::now();
        let reader = SpreadsheetReader::open(ruta)?;
        info!(path = %ruta.display(), rows = reader.row_count(), "hoja abierta");

        let report = self.run_batch(quincena, ruta, &reader, progress, started_at)?;

        if !report.new_conceptos.is_empty() {
            progress.line(&format!(
                "  Conceptos no existentes: {}",
                report.new_conceptos.join(",")
            ));
        }
        progress.line(&format!(
            "Terminado con {} percepciones-deducciones alimentados.",
            report.facts_created
        ));
        info!(
            batch_id = %report.batch_id,
            facts = report.facts_created,
            skipped = report.rows_skipped,
            "alimentación terminada"
        );
        Ok(report)
    }

    fn run_batch(
        &self,
        quincena: &Quincena,
        ruta: &Path,
        reader: &SpreadsheetReader,
        progress: &dyn ImportProgress,
        started_at: chrono::DateTime<Utc>,
    ) -> ImportResult<IngestionReport> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let mut session = SqliteSession::begin(&conn)?;

        let totals = ingest_rows(&mut session, quincena, reader.data_rows(), progress)?;

        let batch = IngestionBatch {
            batch_id: Uuid::new_v4().to_string(),
            quincena: quincena.as_str().to_string(),
            file_path: ruta.display().to_string(),
            rows_read: totals.rows_read,
            rows_skipped: totals.rows_skipped,
            facts_created: totals.facts_created,
            new_conceptos: totals.new_conceptos.clone(),
            started_at,
            finished_at: Utc::now(),
        };
        session.insert_ingestion_batch(&batch)?;
        session.commit()?;

        Ok(IngestionReport {
            batch_id: batch.batch_id,
            quincena: batch.quincena,
            file_path: ruta.to_path_buf(),
            rows_read: totals.rows_read,
            rows_skipped: totals.rows_skipped,
            facts_created: totals.facts_created,
            new_conceptos: totals.new_conceptos,
            diagnostics: totals.diagnostics,
        })
    }
}

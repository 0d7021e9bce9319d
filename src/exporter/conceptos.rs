// ==========================================
// Perseo nómina - Exportación de conceptos a XLSX
// ==========================================
// Conceptos activos ordenados por clave → CLAVE, DESCRIPCION
// Local:    <exports_dir>/conceptos/<año>/<mes>/conceptos_<fecha>.xlsx
// Depósito: conceptos/<año>/<mes>/conceptos_<fecha>.xlsx (opcional)
// ==========================================

use crate::config::Settings;
use crate::domain::{Concepto, Estatus};
use crate::exporter::error::{ExportError, ExportResult};
use crate::repository::CatalogRepository;
use crate::storage::ObjectStorage;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rusqlite::Connection;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{error, info, instrument, warn};

pub const LOCAL_BASE_DIRECTORY: &str = "conceptos";
pub const GCS_BASE_DIRECTORY: &str = "conceptos";
pub const TIMEZONE: Tz = chrono_tz::America::Mexico_City;
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Columnas del archivo
mod cols {
    pub const CLAVE: u16 = 0;
    pub const DESCRIPCION: u16 = 1;
}

/// Resultado de una exportación
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub message: String,
    pub file_name: String,
    pub local_path: PathBuf,
    /// Vacía si no hay depósito o si la subida falló
    pub public_url: String,
}

// ==========================================
// ConceptosExporter
// ==========================================
pub struct ConceptosExporter {
    repo: CatalogRepository,
    exports_dir: PathBuf,
    bucket: Option<String>,
    storage: Option<Box<dyn ObjectStorage>>,
}

impl ConceptosExporter {
    pub fn new(conn: Arc<Mutex<Connection>>, settings: &Settings) -> Self {
        Self {
            repo: CatalogRepository::from_connection(conn),
            exports_dir: settings.exports_dir.clone(),
            bucket: settings.cloud_storage_deposito.clone(),
            storage: None,
        }
    }

    /// Usar un depósito para subir el archivo (solo si hay CLOUD_STORAGE_DEPOSITO)
    pub fn with_storage(mut self, storage: Box<dyn ObjectStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Exportar con la hora actual de la Ciudad de México
    pub fn exportar(&self) -> ExportResult<ExportOutcome> {
        self.exportar_at(Utc::now().with_timezone(&TIMEZONE))
    }

    /// Exportar usando `ahora` para el nombre y las rutas
    ///
    /// # Errores
    /// - ExportError::EmptyResult si no hay conceptos activos (no se escribe nada)
    /// - ExportError::Io / Xlsx al escribir el archivo local
    ///
    /// Una falla del depósito solo se registra como advertencia
    #[instrument(skip(self))]
    pub fn exportar_at(&self, ahora: DateTime<Tz>) -> ExportResult<ExportOutcome> {
        let conceptos = self.repo.list_conceptos(Estatus::Activo)?;
        if conceptos.is_empty() {
            let err = ExportError::EmptyResult("Conceptos".to_string());
            error!("{err}");
            return Err(err);
        }

        let bytes = build_workbook(&conceptos)?;

        let file_name = format!("conceptos_{}.xlsx", ahora.format("%Y-%m-%d_%H%M%S"));
        let year = ahora.format("%Y").to_string();
        let month = ahora.format("%m").to_string();

        let local_dir = self
            .exports_dir
            .join(LOCAL_BASE_DIRECTORY)
            .join(&year)
            .join(&month);
        fs::create_dir_all(&local_dir)?;
        let local_path = local_dir.join(&file_name);
        fs::write(&local_path, &bytes)?;

        let remote_path = format!("{GCS_BASE_DIRECTORY}/{year}/{month}/{file_name}");
        let public_url = self.upload(&remote_path, &bytes);

        let message = format!(
            "Se exportaron {} Conceptos a {}",
            conceptos.len(),
            file_name
        );
        info!("{message}");

        Ok(ExportOutcome {
            message,
            file_name,
            local_path,
            public_url,
        })
    }

    fn upload(&self, remote_path: &str, bytes: &[u8]) -> String {
        let (Some(bucket), Some(storage)) = (&self.bucket, &self.storage) else {
            return String::new();
        };
        match storage.upload(bucket, remote_path, XLSX_CONTENT_TYPE, bytes) {
            Ok(url) => {
                info!("Se subió el archivo XLSX al depósito {url}");
                url
            }
            Err(e) => {
                warn!("Falló al subir el archivo XLSX al depósito: {e}");
                String::new()
            }
        }
    }
}

/// Escribir el libro en memoria
fn build_workbook(conceptos: &[Concepto]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.write_string(0, cols::CLAVE, "CLAVE")?;
    worksheet.write_string(0, cols::DESCRIPCION, "DESCRIPCION")?;
    for (row, concepto) in (1u32..).zip(conceptos) {
        worksheet.write_string(row, cols::CLAVE, &concepto.clave)?;
        worksheet.write_string(row, cols::DESCRIPCION, &concepto.descripcion)?;
    }

    Ok(workbook.save_to_buffer()?)
}

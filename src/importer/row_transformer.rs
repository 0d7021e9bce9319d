// ==========================================
// Perseo nómina - Transformación de renglones
// ==========================================
// Un renglón de NominaFmt2.XLS = una persona en una plaza y centro
// de trabajo, con hasta 36 bloques de 6 columnas (tipo, conc, -, importe, -, -)
// Las posiciones son el formato fijo del sistema que genera el archivo
// ==========================================

use crate::domain::{EntityKind, EntityStub, NewPercepcionDeduccion, Quincena};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::progress::ImportProgress;
use crate::importer::resolver::EntityResolver;
use crate::importer::spreadsheet::{CellValue, RowCells};
use crate::repository::CatalogStore;
use crate::sanitize::safe_string;
use tracing::{debug, info};

// ===== Columnas fijas =====
pub const COL_CENTRO_TRABAJO: usize = 1;
pub const COL_RFC: usize = 2;
pub const COL_NOMBRE_COMPLETO: usize = 3;
pub const COL_PLAZA: usize = 8;

// ===== Bloques repetidos =====
pub const BLOCK_START: usize = 26;
pub const BLOCK_STRIDE: usize = 6;
pub const BLOCK_LAST_START: usize = 236;
pub const BLOCK_OFFSET_CONC: usize = 1;
pub const BLOCK_OFFSET_IMPORTE: usize = 3;

/// Máximo de percepciones-deducciones por renglón
pub const BLOCK_MAX_FACTS: usize = (BLOCK_LAST_START - BLOCK_START) / BLOCK_STRIDE + 1;

/// Cada cuántos registros se avisa el avance
pub const PROGRESS_EVERY: usize = 100;

/// Convertir la celda de importe (centavos) a pesos
///
/// Un número se trunca a entero como lo hace el sistema de origen;
/// un texto debe ser un entero; cualquier otra cosa vale 0.0
pub fn derive_amount(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) if n.is_finite() => n.trunc() / 100.0,
        CellValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(|cents| cents as f64 / 100.0)
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

// ==========================================
// NameParts - nombre completo separado
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub apellido_primero: String,
    pub apellido_segundo: String,
    pub nombres: String,
}

/// Separar "APELLIDO1 APELLIDO2 NOMBRES..." por espacios sencillos
///
/// # Retorna
/// - None si hay menos de dos partes
pub fn split_nombre_completo(nombre_completo: &str) -> Option<NameParts> {
    let partes: Vec<&str> = nombre_completo.trim().split(' ').collect();
    if partes.len() < 2 {
        return None;
    }
    Some(NameParts {
        apellido_primero: partes[0].to_string(),
        apellido_segundo: partes[1].to_string(),
        nombres: partes[2..].join(" "),
    })
}

/// Campos fijos de un renglón ya validados
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFields {
    pub centro_trabajo_clave: String,
    pub rfc: String,
    pub plaza_clave: String,
    pub nombre: NameParts,
}

/// Texto de tipo o conc; una celda que no es texto queda vacía
fn block_text<R: RowCells + ?Sized>(row: &R, col: usize) -> String {
    row.cell(col).as_text().map(safe_string).unwrap_or_default()
}

fn required_key<R: RowCells + ?Sized>(
    row: &R,
    row_idx: usize,
    col: usize,
    campo: &str,
) -> ImportResult<String> {
    let value = row.cell(col).to_key_string().trim().to_string();
    if value.is_empty() {
        return Err(ImportError::MalformedRow {
            row: row_idx,
            message: format!("{campo} vacío (columna {col})"),
        });
    }
    Ok(value)
}

/// Leer y validar las columnas fijas
///
/// # Errores
/// - ImportError::MalformedRow si falta una clave o el nombre tiene menos de dos partes
pub fn extract_fields<R: RowCells + ?Sized>(row: &R, row_idx: usize) -> ImportResult<RowFields> {
    let centro_trabajo_clave = required_key(row, row_idx, COL_CENTRO_TRABAJO, "centro de trabajo")?;
    let rfc = required_key(row, row_idx, COL_RFC, "RFC")?;
    let plaza_clave = required_key(row, row_idx, COL_PLAZA, "plaza")?;

    let nombre_completo = row.cell(COL_NOMBRE_COMPLETO).to_key_string();
    let nombre = split_nombre_completo(&nombre_completo).ok_or_else(|| ImportError::MalformedRow {
        row: row_idx,
        message: format!("nombre incompleto '{nombre_completo}'"),
    })?;

    Ok(RowFields {
        centro_trabajo_clave,
        rfc,
        plaza_clave,
        nombre,
    })
}

// ==========================================
// RowTransformer
// ==========================================
// Convierte renglones en percepciones-deducciones dentro de un lote
pub struct RowTransformer<'p> {
    quincena: Quincena,
    resolver: EntityResolver<'p>,
    progress: &'p dyn ImportProgress,
    facts_created: usize,
}

impl<'p> RowTransformer<'p> {
    pub fn new(quincena: Quincena, progress: &'p dyn ImportProgress) -> Self {
        Self {
            quincena,
            resolver: EntityResolver::new(progress),
            progress,
            facts_created: 0,
        }
    }

    /// Procesar un renglón de datos
    ///
    /// # Parámetros
    /// - store: almacén con la transacción del lote
    /// - row_idx: número de renglón en la hoja (para diagnósticos)
    /// - row: celdas del renglón
    ///
    /// # Retorna
    /// - Número de percepciones-deducciones agregadas (0 a BLOCK_MAX_FACTS)
    ///
    /// # Errores
    /// - ImportError::MalformedRow: el renglón no se tocó; se puede omitir
    /// - ImportError::Repository: el lote debe abortarse
    pub fn transform<S, R>(&mut self, store: &mut S, row_idx: usize, row: &R) -> ImportResult<usize>
    where
        S: CatalogStore + ?Sized,
        R: RowCells + ?Sized,
    {
        // Renglón sin movimientos
        if block_text(row, BLOCK_START).is_empty() {
            debug!(row = row_idx, "renglón sin percepciones-deducciones");
            return Ok(0);
        }

        let fields = extract_fields(row, row_idx)?;
        let mut produced = 0;
        let mut col = BLOCK_START;

        while col <= BLOCK_LAST_START {
            let tipo = block_text(row, col);
            if tipo.is_empty() {
                break;
            }
            let conc = block_text(row, col + BLOCK_OFFSET_CONC);
            let importe = derive_amount(&row.cell(col + BLOCK_OFFSET_IMPORTE));
            let concepto_clave = format!("{tipo}{conc}");

            let concepto = self.resolver.resolve_or_stub(
                store,
                EntityKind::Concepto,
                &concepto_clave,
                || EntityStub::concepto(concepto_clave.as_str()),
            )?;
            let centro_trabajo = self.resolver.resolve_or_stub(
                store,
                EntityKind::CentroTrabajo,
                &fields.centro_trabajo_clave,
                || EntityStub::centro_trabajo(fields.centro_trabajo_clave.as_str()),
            )?;
            let persona = self.resolver.resolve_or_stub(
                store,
                EntityKind::Persona,
                &fields.rfc,
                || EntityStub::Persona {
                    rfc: fields.rfc.clone(),
                    nombres: fields.nombre.nombres.clone(),
                    apellido_primero: fields.nombre.apellido_primero.clone(),
                    apellido_segundo: fields.nombre.apellido_segundo.clone(),
                },
            )?;
            let plaza = self.resolver.resolve_or_stub(
                store,
                EntityKind::Plaza,
                &fields.plaza_clave,
                || EntityStub::plaza(fields.plaza_clave.as_str()),
            )?;

            store.insert_percepcion_deduccion(&NewPercepcionDeduccion {
                centro_trabajo_id: centro_trabajo.id,
                concepto_id: concepto.id,
                persona_id: persona.id,
                plaza_id: plaza.id,
                quincena: self.quincena.as_str().to_string(),
                importe,
            })?;

            produced += 1;
            self.facts_created += 1;
            if self.facts_created % PROGRESS_EVERY == 0 {
                self.progress.line(&format!("  Van {}...", self.facts_created));
                info!(facts = self.facts_created, "avance de la alimentación");
            }

            col += BLOCK_STRIDE;
        }

        Ok(produced)
    }

    /// Percepciones-deducciones agregadas en el lote
    pub fn facts_created(&self) -> usize {
        self.facts_created
    }

    pub fn resolver(&self) -> &EntityResolver<'p> {
        &self.resolver
    }
}

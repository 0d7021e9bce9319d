// ==========================================
// Perseo nómina - Lector de hojas de cálculo
// ==========================================
// Abre la explotación (XLS binario heredado; también XLSX) y expone
// la primera hoja por renglón y columna con índices desde cero
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Data, Range, Reader, Xls, Xlsx};
use std::fmt::Display;
use std::io::{Read, Seek};
use std::path::Path;

// ==========================================
// CellValue - valor de una celda
// ==========================================
// Tipado laxo: texto o número; lo demás se considera vacío
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// El texto de la celda, solo si la celda es de texto
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Representación para claves: los números enteros sin decimales
    pub fn to_key_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            // Errores de fórmula y celdas vacías
            _ => CellValue::Empty,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

// ==========================================
// RowCells - acceso a las celdas de un renglón
// ==========================================
pub trait RowCells {
    /// Valor de la columna (desde cero); fuera de rango es vacío
    fn cell(&self, col: usize) -> CellValue;
}

impl RowCells for [CellValue] {
    fn cell(&self, col: usize) -> CellValue {
        self.get(col).cloned().unwrap_or_default()
    }
}

impl RowCells for Vec<CellValue> {
    fn cell(&self, col: usize) -> CellValue {
        self.as_slice().cell(col)
    }
}

// ==========================================
// SpreadsheetReader
// ==========================================
pub struct SpreadsheetReader {
    range: Range<Data>,
}

/// Renglón de la primera hoja
pub struct SheetRow<'a> {
    range: &'a Range<Data>,
    row: u32,
}

impl RowCells for SheetRow<'_> {
    fn cell(&self, col: usize) -> CellValue {
        u32::try_from(col)
            .ok()
            .and_then(|col| self.range.get_value((self.row, col)))
            .map(CellValue::from)
            .unwrap_or_default()
    }
}

fn first_sheet<RS, R>(workbook: &mut R) -> Result<Range<Data>, String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(e.to_string()),
        None => Err("el libro no tiene hojas".to_string()),
    }
}

impl SpreadsheetReader {
    /// Abrir el libro y cargar su primera hoja
    ///
    /// Se intenta primero el formato binario heredado (BIFF) y después XLSX;
    /// la extensión del archivo no se toma en cuenta
    ///
    /// # Errores
    /// - ImportError::SpreadsheetOpen si el archivo no existe, no se puede leer
    ///   o no es una hoja de cálculo
    pub fn open(path: &Path) -> ImportResult<Self> {
        let to_error = |message: String| ImportError::SpreadsheetOpen {
            path: path.display().to_string(),
            message,
        };

        let range = match open_workbook::<Xls<_>, _>(path) {
            Ok(mut workbook) => first_sheet(&mut workbook).map_err(to_error)?,
            Err(xls_error) => match open_workbook::<Xlsx<_>, _>(path) {
                Ok(mut workbook) => first_sheet(&mut workbook).map_err(to_error)?,
                Err(_) => return Err(to_error(xls_error.to_string())),
            },
        };
        Ok(Self { range })
    }

    /// Construir sobre una hoja ya cargada
    pub fn from_range(range: Range<Data>) -> Self {
        Self { range }
    }

    /// Número de renglones contando el encabezado (último índice + 1)
    pub fn row_count(&self) -> usize {
        self.range
            .end()
            .map(|(row, _)| row as usize + 1)
            .unwrap_or(0)
    }

    /// Valor de una celda por renglón y columna absolutos
    pub fn cell_value(&self, row: usize, col: usize) -> CellValue {
        self.row(row).cell(col)
    }

    /// Vista de un renglón
    pub fn row(&self, row: usize) -> SheetRow<'_> {
        SheetRow {
            range: &self.range,
            row: u32::try_from(row).unwrap_or(u32::MAX),
        }
    }

    /// Renglones de datos (del 1 en adelante; el 0 es el encabezado)
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, SheetRow<'_>)> + '_ {
        (1..self.row_count()).map(move |idx| (idx, self.row(idx)))
    }
}

// ==========================================
// Perseo nómina - Percepciones-deducciones
// ==========================================
// Hecho de nómina: un importe de un concepto para una persona,
// plaza y centro de trabajo en una quincena
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// PercepcionDeduccion - registro persistido
// ==========================================
// Sin clave natural, se crea uno por cada bloque válido de cada renglón
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercepcionDeduccion {
    pub id: i64,
    pub centro_trabajo_id: i64,
    pub concepto_id: i64,
    pub persona_id: i64,
    pub plaza_id: i64,
    pub quincena: String,
    pub importe: f64,
    pub creado: DateTime<Utc>,
}

// ==========================================
// NewPercepcionDeduccion - registro por insertar
// ==========================================
// Las referencias ya están resueltas (existentes o pendientes en la transacción)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPercepcionDeduccion {
    pub centro_trabajo_id: i64,
    pub concepto_id: i64,
    pub persona_id: i64,
    pub plaza_id: i64,
    pub quincena: String,
    pub importe: f64,
}

// ==========================================
// IngestionBatch - bitácora de alimentaciones
// ==========================================
// Se escribe en la misma transacción que los hechos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionBatch {
    pub batch_id: String,                 // UUID v4
    pub quincena: String,                 // Periodo alimentado
    pub file_path: String,                // Ruta del NominaFmt2.XLS
    pub rows_read: usize,                 // Renglones de datos leídos
    pub rows_skipped: usize,              // Renglones omitidos por estar mal formados
    pub facts_created: usize,             // Percepciones-deducciones insertadas
    pub new_conceptos: Vec<String>,       // Claves de conceptos que no existían
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

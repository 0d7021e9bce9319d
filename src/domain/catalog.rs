// ==========================================
// Perseo nómina - Catálogos de referencia
// ==========================================
// Conceptos, centros de trabajo, plazas y personas
// Cada uno se identifica por una clave natural única
// ==========================================

use crate::domain::types::{EntityKind, Estatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descripción de los conceptos creados al vuelo
pub const CONCEPTO_STUB_DESCRIPCION: &str = "DESCONOCIDO";

/// Descripción de centros de trabajo y plazas creados al vuelo
pub const ND_DESCRIPCION: &str = "ND";

// ==========================================
// Concepto - concepto de nómina
// ==========================================
// clave = tipo (P/D) + conc, por ejemplo P01 o D62
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concepto {
    pub id: i64,
    pub clave: String,
    pub descripcion: String,
    pub estatus: Estatus,
    pub creado: DateTime<Utc>,
    pub modificado: DateTime<Utc>,
}

// ==========================================
// CentroTrabajo - centro de trabajo
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroTrabajo {
    pub id: i64,
    pub clave: String,
    pub descripcion: String,
    pub estatus: Estatus,
    pub creado: DateTime<Utc>,
    pub modificado: DateTime<Utc>,
}

// ==========================================
// Plaza
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plaza {
    pub id: i64,
    pub clave: String,
    pub descripcion: String,
    pub estatus: Estatus,
    pub creado: DateTime<Utc>,
    pub modificado: DateTime<Utc>,
}

// ==========================================
// Persona - empleado
// ==========================================
// rfc es único; los datos demográficos no los llena la alimentación
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: i64,
    pub rfc: String,
    pub nombres: String,
    pub apellido_primero: String,
    pub apellido_segundo: String,
    pub curp: String,
    pub num_empleado: Option<i64>,
    pub estatus: Estatus,
    pub creado: DateTime<Utc>,
    pub modificado: DateTime<Utc>,
}

impl Persona {
    /// Nombres seguidos de los apellidos
    pub fn nombre_completo(&self) -> String {
        format!(
            "{} {} {}",
            self.nombres, self.apellido_primero, self.apellido_segundo
        )
    }
}

// ==========================================
// EntityStub - registro mínimo a crear
// ==========================================
// Lo construye el stub_factory del resolvedor cuando la clave no existe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityStub {
    Concepto {
        clave: String,
        descripcion: String,
    },
    CentroTrabajo {
        clave: String,
        descripcion: String,
    },
    Persona {
        rfc: String,
        nombres: String,
        apellido_primero: String,
        apellido_segundo: String,
    },
    Plaza {
        clave: String,
        descripcion: String,
    },
}

impl EntityStub {
    /// Concepto desconocido: descripción DESCONOCIDO
    pub fn concepto(clave: impl Into<String>) -> Self {
        EntityStub::Concepto {
            clave: clave.into(),
            descripcion: CONCEPTO_STUB_DESCRIPCION.to_string(),
        }
    }

    /// Centro de trabajo sin descripción: ND
    pub fn centro_trabajo(clave: impl Into<String>) -> Self {
        EntityStub::CentroTrabajo {
            clave: clave.into(),
            descripcion: ND_DESCRIPCION.to_string(),
        }
    }

    /// Plaza sin descripción: ND
    pub fn plaza(clave: impl Into<String>) -> Self {
        EntityStub::Plaza {
            clave: clave.into(),
            descripcion: ND_DESCRIPCION.to_string(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityStub::Concepto { .. } => EntityKind::Concepto,
            EntityStub::CentroTrabajo { .. } => EntityKind::CentroTrabajo,
            EntityStub::Persona { .. } => EntityKind::Persona,
            EntityStub::Plaza { .. } => EntityKind::Plaza,
        }
    }

    /// Clave natural (clave o rfc)
    pub fn key(&self) -> &str {
        match self {
            EntityStub::Concepto { clave, .. }
            | EntityStub::CentroTrabajo { clave, .. }
            | EntityStub::Plaza { clave, .. } => clave,
            EntityStub::Persona { rfc, .. } => rfc,
        }
    }
}

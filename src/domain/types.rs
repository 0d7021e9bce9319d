// ==========================================
// Perseo nómina - Tipos de dominio
// ==========================================

use crate::sanitize::{safe_quincena, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Estatus (borrado lógico)
// ==========================================
// A = activo, B = dado de baja
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Estatus {
    #[default]
    Activo,
    Inactivo,
}

impl fmt::Display for Estatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl Estatus {
    /// Interpretar el valor almacenado; cualquier valor distinto de "B" es activo
    pub fn from_db_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "B" => Estatus::Inactivo,
            _ => Estatus::Activo,
        }
    }

    /// Valor que se guarda en la columna estatus
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Estatus::Activo => "A",
            Estatus::Inactivo => "B",
        }
    }
}

// ==========================================
// EntityKind - entidades de referencia
// ==========================================
// Conjunto cerrado de entidades que la alimentación puede crear al vuelo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Concepto,
    CentroTrabajo,
    Persona,
    Plaza,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl EntityKind {
    /// Tabla donde vive la entidad
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Concepto => "conceptos",
            EntityKind::CentroTrabajo => "centros_trabajos",
            EntityKind::Persona => "personas",
            EntityKind::Plaza => "plazas",
        }
    }

    /// Columna con la clave natural única
    pub fn key_column(&self) -> &'static str {
        match self {
            EntityKind::Persona => "rfc",
            _ => "clave",
        }
    }

    /// Nombre para mensajes al usuario
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Concepto => "Concepto",
            EntityKind::CentroTrabajo => "Centro de Trabajo",
            EntityKind::Persona => "Persona",
            EntityKind::Plaza => "Plaza",
        }
    }

    /// Participio con el género gramatical de la entidad
    pub fn inserted_word(&self) -> &'static str {
        match self {
            EntityKind::Concepto | EntityKind::CentroTrabajo => "insertado",
            EntityKind::Persona | EntityKind::Plaza => "insertada",
        }
    }
}

// ==========================================
// Quincena - periodo de pago
// ==========================================
// Seis dígitos, por ejemplo 202501 (año + número de quincena)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quincena(String);

impl Quincena {
    /// Validar y construir la quincena
    ///
    /// # Errores
    /// - ValidationError::InvalidQuincena si no son exactamente seis dígitos
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        safe_quincena(input).map(Quincena)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Quincena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Quincena {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

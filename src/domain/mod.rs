// ==========================================
// Perseo nómina - Capa de dominio
// ==========================================
// Entidades, tipos y reglas sin acceso a datos
// ==========================================

pub mod catalog;
pub mod percepcion;
pub mod types;

// Reexportar los tipos principales
pub use catalog::{CentroTrabajo, Concepto, EntityStub, Persona, Plaza};
pub use percepcion::{IngestionBatch, NewPercepcionDeduccion, PercepcionDeduccion};
pub use types::{EntityKind, Estatus, Quincena};

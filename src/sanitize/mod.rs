// ==========================================
// Perseo nómina - Limpieza y validación de textos
// ==========================================
// Funciones puras, sin dependencias de otras capas
// ==========================================

pub mod error;
pub mod safe_string;
pub mod validators;

pub use error::{ValidationError, ValidationResult};
pub use safe_string::{
    safe_clave, safe_clave_with, safe_message, safe_string, safe_string_with, SafeStringOptions,
    SAFE_CLAVE_MAX_LEN, SAFE_MESSAGE_DEFAULT, SAFE_STRING_MAX_LEN,
};
pub use validators::{
    safe_concepto, safe_curp, safe_email, safe_plaza, safe_quincena, safe_rfc, Presence,
    QUINCENA_REGEXP,
};

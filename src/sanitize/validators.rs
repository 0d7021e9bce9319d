// ==========================================
// Perseo nómina - Validadores con formato fijo
// ==========================================
// Normalizar primero, después comparar contra el patrón
// ==========================================

use crate::sanitize::error::{ValidationError, ValidationResult};
use crate::sanitize::safe_string::{transliterate, WHITESPACE};
use regex::Regex;
use std::sync::LazyLock;

pub const CLAVE_REGEXP: &str = r"^[a-zA-Z0-9-]{1,16}$";
pub const CONCEPTO_REGEXP: &str = r"^[PD][a-zA-Z0-9][a-zA-Z0-9]$";
pub const CURP_REGEXP: &str = r"^[a-zA-Z]{4}\d{6}[a-zA-Z]{6}\d{2}$";
pub const EMAIL_REGEXP: &str = r"^[\w.-]+@[\w.-]+\.\w+$";
pub const PLAZA_REGEXP: &str = r"^[a-zA-Z0-9]{1,24}$";
pub const QUINCENA_REGEXP: &str = r"^\d{6}$";
pub const RFC_REGEXP: &str = r"^[a-zA-Z]{3,4}\d{6}[a-zA-Z0-9]{3}$";

static CONCEPTO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CONCEPTO_REGEXP).expect("patrón fijo"));
static CURP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(CURP_REGEXP).expect("patrón fijo"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_REGEXP).expect("patrón fijo"));
static EMAIL_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]*@*[\w.-]*\.*\w*$").expect("patrón fijo"));
static PLAZA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLAZA_REGEXP).expect("patrón fijo"));
static QUINCENA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(QUINCENA_REGEXP).expect("patrón fijo"));
static RFC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(RFC_REGEXP).expect("patrón fijo"));
static NOT_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("patrón fijo"));

/// Si un campo vacío es aceptable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    /// El valor siempre se valida
    #[default]
    Required,
    /// Un valor vacío (tras recortar) se entrega vacío sin validar
    Optional,
}

/// Quitar todo lo que no sea alfanumérico y pasar a mayúsculas
fn compact_upper(stripped: &str) -> String {
    let transliterated = transliterate(stripped);
    let spaced = NOT_ALPHANUMERIC_RUN.replace_all(&transliterated, " ");
    WHITESPACE.replace_all(&spaced, "").to_uppercase()
}

/// Validar un RFC (3 o 4 letras, 6 dígitos, 3 de homoclave)
pub fn safe_rfc(input: &str, presence: Presence) -> ValidationResult<String> {
    let stripped = input.trim();
    if presence == Presence::Optional && stripped.is_empty() {
        return Ok(String::new());
    }
    let rfc = compact_upper(stripped);
    if !RFC_RE.is_match(&rfc) {
        return Err(ValidationError::InvalidRfc(input.to_string()));
    }
    Ok(rfc)
}

/// Validar una CURP (18 caracteres)
pub fn safe_curp(input: &str, presence: Presence) -> ValidationResult<String> {
    let stripped = input.trim();
    if presence == Presence::Optional && stripped.is_empty() {
        return Ok(String::new());
    }
    let curp = compact_upper(stripped);
    if !CURP_RE.is_match(&curp) {
        return Err(ValidationError::InvalidCurp(input.to_string()));
    }
    Ok(curp)
}

/// Validar un e-mail en minúsculas
///
/// Con search_fragment se acepta un fragmento para búsquedas
/// y un fragmento inválido se entrega vacío
pub fn safe_email(input: &str, search_fragment: bool) -> ValidationResult<String> {
    let email = input.trim().to_lowercase();
    if search_fragment {
        if EMAIL_FRAGMENT_RE.is_match(&email) {
            return Ok(email);
        }
        return Ok(String::new());
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::InvalidEmail(input.to_string()));
    }
    Ok(email)
}

/// Validar la quincena: exactamente seis dígitos
pub fn safe_quincena(input: &str) -> ValidationResult<String> {
    let quincena = input.trim();
    if !QUINCENA_RE.is_match(quincena) {
        return Err(ValidationError::InvalidQuincena(input.to_string()));
    }
    Ok(quincena.to_string())
}

/// Validar la clave de un concepto: P o D seguida de dos alfanuméricos
pub fn safe_concepto(input: &str) -> ValidationResult<String> {
    let concepto = input.trim().to_uppercase();
    if !CONCEPTO_RE.is_match(&concepto) {
        return Err(ValidationError::InvalidConcepto(input.to_string()));
    }
    Ok(concepto)
}

/// Validar la clave de una plaza: hasta 24 alfanuméricos
pub fn safe_plaza(input: &str) -> ValidationResult<String> {
    let plaza = input.trim().to_uppercase();
    if !PLAZA_RE.is_match(&plaza) {
        return Err(ValidationError::InvalidPlaza(input.to_string()));
    }
    Ok(plaza)
}

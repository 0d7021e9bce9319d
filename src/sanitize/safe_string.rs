// ==========================================
// Perseo nómina - Limpieza de textos libres y claves
// ==========================================
// Transliteración a ASCII, caracteres permitidos, espacios y mayúsculas
// ==========================================

use deunicode::{deunicode_char, deunicode_with_tofu};
use regex::Regex;
use std::sync::LazyLock;

static NOT_ALLOWED_ASCII: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.()/-]+").expect("patrón fijo"));
static NOT_ALLOWED_ASCII_ENIE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.()/ñÑ-]+").expect("patrón fijo"));
static NOT_ALLOWED_ACCENTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-záéíóúüA-ZÁÉÍÓÚÜ0-9.()/-]+").expect("patrón fijo")
});
static NOT_ALLOWED_ACCENTED_ENIE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-záéíóúüñA-ZÁÉÍÓÚÜÑ0-9.()/-]+").expect("patrón fijo")
});
static NOT_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("patrón fijo"));
pub(crate) static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("patrón fijo"));

/// Longitud máxima por defecto de safe_string
pub const SAFE_STRING_MAX_LEN: usize = 250;

/// Longitud máxima por defecto de safe_clave
pub const SAFE_CLAVE_MAX_LEN: usize = 16;

/// Mensaje por defecto de safe_message
pub const SAFE_MESSAGE_DEFAULT: &str = "Sin descripción";

/// Opciones de safe_string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeStringOptions {
    /// 0 desactiva el recorte
    pub max_len: usize,
    pub transliterate: bool,
    pub preserve_enie: bool,
    pub uppercase: bool,
}

impl Default for SafeStringOptions {
    fn default() -> Self {
        Self {
            max_len: SAFE_STRING_MAX_LEN,
            transliterate: true,
            preserve_enie: false,
            uppercase: true,
        }
    }
}

/// Transliterar todo el texto; lo que no tiene equivalente se elimina
pub(crate) fn transliterate(input: &str) -> String {
    deunicode_with_tofu(input, "")
}

/// Transliterar carácter por carácter conservando ñ y Ñ
fn transliterate_keeping_enie(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            'ñ' | 'Ñ' => out.push(c),
            _ => out.push_str(deunicode_char(c).unwrap_or("")),
        }
    }
    out
}

/// Recortar a max_len caracteres (no bytes)
fn truncate_chars(input: &str, max_len: usize) -> Option<String> {
    if input.chars().count() > max_len {
        Some(input.chars().take(max_len).collect())
    } else {
        None
    }
}

/// Limpiar un texto libre
///
/// # Reglas
/// 1. Transliterar a ASCII (salvo ñ/Ñ con preserve_enie)
/// 2. Sustituir cada tramo de caracteres no permitidos por un espacio
/// 3. Colapsar espacios y recortar extremos
/// 4. Pasar a mayúsculas (opcional)
/// 5. Recortar a max_len agregando "..." (max_len = 0 no recorta)
pub fn safe_string_with(input: &str, options: SafeStringOptions) -> String {
    let replaced = match (options.transliterate, options.preserve_enie) {
        (true, false) => NOT_ALLOWED_ASCII
            .replace_all(&transliterate(input), " ")
            .into_owned(),
        (true, true) => NOT_ALLOWED_ASCII_ENIE
            .replace_all(&transliterate_keeping_enie(input), " ")
            .into_owned(),
        (false, false) => NOT_ALLOWED_ACCENTED.replace_all(input, " ").into_owned(),
        (false, true) => NOT_ALLOWED_ACCENTED_ENIE
            .replace_all(input, " ")
            .into_owned(),
    };

    let collapsed = WHITESPACE.replace_all(&replaced, " ");
    let mut result = collapsed.trim().to_string();
    if options.uppercase {
        result = result.to_uppercase();
    }

    if options.max_len == 0 {
        return result;
    }
    match truncate_chars(&result, options.max_len) {
        Some(truncated) => format!("{truncated}..."),
        None => result,
    }
}

/// safe_string con las opciones por defecto
pub fn safe_string(input: &str) -> String {
    safe_string_with(input, SafeStringOptions::default())
}

/// Limpiar una clave: alfanuméricos unidos por el separador, sin espacios,
/// en mayúsculas y recortada sin puntos suspensivos
pub fn safe_clave_with(input: &str, max_len: usize, separator: &str) -> String {
    let stripped = input.trim();
    if stripped.is_empty() {
        return String::new();
    }
    let transliterated = transliterate(stripped);
    let joined = NOT_ALPHANUMERIC.replace_all(&transliterated, separator);
    let final_clave = WHITESPACE.replace_all(&joined, "").to_uppercase();
    truncate_chars(&final_clave, max_len).unwrap_or(final_clave)
}

/// safe_clave con longitud 16 y separador "-"
pub fn safe_clave(input: &str) -> String {
    safe_clave_with(input, SAFE_CLAVE_MAX_LEN, "-")
}

/// Mensaje para bitácora: vacío usa el texto por defecto, largo se recorta con "..."
pub fn safe_message(input: &str, max_len: usize, default_output: &str) -> String {
    if input.is_empty() {
        return default_output.to_string();
    }
    match truncate_chars(input, max_len) {
        Some(truncated) => format!("{truncated}..."),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_string_transliterates_and_uppercases() {
        assert_eq!(safe_string("  José   Pérez  "), "JOSE PEREZ");
        assert_eq!(safe_string("niño"), "NINO");
        assert_eq!(safe_string("p"), "P");
        assert_eq!(safe_string(""), "");
    }

    #[test]
    fn test_safe_string_replaces_disallowed_runs_with_one_space() {
        assert_eq!(safe_string("a,;:b"), "A B");
        assert_eq!(safe_string("calle 5/B (int.) #3-A"), "CALLE 5/B (INT.) 3-A");
        assert_eq!(safe_string("!!!"), "");
    }

    #[test]
    fn test_safe_string_truncates_with_ellipsis() {
        let options = SafeStringOptions {
            max_len: 5,
            ..Default::default()
        };
        assert_eq!(safe_string_with("abcdefgh", options), "ABCDE...");
        assert_eq!(safe_string_with("abcde", options), "ABCDE");

        let unlimited = SafeStringOptions {
            max_len: 0,
            ..Default::default()
        };
        let long = "x".repeat(400);
        assert_eq!(safe_string_with(&long, unlimited).len(), 400);
    }

    #[test]
    fn test_safe_string_preserve_enie() {
        let options = SafeStringOptions {
            preserve_enie: true,
            ..Default::default()
        };
        assert_eq!(safe_string_with("Muñoz Ávila", options), "MUÑOZ AVILA");
    }

    #[test]
    fn test_safe_string_without_transliteration_keeps_accents() {
        let options = SafeStringOptions {
            transliterate: false,
            uppercase: false,
            ..Default::default()
        };
        assert_eq!(safe_string_with("Pérez, Núñez", options), "Pérez Nú ez");

        let with_enie = SafeStringOptions {
            transliterate: false,
            preserve_enie: true,
            uppercase: false,
            ..Default::default()
        };
        assert_eq!(safe_string_with("Pérez, Núñez", with_enie), "Pérez Núñez");
    }

    #[test]
    fn test_safe_clave() {
        assert_eq!(safe_clave("  José Pérez  "), "JOSE-PEREZ");
        assert_eq!(safe_clave("ct 001 / norte"), "CT-001-NORTE");
        assert_eq!(safe_clave("   "), "");
        assert_eq!(safe_clave(""), "");
    }

    #[test]
    fn test_safe_clave_transliterates_before_joining() {
        assert_eq!(safe_clave("Núñez  Ávila\t01"), "NUNEZ-AVILA-01");
        assert_eq!(safe_clave("ÉÑ"), "EN");
    }

    #[test]
    fn test_safe_clave_truncates_without_ellipsis() {
        let input = "x".repeat(20);
        assert_eq!(safe_clave_with(&input, 16, "-"), "X".repeat(16));
        assert_eq!(safe_clave_with("a b c", 16, "_"), "A_B_C");
    }

    #[test]
    fn test_safe_message() {
        assert_eq!(safe_message("", 250, SAFE_MESSAGE_DEFAULT), "Sin descripción");
        assert_eq!(safe_message("hola", 250, SAFE_MESSAGE_DEFAULT), "hola");
        assert_eq!(safe_message("abcdef", 3, SAFE_MESSAGE_DEFAULT), "abc...");
    }
}

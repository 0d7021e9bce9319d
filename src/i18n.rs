// ==========================================
// Perseo nómina - Internacionalización
// ==========================================
// rust-i18n; español de México por omisión, inglés disponible
// El macro rust_i18n::i18n! se inicializa en lib.rs
// ==========================================

/// Idioma actual
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Cambiar el idioma
///
/// # Parámetros
/// - locale: "es-MX" o "en"
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Traducir un mensaje sin parámetros
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Traducir un mensaje sustituyendo %{nombre} por cada parámetro
///
/// # Ejemplo
/// ```no_run
/// use perseo_nominas::i18n::t_with_args;
/// let msg = t_with_args("cli.skipped_rows", &[("count", "3")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // El idioma es estado global y las pruebas corren en paralelo
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");
        set_locale("es-MX");
        assert_eq!(current_locale(), "es-MX");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("es-MX");
        assert_eq!(
            t("cli.storage_not_configured"),
            "Sin depósito configurado, el archivo solo se guarda localmente"
        );
        set_locale("en");
        assert_eq!(
            t("cli.storage_not_configured"),
            "No storage bucket configured, the file is only saved locally"
        );
        set_locale("es-MX");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("es-MX");
        let msg = t_with_args(
            "cli.database_error",
            &[("path", "/tmp/perseo.db"), ("error", "sin permiso")],
        );
        assert_eq!(msg, "No se pudo abrir la base de datos /tmp/perseo.db: sin permiso");

        set_locale("en");
        let msg = t_with_args("cli.skipped_rows", &[("count", "2")]);
        assert_eq!(msg, "Skipped rows: 2");
        set_locale("es-MX");
    }
}

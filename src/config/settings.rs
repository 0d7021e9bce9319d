// ==========================================
// Perseo nómina - Configuración
// ==========================================
// Fuente: variables de entorno (y archivo .env vía dotenvy)
// Se construye una vez en main y se pasa explícitamente a cada componente
// ==========================================

use std::path::{Path, PathBuf};

/// Nombres de las variables de entorno
pub mod settings_keys {
    // Explotación de nómina
    pub const EXPLOTACION_BASE_DIR: &str = "EXPLOTACION_BASE_DIR";

    // Base de datos
    pub const DATABASE_PATH: &str = "PERSEO_DATABASE_PATH";

    // Exportaciones
    pub const EXPORTS_DIR: &str = "PERSEO_EXPORTS_DIR";
    pub const CLOUD_STORAGE_DEPOSITO: &str = "CLOUD_STORAGE_DEPOSITO";
    pub const CLOUD_STORAGE_TOKEN: &str = "CLOUD_STORAGE_TOKEN";

    // Idioma de los mensajes
    pub const LOCALE: &str = "PERSEO_LOCALE";
}

/// Directorio local de exportaciones por omisión (relativo al directorio actual)
pub const DEFAULT_EXPORTS_DIR: &str = "exports";

/// Idioma por omisión
pub const DEFAULT_LOCALE: &str = "es-MX";

// ==========================================
// Settings
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directorio con un subdirectorio por quincena; None si no está definida
    pub explotacion_base_dir: Option<PathBuf>,
    pub database_path: PathBuf,
    pub exports_dir: PathBuf,
    /// Depósito de almacenamiento; None desactiva la subida
    pub cloud_storage_deposito: Option<String>,
    pub cloud_storage_token: Option<String>,
    pub locale: String,
}

impl Settings {
    /// Cargar .env (si existe) y leer el entorno del proceso
    pub fn from_env() -> Self {
        // Un .env ausente no es error
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construir a partir de una función de búsqueda de variables
    ///
    /// Las cadenas vacías o con solo espacios cuentan como no definidas,
    /// salvo EXPLOTACION_BASE_DIR, que solo se exige definida
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            explotacion_base_dir: lookup(settings_keys::EXPLOTACION_BASE_DIR).map(PathBuf::from),
            database_path: non_empty(settings_keys::DATABASE_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            exports_dir: non_empty(settings_keys::EXPORTS_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORTS_DIR)),
            cloud_storage_deposito: non_empty(settings_keys::CLOUD_STORAGE_DEPOSITO),
            cloud_storage_token: non_empty(settings_keys::CLOUD_STORAGE_TOKEN),
            locale: non_empty(settings_keys::LOCALE).unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        }
    }

    /// Configuración mínima para pruebas y herramientas
    pub fn for_paths(
        explotacion_base_dir: Option<&Path>,
        database_path: &Path,
        exports_dir: &Path,
    ) -> Self {
        Self {
            explotacion_base_dir: explotacion_base_dir.map(Path::to_path_buf),
            database_path: database_path.to_path_buf(),
            exports_dir: exports_dir.to_path_buf(),
            cloud_storage_deposito: None,
            cloud_storage_token: None,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// Ruta por omisión de la base de datos
///
/// - Directorio de datos del usuario: <data_dir>/perseo/perseo.db
/// - Sin directorio de datos: ./perseo.db
pub fn default_database_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("perseo").join("perseo.db"),
        None => PathBuf::from("./perseo.db"),
    }
}

// ==========================================
// Perseo nómina - Configuración
// ==========================================
// Variables de entorno leídas una sola vez al arrancar
// ==========================================

pub mod settings;

pub use settings::{default_database_path, settings_keys, Settings};

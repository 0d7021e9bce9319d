// ==========================================
// Perseo nómina - Bitácora
// ==========================================
// tracing + tracing-subscriber; nivel por RUST_LOG
// La bitácora va a stderr: stdout queda para los mensajes al operador
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Inicializar la bitácora
///
/// # Variables de entorno
/// - RUST_LOG: filtro de niveles (por omisión: info)
///   por ejemplo RUST_LOG=info o RUST_LOG=perseo_nominas=debug
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Bitácora para pruebas: nivel debug y salida capturada por el arnés
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

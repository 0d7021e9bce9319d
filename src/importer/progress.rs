// ==========================================
// Perseo nómina - Avance de la alimentación
// ==========================================
// Las líneas para el operador (terminal) no son registros de tracing;
// pasan por este observador para que la CLI las imprima y las pruebas
// las capturen
// ==========================================

use std::sync::Mutex;

pub trait ImportProgress {
    /// Emitir una línea para el operador
    fn line(&self, message: &str);
}

/// Imprime cada línea en la salida estándar
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutProgress;

impl ImportProgress for StdoutProgress {
    fn line(&self, message: &str) {
        println!("{message}");
    }
}

/// Descarta todas las líneas
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn line(&self, _message: &str) {}
}

/// Guarda las líneas en memoria
#[derive(Debug, Default)]
pub struct CollectingProgress {
    lines: Mutex<Vec<String>>,
}

impl CollectingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copia de las líneas emitidas hasta ahora
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ImportProgress for CollectingProgress {
    fn line(&self, message: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

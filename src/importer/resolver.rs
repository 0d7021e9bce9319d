// ==========================================
// Perseo nómina - Resolvedor de entidades
// ==========================================
// Buscar por clave natural o crear un registro mínimo
// Memoriza cada clave resuelta durante el lote: una misma clave
// siempre entrega el mismo id y se agrega una sola vez
// ==========================================

use crate::domain::{EntityKind, EntityStub};
use crate::importer::progress::ImportProgress;
use crate::repository::{CatalogStore, RepositoryResult};
use std::collections::HashMap;
use tracing::info;

/// Resultado de resolver una clave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub id: i64,
    /// true si la entidad se creó en esta llamada
    pub created: bool,
}

// ==========================================
// EntityResolver
// ==========================================
// Vive lo que dura un lote; no se comparte entre lotes
pub struct EntityResolver<'p> {
    memo: HashMap<(EntityKind, String), i64>,
    created: Vec<(EntityKind, String)>,
    progress: &'p dyn ImportProgress,
}

impl<'p> EntityResolver<'p> {
    pub fn new(progress: &'p dyn ImportProgress) -> Self {
        Self {
            memo: HashMap::new(),
            created: Vec::new(),
            progress,
        }
    }

    /// Resolver la entidad `kind` con clave `key`, creándola si no existe
    ///
    /// # Parámetros
    /// - store: almacén con la transacción del lote
    /// - kind: tipo de entidad
    /// - key: clave natural (clave o rfc)
    /// - stub_factory: construye el registro mínimo; solo se invoca si la clave no existe
    ///
    /// # Retorna
    /// - Resolved con el id y si se creó en esta llamada
    ///
    /// # Errores
    /// - RepositoryError del almacén (consulta o inserción)
    pub fn resolve_or_stub<S, F>(
        &mut self,
        store: &mut S,
        kind: EntityKind,
        key: &str,
        stub_factory: F,
    ) -> RepositoryResult<Resolved>
    where
        S: CatalogStore + ?Sized,
        F: FnOnce() -> EntityStub,
    {
        let memo_key = (kind, key.to_string());
        if let Some(&id) = self.memo.get(&memo_key) {
            return Ok(Resolved { id, created: false });
        }

        if let Some(id) = store.find_id_by_key(kind, key)? {
            self.memo.insert(memo_key, id);
            return Ok(Resolved { id, created: false });
        }

        let stub = stub_factory();
        debug_assert_eq!(stub.kind(), kind);
        debug_assert_eq!(stub.key(), key);
        let id = store.insert_stub(&stub)?;

        self.progress
            .line(&format!("  {} {} {}", kind.label(), key, kind.inserted_word()));
        info!(kind = %kind, key, id, "entidad creada al vuelo");

        self.memo.insert(memo_key.clone(), id);
        self.created.push(memo_key);
        Ok(Resolved { id, created: true })
    }

    /// Claves creadas en este lote para un tipo, en orden de creación
    pub fn created_keys(&self, kind: EntityKind) -> Vec<String> {
        self.created
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, key)| key.clone())
            .collect()
    }

    /// Total de entidades creadas en este lote
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

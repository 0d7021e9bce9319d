// ==========================================
// Perseo nómina - Contrato del almacén transaccional
// ==========================================
// El importador solo conoce esta interfaz: buscar por clave única,
// agregar registros pendientes y confirmar al final del lote
// ==========================================

use crate::domain::{EntityKind, EntityStub, IngestionBatch, NewPercepcionDeduccion};
use crate::repository::error::RepositoryResult;

/// Almacén con lectura de lo ya agregado en la misma transacción
pub trait CatalogStore {
    /// Buscar el id de una entidad por su clave natural
    ///
    /// # Retorna
    /// - Ok(Some(id)): existe (confirmada o pendiente en esta transacción)
    /// - Ok(None): no existe
    fn find_id_by_key(&self, kind: EntityKind, key: &str) -> RepositoryResult<Option<i64>>;

    /// Agregar una entidad mínima y entregar su id
    fn insert_stub(&mut self, stub: &EntityStub) -> RepositoryResult<i64>;

    /// Agregar una percepción-deducción con sus referencias resueltas
    fn insert_percepcion_deduccion(
        &mut self,
        fact: &NewPercepcionDeduccion,
    ) -> RepositoryResult<i64>;

    /// Registrar la bitácora del lote
    fn insert_ingestion_batch(&mut self, batch: &IngestionBatch) -> RepositoryResult<()>;
}

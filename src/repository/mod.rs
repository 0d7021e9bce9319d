// ==========================================
// Perseo nómina - Capa de repositorio
// ==========================================
// Regla: el repositorio no contiene reglas de negocio
// Todas las consultas usan parámetros
// ==========================================

pub mod catalog_repo;
pub mod error;
pub mod sqlite_store;
pub mod store;

pub use catalog_repo::CatalogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use sqlite_store::SqliteSession;
pub use store::CatalogStore;

//! Material catalog port
//!
//! One read-only interface over the material list, implemented by a
//! static in-memory provider and by the remote catalog service.

use arkcutt_domain::quote::Material;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait MaterialCatalog: Send + Sync {
    /// Short name for logs ("static", "remote")
    fn source(&self) -> &str;

    async fn list_materials(&self) -> Result<Vec<Material>, CatalogError>;
}

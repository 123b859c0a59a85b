//! Material catalog providers.

mod remote;
mod static_catalog;

pub use remote::{RemoteMaterialCatalog, parse_listing};
pub use static_catalog::StaticMaterialCatalog;

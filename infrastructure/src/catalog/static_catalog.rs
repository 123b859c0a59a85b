//! In-memory material catalog

use arkcutt_application::ports::material_catalog::{CatalogError, MaterialCatalog};
use arkcutt_domain::quote::{Material, MaterialCategory};
use async_trait::async_trait;

/// Fixed material list, used when the remote catalog is not configured.
#[derive(Debug, Clone)]
pub struct StaticMaterialCatalog {
    materials: Vec<Material>,
}

impl StaticMaterialCatalog {
    pub fn new(materials: Vec<Material>) -> Self {
        Self { materials }
    }

    /// Workshop inventory shipped with the binary.
    pub fn workshop() -> Self {
        Self::new(vec![
            Material::new("DM")
                .with_id(6)
                .with_category(MaterialCategory::Wood)
                .with_thickness(2.5)
                .with_color("Madera Natural")
                .with_price_per_cm2(0.008)
                .with_stock(0),
            Material::new("METACRILATO")
                .with_id(19)
                .with_category(MaterialCategory::Plastic)
                .with_thickness(2.0)
                .with_color("Transparente")
                .with_price_per_cm2(0.051)
                .with_stock(0),
        ])
    }
}

impl Default for StaticMaterialCatalog {
    fn default() -> Self {
        Self::workshop()
    }
}

#[async_trait]
impl MaterialCatalog for StaticMaterialCatalog {
    fn source(&self) -> &str {
        "static"
    }

    async fn list_materials(&self) -> Result<Vec<Material>, CatalogError> {
        Ok(self.materials.clone())
    }
}

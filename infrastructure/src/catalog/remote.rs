//! Material catalog backed by the pricing service's `GET /materiales`

use arkcutt_application::ports::material_catalog::{CatalogError, MaterialCatalog};
use arkcutt_domain::quote::Material;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::services::{MaterialsListing, PricingClient};

pub struct RemoteMaterialCatalog {
    client: PricingClient,
}

impl RemoteMaterialCatalog {
    pub fn new(client: PricingClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MaterialCatalog for RemoteMaterialCatalog {
    fn source(&self) -> &str {
        "remote"
    }

    async fn list_materials(&self) -> Result<Vec<Material>, CatalogError> {
        let listing = self
            .client
            .materials()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        parse_listing(&listing)
    }
}

/// Turn a raw listing into materials.
///
/// `detalle` carries full records and wins when present; otherwise
/// `materiales` may be plain names or records. Entries without a name are
/// skipped.
pub fn parse_listing(listing: &MaterialsListing) -> Result<Vec<Material>, CatalogError> {
    let entries = listing
        .detalle
        .as_array()
        .filter(|items| !items.is_empty())
        .or_else(|| listing.materiales.as_array())
        .ok_or_else(|| {
            CatalogError::InvalidResponse("no material list in response".to_string())
        })?;

    Ok(entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(Material::new(name.clone())),
            Value::Object(record) => parse_record(record),
            _ => None,
        })
        .collect())
}

fn field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| record.get(*k)).filter(|v| !v.is_null())
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_end_matches("mm")
            .trim()
            .replace(',', ".")
            .parse()
            .ok(),
        _ => None,
    }
}

fn parse_record(record: &Map<String, Value>) -> Option<Material> {
    let name = field(record, &["nombre", "name", "material"])?.as_str()?;
    let mut material = Material::new(name.trim());

    if let Some(id) = field(record, &["id"]).and_then(Value::as_u64) {
        material = material.with_id(id);
    }
    if let Some(category) = field(record, &["categoria", "category"])
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
    {
        material = material.with_category(category);
    }
    match field(record, &["grosores", "grosor", "thicknesses_mm", "thickness"]) {
        Some(Value::Array(items)) => {
            for mm in items.iter().filter_map(number) {
                material = material.with_thickness(mm);
            }
        }
        Some(single) => {
            if let Some(mm) = number(single) {
                material = material.with_thickness(mm);
            }
        }
        None => {}
    }
    if let Some(color) = field(record, &["color"]).and_then(Value::as_str) {
        material = material.with_color(color);
    }
    if let Some(price) = field(record, &["precio_por_cm2", "price_per_cm2"]).and_then(number) {
        material = material.with_price_per_cm2(price);
    }
    if let Some(stock) = field(record, &["stock_actual", "stock"]).and_then(Value::as_i64) {
        material = material.with_stock(stock);
    }

    Some(material)
}

//! Material tools: getMaterialOptions (injected catalog, filtered locally)
//! and getMaterialsFromBackend (raw listing from the pricing service).

use std::sync::Arc;

use arkcutt_application::ports::material_catalog::MaterialCatalog;
use arkcutt_domain::quote::{MaterialCategory, MaterialFilter};
use arkcutt_domain::tool::{
    entities::{ParamType, ToolDefinition, ToolParameter},
    handler::{HandlerError, ToolHandler},
    names::{GET_MATERIAL_OPTIONS, GET_MATERIALS_FROM_BACKEND},
    validation::ValidatedArgs,
};
use async_trait::async_trait;
use serde_json::{Value, json};

use super::to_payload;
use crate::services::PricingClient;

pub fn material_options_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_MATERIAL_OPTIONS,
        "List available materials with thicknesses, colors and prices, optionally filtered",
    )
    .with_parameter(
        ToolParameter::optional("category", "Material family")
            .with_type(ParamType::enumeration(["wood", "plastic", "paper", "all"])),
    )
    .with_parameter(
        ToolParameter::optional("min_thickness_mm", "Minimum sheet thickness in mm")
            .with_type(ParamType::number_range(0.0, 100.0)),
    )
    .with_parameter(
        ToolParameter::optional("max_thickness_mm", "Maximum sheet thickness in mm")
            .with_type(ParamType::number_range(0.0, 100.0)),
    )
}

pub fn materials_from_backend_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_MATERIALS_FROM_BACKEND,
        "Fetch the material list directly from the pricing backend",
    )
}

fn filter_from(args: &ValidatedArgs) -> MaterialFilter {
    let mut filter = MaterialFilter::default().with_thickness_range(
        args.get_f64("min_thickness_mm"),
        args.get_f64("max_thickness_mm"),
    );
    // "all" and absent both mean no category restriction
    if let Some(category) = args
        .get_str("category")
        .and_then(|c| c.parse::<MaterialCategory>().ok())
    {
        filter = filter.with_category(category);
    }
    filter
}

pub struct MaterialOptionsTool {
    catalog: Arc<dyn MaterialCatalog>,
}

impl MaterialOptionsTool {
    pub fn new(catalog: Arc<dyn MaterialCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolHandler for MaterialOptionsTool {
    fn definition(&self) -> ToolDefinition {
        material_options_definition()
    }

    async fn call(&self, args: &ValidatedArgs) -> Result<Value, HandlerError> {
        let source = self.catalog.source().to_string();
        let materials = self.catalog.list_materials().await.map_err(|e| {
            HandlerError::new(e.to_string()).with_detail(json!({ "catalog": source }))
        })?;

        let materials = filter_from(args).apply(materials);
        Ok(json!({
            "source": source,
            "count": materials.len(),
            "materials": to_payload(&materials)?,
        }))
    }
}

pub struct MaterialsFromBackendTool {
    client: PricingClient,
}

impl MaterialsFromBackendTool {
    pub fn new(client: PricingClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for MaterialsFromBackendTool {
    fn definition(&self) -> ToolDefinition {
        materials_from_backend_definition()
    }

    async fn call(&self, _args: &ValidatedArgs) -> Result<Value, HandlerError> {
        let listing = self.client.materials().await?;
        to_payload(&listing)
    }
}

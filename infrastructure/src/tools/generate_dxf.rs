//! generateDXFFromPrompt: text-to-DXF through the generative design service

use arkcutt_domain::quote::{BoundingDimensions, DesignMaterial, DesignRequest};
use arkcutt_domain::tool::{
    entities::{ParamType, ToolDefinition, ToolParameter},
    handler::{HandlerError, ToolHandler},
    names::GENERATE_DXF_FROM_PROMPT,
    validation::ValidatedArgs,
};
use async_trait::async_trait;
use serde_json::Value;

use super::to_payload;
use crate::services::DesignGeneratorClient;

/// Largest accepted dimension, in millimetres
const MAX_DIMENSION_MM: f64 = 3000.0;

pub fn generate_dxf_definition() -> ToolDefinition {
    let dimension = |name: &str, description: &str| {
        ToolParameter::optional(name, description)
            .with_type(ParamType::number_range(0.0, MAX_DIMENSION_MM))
    };

    ToolDefinition::new(
        GENERATE_DXF_FROM_PROMPT,
        "Generate a DXF file from a text description. Produces a design, not a quote.",
    )
    .with_parameter(
        ToolParameter::required("prompt", "Description of the object to create")
            .with_type(ParamType::string_len(3, 500)),
    )
    .with_parameter(dimension("width", "Width in millimetres"))
    .with_parameter(dimension("height", "Height in millimetres"))
    .with_parameter(dimension("depth", "Depth in millimetres"))
    .with_parameter(
        ToolParameter::optional("material", "Material type")
            .with_type(ParamType::enumeration(DesignMaterial::ALL)),
    )
    .with_parameter(
        ToolParameter::optional("use_ai_enhancement", "Let the service refine the prompt")
            .with_type(ParamType::Boolean)
            .with_default(true),
    )
}

pub fn design_request(args: &ValidatedArgs) -> DesignRequest {
    DesignRequest {
        prompt: args.get_str("prompt").unwrap_or_default().to_string(),
        use_ai_enhancement: args.get_bool("use_ai_enhancement").unwrap_or(true),
        dimensions: BoundingDimensions::from_parts(
            args.get_f64("width"),
            args.get_f64("height"),
            args.get_f64("depth"),
        ),
        material: args.get_str("material").and_then(|m| m.parse().ok()),
    }
}

pub struct GenerateDxfTool {
    client: DesignGeneratorClient,
}

impl GenerateDxfTool {
    pub fn new(client: DesignGeneratorClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GenerateDxfTool {
    fn definition(&self) -> ToolDefinition {
        generate_dxf_definition()
    }

    async fn call(&self, args: &ValidatedArgs) -> Result<Value, HandlerError> {
        let design = self.client.generate(&design_request(args)).await?;
        to_payload(&design)
    }
}

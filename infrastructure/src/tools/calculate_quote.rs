//! calculateQuote: price a cut through the pricing service
//!
//! The workflow guard keeps this tool unreachable until `analyzeDXF` has
//! succeeded in the same turn; the handler itself trusts its arguments.

use arkcutt_domain::quote::{ClientContact, Complexity, MaterialSelection, QuoteRequest};
use arkcutt_domain::tool::{
    entities::{ParamType, ToolDefinition, ToolParameter},
    handler::{HandlerError, ToolHandler},
    names::CALCULATE_QUOTE,
    validation::ValidatedArgs,
};
use async_trait::async_trait;
use serde_json::Value;

use super::to_payload;
use crate::services::PricingClient;

pub fn calculate_quote_definition() -> ToolDefinition {
    let text = |name: &str, description: &str| {
        ToolParameter::required(name, description).with_type(ParamType::non_empty_string())
    };

    ToolDefinition::new(
        CALCULATE_QUOTE,
        "Compute the full quote from the DXF analysis and the customer's data. \
         Only usable after analyzeDXF has succeeded.",
    )
    .with_parameter(text("client_name", "Customer's full name"))
    .with_parameter(
        ToolParameter::required("client_email", "Customer's e-mail").with_type(ParamType::Email),
    )
    .with_parameter(text("client_phone", "Customer's phone number"))
    .with_parameter(text("material_name", "Selected material"))
    .with_parameter(text("material_thickness", "Material thickness, e.g. 3mm"))
    .with_parameter(text("material_color", "Material color"))
    .with_parameter(
        ToolParameter::required("area_mm2", "Material area in mm², from analyzeDXF")
            .with_type(ParamType::positive_number()),
    )
    .with_parameter(
        ToolParameter::required("external_cut_m", "External cut length in metres, from analyzeDXF")
            .with_type(ParamType::number_min(0.0)),
    )
    .with_parameter(
        ToolParameter::optional("internal_cut_m", "Internal cut length in metres, from analyzeDXF")
            .with_type(ParamType::number_min(0.0))
            .with_default(0.0),
    )
    .with_parameter(
        ToolParameter::optional("total_entities", "Number of entities in the DXF")
            .with_type(ParamType::number_min(0.0)),
    )
    .with_parameter(
        ToolParameter::optional("complexity", "Complexity reported by analyzeDXF")
            .with_type(ParamType::enumeration(["low", "medium", "high"])),
    )
}

/// Assemble the pricing request from validated arguments.
pub fn quote_request(args: &ValidatedArgs) -> QuoteRequest {
    let text = |key: &str| args.get_str(key).unwrap_or_default().to_string();

    QuoteRequest {
        client: ClientContact {
            name: text("client_name"),
            email: text("client_email"),
            phone: text("client_phone"),
        },
        material: MaterialSelection {
            name: text("material_name"),
            thickness: text("material_thickness"),
            color: text("material_color"),
        },
        area_mm2: args.get_f64("area_mm2").unwrap_or_default(),
        external_cut_m: args.get_f64("external_cut_m").unwrap_or_default(),
        internal_cut_m: args.get_f64("internal_cut_m").unwrap_or_default(),
        total_entities: args.get_f64("total_entities").map(|n| n.round() as u64),
        complexity: args
            .get_str("complexity")
            .and_then(|c| c.parse::<Complexity>().ok()),
    }
}

pub struct CalculateQuoteTool {
    client: PricingClient,
}

impl CalculateQuoteTool {
    pub fn new(client: PricingClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for CalculateQuoteTool {
    fn definition(&self) -> ToolDefinition {
        calculate_quote_definition()
    }

    async fn call(&self, args: &ValidatedArgs) -> Result<Value, HandlerError> {
        let request = quote_request(args);
        let quote = self.client.calculate(&request).await?;
        tracing::info!(
            material = %request.material.name,
            total = quote.costs.total,
            "Quote calculated"
        );
        to_payload(&quote)
    }
}

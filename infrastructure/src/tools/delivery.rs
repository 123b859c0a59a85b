//! getDeliveryInfo: shipping options from the local delivery table

use arkcutt_domain::quote::{Urgency, standard_delivery_options};
use arkcutt_domain::tool::{
    entities::{ParamType, ToolDefinition, ToolParameter},
    handler::{HandlerError, ToolHandler},
    names::GET_DELIVERY_INFO,
    validation::ValidatedArgs,
};
use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use serde_json::{Value, json};

use super::to_payload;

pub fn delivery_info_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_DELIVERY_INFO,
        "Delivery options, costs and estimated delivery date",
    )
    .with_parameter(
        ToolParameter::optional("postal_code", "Destination postal code")
            .with_type(ParamType::string()),
    )
    .with_parameter(
        ToolParameter::optional("urgency", "How soon the order is needed")
            .with_type(ParamType::enumeration(Urgency::ALL))
            .with_default(Urgency::Normal.as_str()),
    )
}

/// Delivery tool; no collaborator call.
#[derive(Debug, Clone, Default)]
pub struct DeliveryInfoTool {
    /// Fixed "today" for deterministic estimates
    today: Option<NaiveDate>,
}

impl DeliveryInfoTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

#[async_trait]
impl ToolHandler for DeliveryInfoTool {
    fn definition(&self) -> ToolDefinition {
        delivery_info_definition()
    }

    async fn call(&self, args: &ValidatedArgs) -> Result<Value, HandlerError> {
        let urgency: Urgency = args
            .get_str("urgency")
            .and_then(|u| u.parse().ok())
            .unwrap_or_default();
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        let estimated = today
            .checked_add_days(Days::new(urgency.lead_days() as u64))
            .ok_or_else(|| HandlerError::new("estimated date out of range"))?;

        let mut payload = json!({
            "urgency": urgency,
            "options": to_payload(&standard_delivery_options())?,
            "estimated_date": estimated.format("%Y-%m-%d").to_string(),
        });
        if let Some(postal_code) = args.get_str("postal_code") {
            payload["postal_code"] = json!(postal_code);
        }
        Ok(payload)
    }
}

//! Quote assistant tools
//!
//! One file per tool, each exposing its `*_definition()` and a
//! [`ToolHandler`] that performs at most one collaborator call:
//!
//! | Tool | Handler | Collaborator |
//! |------|---------|--------------|
//! | `analyzeDXF` | [`AnalyzeDxfTool`] | file-analysis service |
//! | `calculateQuote` | [`CalculateQuoteTool`] | pricing service |
//! | `getMaterialOptions` | [`MaterialOptionsTool`] | injected catalog |
//! | `getMaterialsFromBackend` | [`MaterialsFromBackendTool`] | pricing service |
//! | `generateDXFFromPrompt` | [`GenerateDxfTool`] | generative design service |
//! | `getDeliveryInfo` | [`DeliveryInfoTool`] | none |

pub mod analyze_dxf;
pub mod calculate_quote;
pub mod delivery;
pub mod generate_dxf;
pub mod materials;

mod executor;
mod registry;
mod schema;

pub use analyze_dxf::AnalyzeDxfTool;
pub use calculate_quote::CalculateQuoteTool;
pub use delivery::DeliveryInfoTool;
pub use executor::{DEFAULT_TOOL_TIMEOUT, ToolInvoker};
pub use generate_dxf::GenerateDxfTool;
pub use materials::{MaterialOptionsTool, MaterialsFromBackendTool};
pub use registry::ToolRegistry;
pub use schema::JsonSchemaToolConverter;

use std::sync::Arc;
use std::time::Duration;

use arkcutt_application::ports::material_catalog::MaterialCatalog;
use arkcutt_domain::tool::entities::DuplicateToolError;
use arkcutt_domain::tool::handler::HandlerError;
use serde::Serialize;

use crate::catalog::{RemoteMaterialCatalog, StaticMaterialCatalog};
use crate::config::{CatalogSource, FileServicesConfig};
use crate::services::{
    DesignGeneratorClient, DxfAnalyzerClient, PricingClient, ServiceError, build_client,
};

/// Serialize a normalized result into a tool payload.
pub(crate) fn to_payload<T: Serialize>(value: &T) -> Result<serde_json::Value, HandlerError> {
    serde_json::to_value(value)
        .map_err(|e| HandlerError::new(format!("Cannot encode tool payload: {e}")))
}

/// Collaborator clients sharing one HTTP connection pool
#[derive(Debug, Clone)]
pub struct QuoteServices {
    pub analyzer: DxfAnalyzerClient,
    pub pricing: PricingClient,
    pub generator: DesignGeneratorClient,
}

impl QuoteServices {
    pub fn from_config(config: &FileServicesConfig) -> Result<Self, ServiceError> {
        let client = build_client(Duration::from_secs(config.timeout_seconds))?;
        Ok(Self {
            analyzer: DxfAnalyzerClient::new(client.clone(), &config.analyzer_url),
            pricing: PricingClient::new(client.clone(), &config.pricing_url),
            generator: DesignGeneratorClient::new(client, &config.generator_url),
        })
    }

    /// Catalog behind `getMaterialOptions`
    pub fn catalog(&self, source: CatalogSource) -> Arc<dyn MaterialCatalog> {
        match source {
            CatalogSource::Static => Arc::new(StaticMaterialCatalog::workshop()),
            CatalogSource::Remote => Arc::new(RemoteMaterialCatalog::new(self.pricing.clone())),
        }
    }
}

/// Registry with all six quote assistant tools.
pub fn quote_tool_registry(
    services: &QuoteServices,
    catalog: Arc<dyn MaterialCatalog>,
) -> Result<ToolRegistry, DuplicateToolError> {
    ToolRegistry::new()
        .with(Arc::new(AnalyzeDxfTool::new(services.analyzer.clone())))?
        .with(Arc::new(CalculateQuoteTool::new(services.pricing.clone())))?
        .with(Arc::new(MaterialOptionsTool::new(catalog)))?
        .with(Arc::new(MaterialsFromBackendTool::new(
            services.pricing.clone(),
        )))?
        .with(Arc::new(GenerateDxfTool::new(services.generator.clone())))?
        .with(Arc::new(DeliveryInfoTool::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkcutt_application::ports::tool_executor::ToolExecutorPort;
    use arkcutt_domain::tool::names;
    use arkcutt_domain::{ErrorKind, ToolCall};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_quote_registry_has_all_tools() {
        let services = QuoteServices::from_config(&FileServicesConfig::default()).unwrap();
        let catalog = services.catalog(CatalogSource::Static);
        let registry = quote_tool_registry(&services, catalog).unwrap();

        let expected = [
            names::ANALYZE_DXF,
            names::CALCULATE_QUOTE,
            names::GENERATE_DXF_FROM_PROMPT,
            names::GET_DELIVERY_INFO,
            names::GET_MATERIAL_OPTIONS,
            names::GET_MATERIALS_FROM_BACKEND,
        ];
        let actual: Vec<&str> = registry.spec().names().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_catalog_selection() {
        let services = QuoteServices::from_config(&FileServicesConfig::default()).unwrap();
        assert_eq!(services.catalog(CatalogSource::Static).source(), "static");
        assert_eq!(services.catalog(CatalogSource::Remote).source(), "remote");
    }

    #[tokio::test]
    async fn test_backend_materials_failure_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/materiales"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
            .expect(1)
            .mount(&server)
            .await;

        let config = FileServicesConfig {
            pricing_url: server.uri(),
            ..FileServicesConfig::default()
        };
        let services = QuoteServices::from_config(&config).unwrap();
        let catalog = services.catalog(CatalogSource::Static);
        let invoker = ToolInvoker::new(Arc::new(quote_tool_registry(&services, catalog).unwrap()));

        let result = invoker
            .execute(&ToolCall::new(names::GET_MATERIALS_FROM_BACKEND))
            .await;
        assert!(!result.success);
        assert_eq!(result.error_kind(), Some(ErrorKind::ExecutionFailure));

        // The invoker stays usable for the rest of the turn
        let delivery = invoker
            .execute(&ToolCall::new(names::GET_DELIVERY_INFO))
            .await;
        assert!(delivery.success);
    }
}

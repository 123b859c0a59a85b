//! analyzeDXF: upload a design file to the analysis service

use arkcutt_domain::tool::{
    entities::{ParamType, ToolDefinition, ToolParameter},
    handler::{HandlerError, ToolHandler},
    names::ANALYZE_DXF,
    validation::ValidatedArgs,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use super::to_payload;
use crate::services::DxfAnalyzerClient;

pub fn analyze_dxf_definition() -> ToolDefinition {
    ToolDefinition::new(
        ANALYZE_DXF,
        "Analyze a DXF file uploaded by the user: dimensions, bounding-box area, cut length \
         and complexity. Required before any quote.",
    )
    .with_parameter(
        ToolParameter::required("file_content", "DXF file content, base64 encoded")
            .with_type(ParamType::non_empty_string()),
    )
    .with_parameter(
        ToolParameter::required("filename", "Name of the DXF file")
            .with_type(ParamType::non_empty_string()),
    )
}

/// Decode the file argument.
///
/// Accepts plain base64, a `data:` URL, or raw DXF text.
pub fn decode_file_content(content: &str) -> Result<Vec<u8>, HandlerError> {
    if content.contains("SECTION") && content.contains('\n') {
        return Ok(content.as_bytes().to_vec());
    }

    let encoded = match content.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => content,
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    STANDARD.decode(compact.as_bytes()).map_err(|e| {
        HandlerError::new("file_content is not valid base64")
            .with_detail(serde_json::json!({ "reason": e.to_string() }))
    })
}

pub struct AnalyzeDxfTool {
    client: DxfAnalyzerClient,
}

impl AnalyzeDxfTool {
    pub fn new(client: DxfAnalyzerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for AnalyzeDxfTool {
    fn definition(&self) -> ToolDefinition {
        analyze_dxf_definition()
    }

    async fn call(&self, args: &ValidatedArgs) -> Result<Value, HandlerError> {
        let filename = args.get_str("filename").unwrap_or_default();
        let content = decode_file_content(args.get_str("file_content").unwrap_or_default())?;

        let analysis = self.client.analyze(filename, content).await?;
        tracing::info!(
            filename,
            area_mm2 = analysis.dimensions.area_mm2,
            cut_m = analysis.cut_length.total_m,
            complexity = %analysis.complexity,
            "Design analyzed"
        );
        to_payload(&analysis)
    }
}

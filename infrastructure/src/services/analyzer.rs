//! File-analysis service client (`POST /analyze-dxf`)

use arkcutt_domain::quote::{Complexity, CutLength, DesignDimensions, DxfAnalysis};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::http::{ServiceError, join_url, read_json};

const SERVICE: &str = "analyzer";
const DXF_MIME: &str = "application/dxf";

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    statistics: Option<Statistics>,
    bounding_box: Option<BoundingBox>,
    cut_length: Option<WireCutLength>,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(default)]
    total_entities: u64,
    #[serde(default)]
    valid_entities: u64,
    #[serde(default)]
    phantom_entities: u64,
    design_center: Option<serde_json::Value>,
    max_design_dimension: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct BoundingBox {
    width: f64,
    height: f64,
    area: f64,
}

#[derive(Debug, Deserialize)]
struct WireCutLength {
    total_mm: f64,
    total_m: f64,
    external_m: Option<f64>,
    internal_m: Option<f64>,
}

impl AnalyzeResponse {
    fn into_analysis(self, filename: &str) -> Result<DxfAnalysis, ServiceError> {
        if !self.success {
            return Err(ServiceError::Rejected {
                service: SERVICE,
                message: self
                    .error
                    .unwrap_or_else(|| "analysis unsuccessful".to_string()),
            });
        }

        let missing = |section: &str| ServiceError::InvalidResponse {
            service: SERVICE,
            message: format!("missing '{section}'"),
        };
        let stats = self.statistics.ok_or_else(|| missing("statistics"))?;
        let bbox = self.bounding_box.ok_or_else(|| missing("bounding_box"))?;
        let cut = self.cut_length.ok_or_else(|| missing("cut_length"))?;

        Ok(DxfAnalysis {
            filename: filename.to_string(),
            total_entities: stats.total_entities,
            valid_entities: stats.valid_entities,
            phantom_entities: stats.phantom_entities,
            design_center: stats.design_center,
            max_design_dimension: stats.max_design_dimension,
            dimensions: DesignDimensions::new(bbox.width, bbox.height, bbox.area),
            cut_length: CutLength::new(cut.total_mm, cut.total_m, cut.external_m, cut.internal_m),
            complexity: Complexity::classify(stats.total_entities, stats.phantom_entities),
        })
    }
}

/// Client for the DXF analysis collaborator
#[derive(Debug, Clone)]
pub struct DxfAnalyzerClient {
    client: reqwest::Client,
    base_url: String,
}

impl DxfAnalyzerClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Upload the file as multipart field `file` and normalize the analysis.
    pub async fn analyze(
        &self,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<DxfAnalysis, ServiceError> {
        let part = Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str(DXF_MIME)
            .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        let form = Form::new().part("file", part);

        tracing::debug!(filename, "Uploading design for analysis");
        let response = self
            .client
            .post(join_url(&self.base_url, "analyze-dxf"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let body: AnalyzeResponse = read_json(SERVICE, response).await?;
        body.into_analysis(filename)
    }
}

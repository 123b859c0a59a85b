//! Generative design service client (`POST /api/v1/generate`)

use arkcutt_domain::quote::{DesignRequest, GeneratedDesign};
use serde::Deserialize;

use super::http::{ServiceError, join_url, read_json};

const SERVICE: &str = "generator";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    success: bool,
    filename: Option<String>,
    download_url: Option<String>,
    metadata: Option<serde_json::Value>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DesignGeneratorClient {
    client: reqwest::Client,
    base_url: String,
}

impl DesignGeneratorClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn generate(&self, request: &DesignRequest) -> Result<GeneratedDesign, ServiceError> {
        let response = self
            .client
            .post(join_url(&self.base_url, "api/v1/generate"))
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let body: GenerateResponse = read_json(SERVICE, response).await?;
        if !body.success {
            return Err(ServiceError::Rejected {
                service: SERVICE,
                message: body
                    .message
                    .unwrap_or_else(|| "design generation unsuccessful".to_string()),
            });
        }

        Ok(GeneratedDesign {
            filename: body.filename,
            download_url: body.download_url,
            metadata: body.metadata,
            message: body.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkcutt_domain::quote::{BoundingDimensions, DesignMaterial};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_sends_only_given_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/generate"))
            .and(body_json(json!({
                "prompt": "a 10cm square coaster",
                "use_ai_enhancement": true,
                "dimensions": {"width": 100.0},
                "material": "wood"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "filename": "coaster.dxf",
                "download_url": "https://example.com/coaster.dxf",
                "message": "Generated"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DesignGeneratorClient::new(reqwest::Client::new(), server.uri());
        let design = client
            .generate(&DesignRequest {
                prompt: "a 10cm square coaster".to_string(),
                use_ai_enhancement: true,
                dimensions: BoundingDimensions::from_parts(Some(100.0), Some(0.0), None),
                material: Some(DesignMaterial::Wood),
            })
            .await
            .unwrap();

        assert_eq!(design.filename.as_deref(), Some("coaster.dxf"));
        assert!(design.metadata.is_none());
    }

    #[tokio::test]
    async fn test_unsuccessful_generation_uses_service_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "prompt not understood"
            })))
            .mount(&server)
            .await;

        let client = DesignGeneratorClient::new(reqwest::Client::new(), server.uri());
        let err = client
            .generate(&DesignRequest {
                prompt: "???".to_string(),
                use_ai_enhancement: false,
                dimensions: None,
                material: None,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("prompt not understood"));
    }
}

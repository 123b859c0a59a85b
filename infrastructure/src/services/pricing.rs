//! Pricing service client (`POST /calculate`, `GET /materiales`)
//!
//! The order body keeps the field names the pricing service expects; they
//! are built here and nowhere else.

use arkcutt_domain::quote::{CostBreakdown, QuoteBreakdown, QuoteInputs, QuoteRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::http::{ServiceError, join_url, read_json};

const SERVICE: &str = "pricing";

#[derive(Debug, Deserialize)]
struct CalculateResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    data: Option<CalculateData>,
}

#[derive(Debug, Deserialize)]
struct CalculateData {
    material: Option<Value>,
    tiempo_corte_minutos: Option<f64>,
    coste_corte: f64,
    coste_material: f64,
    subtotal: f64,
    margen_beneficio: f64,
    total: f64,
    parametros_corte: Option<Value>,
    layers: Option<Value>,
    frontend_info: Option<Value>,
}

/// Raw material listing as returned by `GET /materiales`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialsListing {
    #[serde(default)]
    pub materiales: Value,
    #[serde(default)]
    pub detalle: Value,
    #[serde(default)]
    pub total: Value,
}

/// Order body in the pricing service's schema.
pub fn order_body(request: &QuoteRequest) -> Value {
    let layers: Vec<Value> = request
        .layers()
        .into_iter()
        .map(|layer| json!({"nombre": layer.name, "longitud_m": layer.length_m}))
        .collect();

    json!({
        "Cliente": {
            "Nombre y Apellidos": request.client.name,
            "Mail": request.client.email,
            "Número de Teléfono": request.client.phone,
        },
        "Pedido": {
            "Material seleccionado": request.material.name,
            "Area material": format!("{} mm²", request.area_mm2),
            "¿Quién proporciona el material?": {
                "Material seleccionado": request.material.name,
                "Grosor": request.material.thickness,
                "Color": request.material.color,
            },
            "Capas": layers,
            "dxf_analysis": {
                "total_entities": request.total_entities,
                "complexity": request.complexity.map(|c| c.wire_label()),
                "area_mm2": request.area_mm2,
            },
        },
    })
}

#[derive(Debug, Clone)]
pub struct PricingClient {
    client: reqwest::Client,
    base_url: String,
}

impl PricingClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn calculate(&self, request: &QuoteRequest) -> Result<QuoteBreakdown, ServiceError> {
        let response = self
            .client
            .post(join_url(&self.base_url, "calculate"))
            .json(&order_body(request))
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let body: CalculateResponse = read_json(SERVICE, response).await?;
        if !body.success {
            return Err(ServiceError::Rejected {
                service: SERVICE,
                message: body
                    .error
                    .unwrap_or_else(|| "quote calculation unsuccessful".to_string()),
            });
        }
        let data = body.data.ok_or_else(|| ServiceError::InvalidResponse {
            service: SERVICE,
            message: "missing 'data'".to_string(),
        })?;

        Ok(QuoteBreakdown {
            material: data.material,
            cutting_time_minutes: data.tiempo_corte_minutos,
            costs: CostBreakdown {
                cutting: data.coste_corte,
                material: data.coste_material,
                subtotal: data.subtotal,
                margin: data.margen_beneficio,
                total: data.total,
            },
            cutting_parameters: data.parametros_corte,
            layers: data.layers,
            frontend_info: data.frontend_info,
            inputs: QuoteInputs::from(request),
        })
    }

    pub async fn materials(&self) -> Result<MaterialsListing, ServiceError> {
        let response = self
            .client
            .get(join_url(&self.base_url, "materiales"))
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        read_json(SERVICE, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkcutt_domain::quote::{ClientContact, Complexity, MaterialSelection};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(internal: f64) -> QuoteRequest {
        QuoteRequest {
            client: ClientContact {
                name: "Ana García".to_string(),
                email: "ana@example.com".to_string(),
                phone: "600123123".to_string(),
            },
            material: MaterialSelection {
                name: "DM".to_string(),
                thickness: "3mm".to_string(),
                color: "Natural".to_string(),
            },
            area_mm2: 12000.0,
            external_cut_m: 2.4,
            internal_cut_m: internal,
            total_entities: Some(12),
            complexity: Some(Complexity::Low),
        }
    }

    #[test]
    fn test_order_body_shape() {
        let body = order_body(&request(0.0));
        assert_eq!(body["Cliente"]["Mail"], "ana@example.com");
        assert_eq!(body["Pedido"]["Area material"], "12000 mm²");
        assert_eq!(body["Pedido"]["Capas"].as_array().unwrap().len(), 1);
        assert_eq!(body["Pedido"]["Capas"][0]["nombre"], "Cortes exterior");
        assert_eq!(body["Pedido"]["dxf_analysis"]["complexity"], "baja");
        assert_eq!(
            body["Pedido"]["¿Quién proporciona el material?"]["Grosor"],
            "3mm"
        );
    }

    #[test]
    fn test_order_body_internal_layer() {
        let body = order_body(&request(0.8));
        let layers = body["Pedido"]["Capas"].as_array().unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1]["nombre"], "Cortes interior");
        assert_eq!(layers[1]["longitud_m"], 0.8);
    }

    #[tokio::test]
    async fn test_calculate_flattens_costs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calculate"))
            .and(body_partial_json(json!({"Pedido": {"Material seleccionado": "DM"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "material": {"nombre": "DM"},
                    "tiempo_corte_minutos": 4.5,
                    "coste_corte": 6.0,
                    "coste_material": 0.96,
                    "subtotal": 6.96,
                    "margen_beneficio": 2.09,
                    "total": 9.05,
                    "layers": [{"nombre": "Cortes exterior"}]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PricingClient::new(reqwest::Client::new(), server.uri());
        let quote = client.calculate(&request(0.0)).await.unwrap();

        assert_eq!(quote.costs.total, 9.05);
        assert_eq!(quote.costs.margin, 2.09);
        assert_eq!(quote.cutting_time_minutes, Some(4.5));
        assert_eq!(quote.inputs.area_mm2, 12000.0);
        assert!(quote.frontend_info.is_none());
    }

    #[tokio::test]
    async fn test_calculate_unsuccessful() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calculate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let client = PricingClient::new(reqwest::Client::new(), server.uri());
        let err = client.calculate(&request(0.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_materials_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/materiales"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "materiales": ["DM", "METACRILATO"],
                "total": 2
            })))
            .mount(&server)
            .await;

        let client = PricingClient::new(reqwest::Client::new(), server.uri());
        let listing = client.materials().await.unwrap();
        assert_eq!(listing.total, json!(2));
        assert!(listing.detalle.is_null());
    }
}

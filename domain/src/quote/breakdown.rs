//! Quote requests and itemised quote results

use serde::{Deserialize, Serialize};

use super::analysis::Complexity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Material chosen by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSelection {
    pub name: String,
    /// Free text as given by the user, e.g. "3mm"
    pub thickness: String,
    pub color: String,
}

/// One cutting layer sent to the pricing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutLayer {
    pub name: String,
    pub length_m: f64,
}

/// Everything the pricing service needs, assembled once per call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub client: ClientContact,
    pub material: MaterialSelection,
    pub area_mm2: f64,
    pub external_cut_m: f64,
    pub internal_cut_m: f64,
    pub total_entities: Option<u64>,
    pub complexity: Option<Complexity>,
}

impl QuoteRequest {
    pub const EXTERNAL_LAYER: &'static str = "Cortes exterior";
    pub const INTERNAL_LAYER: &'static str = "Cortes interior";

    /// External cuts always form a layer; internal cuts only when non-zero.
    pub fn layers(&self) -> Vec<CutLayer> {
        let mut layers = vec![CutLayer {
            name: Self::EXTERNAL_LAYER.to_string(),
            length_m: self.external_cut_m,
        }];
        if self.internal_cut_m > 0.0 {
            layers.push(CutLayer {
                name: Self::INTERNAL_LAYER.to_string(),
                length_m: self.internal_cut_m,
            });
        }
        layers
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub cutting: f64,
    pub material: f64,
    pub subtotal: f64,
    pub margin: f64,
    pub total: f64,
}

/// Figures from the analysis that the quote was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInputs {
    pub area_mm2: f64,
    pub external_cut_m: f64,
    pub internal_cut_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_entities: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
}

impl From<&QuoteRequest> for QuoteInputs {
    fn from(req: &QuoteRequest) -> Self {
        Self {
            area_mm2: req.area_mm2,
            external_cut_m: req.external_cut_m,
            internal_cut_m: req.internal_cut_m,
            total_entities: req.total_entities,
            complexity: req.complexity,
        }
    }
}

/// Normalized pricing result
///
/// Opaque collaborator sections (`material`, `cutting_parameters`,
/// `layers`, `frontend_info`) are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<serde_json::Value>,
    pub cutting_time_minutes: Option<f64>,
    pub costs: CostBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutting_parameters: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend_info: Option<serde_json::Value>,
    pub inputs: QuoteInputs,
}

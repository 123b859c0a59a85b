//! Generated design requests and results

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::DomainError;

/// Material hint for the generative design service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignMaterial {
    Wood,
    Acrylic,
    Mdf,
    Cardboard,
    Metal,
    Paper,
}

impl DesignMaterial {
    pub const ALL: [&'static str; 6] = ["wood", "acrylic", "mdf", "cardboard", "metal", "paper"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DesignMaterial::Wood => "wood",
            DesignMaterial::Acrylic => "acrylic",
            DesignMaterial::Mdf => "mdf",
            DesignMaterial::Cardboard => "cardboard",
            DesignMaterial::Metal => "metal",
            DesignMaterial::Paper => "paper",
        }
    }
}

impl FromStr for DesignMaterial {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wood" => Ok(DesignMaterial::Wood),
            "acrylic" => Ok(DesignMaterial::Acrylic),
            "mdf" => Ok(DesignMaterial::Mdf),
            "cardboard" => Ok(DesignMaterial::Cardboard),
            "metal" => Ok(DesignMaterial::Metal),
            "paper" => Ok(DesignMaterial::Paper),
            other => Err(DomainError::invalid_enum("material", other, &Self::ALL)),
        }
    }
}

/// Optional bounding dimensions in millimetres
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingDimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

impl BoundingDimensions {
    /// Zero counts as unspecified. Returns `None` when nothing is left.
    pub fn from_parts(width: Option<f64>, height: Option<f64>, depth: Option<f64>) -> Option<Self> {
        let keep = |v: Option<f64>| v.filter(|&x| x > 0.0);
        let dims = Self {
            width: keep(width),
            height: keep(height),
            depth: keep(depth),
        };
        (dims.width.is_some() || dims.height.is_some() || dims.depth.is_some()).then_some(dims)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRequest {
    pub prompt: String,
    pub use_ai_enhancement: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<BoundingDimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<DesignMaterial>,
}

/// Reference to a generated DXF file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDesign {
    pub filename: Option<String>,
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

//! Normalized result of a DXF file analysis

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::DomainError;

/// Cutting complexity of a design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// Entity count above which a design is considered `Medium`.
    pub const MEDIUM_ENTITY_THRESHOLD: u64 = 100;

    /// Phantom entities force `High`; otherwise large designs are `Medium`.
    pub fn classify(total_entities: u64, phantom_entities: u64) -> Self {
        if phantom_entities > 0 {
            Complexity::High
        } else if total_entities > Self::MEDIUM_ENTITY_THRESHOLD {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }

    /// Label understood by the pricing service
    pub fn wire_label(&self) -> &'static str {
        match self {
            Complexity::Low => "baja",
            Complexity::Medium => "media",
            Complexity::High => "alta",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baja" => Ok(Complexity::Low),
            "medium" | "media" => Ok(Complexity::Medium),
            "high" | "alta" => Ok(Complexity::High),
            other => Err(DomainError::invalid_enum(
                "complexity",
                other,
                &["low", "medium", "high"],
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDimensions {
    pub width: f64,
    pub height: f64,
    pub area_mm2: f64,
    pub area_cm2: f64,
}

impl DesignDimensions {
    pub fn new(width: f64, height: f64, area_mm2: f64) -> Self {
        Self {
            width,
            height,
            area_mm2,
            area_cm2: area_mm2 / 100.0,
        }
    }
}

/// Cut lengths; `external_m` and `internal_m` feed the pricing layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutLength {
    pub total_mm: f64,
    pub total_m: f64,
    pub external_m: f64,
    pub internal_m: f64,
}

impl CutLength {
    /// Without an external/internal split, the whole length counts as external.
    pub fn new(total_mm: f64, total_m: f64, external_m: Option<f64>, internal_m: Option<f64>) -> Self {
        Self {
            total_mm,
            total_m,
            external_m: external_m.unwrap_or(total_m),
            internal_m: internal_m.unwrap_or(0.0),
        }
    }
}

/// Analysis figures used by the quote workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DxfAnalysis {
    pub filename: String,
    pub total_entities: u64,
    pub valid_entities: u64,
    pub phantom_entities: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_center: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_design_dimension: Option<f64>,
    pub dimensions: DesignDimensions,
    pub cut_length: CutLength,
    pub complexity: Complexity,
}

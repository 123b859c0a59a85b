//! Delivery options

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Normal,
    Express,
    Urgent,
}

impl Urgency {
    pub const ALL: [&'static str; 3] = ["normal", "express", "urgent"];

    /// Days until the estimated delivery date.
    ///
    /// No faster service exists than express, so urgent orders ship express.
    pub fn lead_days(&self) -> i64 {
        match self {
            Urgency::Normal => 5,
            Urgency::Express | Urgency::Urgent => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Express => "express",
            Urgency::Urgent => "urgent",
        }
    }
}

impl FromStr for Urgency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Urgency::Normal),
            "express" => Ok(Urgency::Express),
            "urgent" | "urgente" => Ok(Urgency::Urgent),
            other => Err(DomainError::invalid_enum("urgency", other, &Self::ALL)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOption {
    #[serde(rename = "type")]
    pub kind: String,
    pub min_days: u32,
    pub max_days: u32,
    pub cost_eur: f64,
    pub description: String,
}

/// Shipping table offered to every customer.
pub fn standard_delivery_options() -> Vec<DeliveryOption> {
    vec![
        DeliveryOption {
            kind: "normal".to_string(),
            min_days: 3,
            max_days: 5,
            cost_eur: 5.99,
            description: "Standard delivery".to_string(),
        },
        DeliveryOption {
            kind: "express".to_string(),
            min_days: 1,
            max_days: 2,
            cost_eur: 12.99,
            description: "Express delivery".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_days() {
        assert_eq!(Urgency::Normal.lead_days(), 5);
        assert_eq!(Urgency::Express.lead_days(), 2);
        assert_eq!(Urgency::Urgent.lead_days(), 2);
    }

    #[test]
    fn test_parse_urgency() {
        assert_eq!("urgente".parse::<Urgency>().unwrap(), Urgency::Urgent);
        assert_eq!(Urgency::default(), Urgency::Normal);
        assert!("tomorrow".parse::<Urgency>().is_err());
    }

    #[test]
    fn test_standard_options() {
        let options = standard_delivery_options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].cost_eur, 5.99);
        assert_eq!(options[1].kind, "express");
    }
}

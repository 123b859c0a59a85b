//! Material catalog entries and filtering

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    Wood,
    Plastic,
    Paper,
}

impl MaterialCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::Wood => "wood",
            MaterialCategory::Plastic => "plastic",
            MaterialCategory::Paper => "paper",
        }
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialCategory {
    type Err = DomainError;

    /// Accepts English names and the catalog service's Spanish ones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wood" | "madera" => Ok(MaterialCategory::Wood),
            "plastic" | "plastico" | "plástico" => Ok(MaterialCategory::Plastic),
            "paper" | "papel" => Ok(MaterialCategory::Paper),
            other => Err(DomainError::invalid_enum(
                "category",
                other,
                &["wood", "plastic", "paper"],
            )),
        }
    }
}

/// A material that can be cut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: Option<u64>,
    pub name: String,
    pub category: Option<MaterialCategory>,
    /// Available sheet thicknesses in millimetres
    pub thicknesses_mm: Vec<f64>,
    pub color: Option<String>,
    /// Unit price in EUR per cm²
    pub price_per_cm2: Option<f64>,
    pub stock: Option<i64>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: None,
            thicknesses_mm: Vec::new(),
            color: None,
            price_per_cm2: None,
            stock: None,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_category(mut self, category: MaterialCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_thickness(mut self, mm: f64) -> Self {
        self.thicknesses_mm.push(mm);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_price_per_cm2(mut self, price: f64) -> Self {
        self.price_per_cm2 = Some(price);
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }
}

/// Local filter over catalog entries. Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialFilter {
    pub category: Option<MaterialCategory>,
    pub min_thickness_mm: Option<f64>,
    pub max_thickness_mm: Option<f64>,
}

impl MaterialFilter {
    pub fn with_category(mut self, category: MaterialCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_thickness_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_thickness_mm = min;
        self.max_thickness_mm = max;
        self
    }

    /// A material passes the thickness bounds if any of its sheets does.
    /// Materials without known thicknesses only pass an unbounded filter.
    pub fn matches(&self, material: &Material) -> bool {
        if self.category.is_some() && material.category != self.category {
            return false;
        }

        if self.min_thickness_mm.is_none() && self.max_thickness_mm.is_none() {
            return true;
        }

        material.thicknesses_mm.iter().any(|&t| {
            self.min_thickness_mm.is_none_or(|min| t >= min)
                && self.max_thickness_mm.is_none_or(|max| t <= max)
        })
    }

    pub fn apply(&self, materials: Vec<Material>) -> Vec<Material> {
        materials.into_iter().filter(|m| self.matches(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Material> {
        vec![
            Material::new("DM")
                .with_category(MaterialCategory::Wood)
                .with_thickness(2.5),
            Material::new("METACRILATO")
                .with_category(MaterialCategory::Plastic)
                .with_thickness(2.0)
                .with_thickness(5.0),
            Material::new("UNKNOWN"),
        ]
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "madera".parse::<MaterialCategory>().unwrap(),
            MaterialCategory::Wood
        );
        assert_eq!(
            "Plastic".parse::<MaterialCategory>().unwrap(),
            MaterialCategory::Plastic
        );
        assert!("metal".parse::<MaterialCategory>().is_err());
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert_eq!(MaterialFilter::default().apply(catalog()).len(), 3);
    }

    #[test]
    fn test_filter_by_category() {
        let out = MaterialFilter::default()
            .with_category(MaterialCategory::Plastic)
            .apply(catalog());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "METACRILATO");
    }

    #[test]
    fn test_filter_by_thickness_uses_any_sheet() {
        let out = MaterialFilter::default()
            .with_thickness_range(Some(4.0), None)
            .apply(catalog());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "METACRILATO");

        let out = MaterialFilter::default()
            .with_thickness_range(None, Some(2.5))
            .apply(catalog());
        let names: Vec<&str> = out.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["DM", "METACRILATO"]);
    }
}

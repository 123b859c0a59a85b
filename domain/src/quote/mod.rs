//! Laser-cutting quote domain: analysis figures, materials, pricing,
//! generated designs and delivery.

pub mod analysis;
pub mod breakdown;
pub mod delivery;
pub mod design;
pub mod material;

pub use analysis::{Complexity, CutLength, DesignDimensions, DxfAnalysis};
pub use breakdown::{
    ClientContact, CostBreakdown, CutLayer, MaterialSelection, QuoteBreakdown, QuoteInputs,
    QuoteRequest,
};
pub use delivery::{DeliveryOption, Urgency, standard_delivery_options};
pub use design::{BoundingDimensions, DesignMaterial, DesignRequest, GeneratedDesign};
pub use material::{Material, MaterialCategory, MaterialFilter};

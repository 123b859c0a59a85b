//! HTTP clients for the collaborator services.
//!
//! Each client performs exactly one request per call and never retries.

pub mod analyzer;
pub mod generator;
pub mod http;
pub mod pricing;

pub use analyzer::DxfAnalyzerClient;
pub use generator::DesignGeneratorClient;
pub use http::{ServiceError, build_client};
pub use pricing::{MaterialsListing, PricingClient, order_body};

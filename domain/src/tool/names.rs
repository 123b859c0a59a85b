//! Names of the tools exposed to the assistant

pub const ANALYZE_DXF: &str = "analyzeDXF";
pub const CALCULATE_QUOTE: &str = "calculateQuote";
pub const GET_MATERIAL_OPTIONS: &str = "getMaterialOptions";
pub const GET_MATERIALS_FROM_BACKEND: &str = "getMaterialsFromBackend";
pub const GENERATE_DXF_FROM_PROMPT: &str = "generateDXFFromPrompt";
pub const GET_DELIVERY_INFO: &str = "getDeliveryInfo";

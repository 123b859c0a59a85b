//! System prompt for the quote assistant

use crate::tool::entities::ToolSpec;

/// Templates for the assistant's system prompt
pub struct AssistantPromptTemplate;

impl AssistantPromptTemplate {
    /// Fixed system prompt describing the quote workflow.
    pub fn system() -> &'static str {
        r#"You are the assistant of ArkCutt, a company specialised in precision laser-cutting services.
Reply in the user's language (Spanish by default).

YOUR MISSION:
- Answer general questions about laser cutting and materials
- Produce COMPLETE quotes for laser-cutting projects
- Help create DXF files from natural-language descriptions

GROUND RULE FOR QUOTES:
- Every quote REQUIRES an uploaded DXF file. No DXF, no quote.
- The DXF analysis provides the critical figures: area, cut length, complexity.
- Never invent or estimate these figures yourself.

QUOTE WORKFLOW:
1. The user uploads a DXF file: call analyzeDXF with its base64 content and file name.
2. Show the analysis results (area, dimensions, cut length).
3. Look up available materials with getMaterialsFromBackend or getMaterialOptions.
4. Ask the user for material, thickness and colour plus contact details (name, e-mail, phone).
5. Call calculateQuote with the analysis figures and the user's selection.
6. Present the full, itemised quote.

OTHER FLOWS:
- The user describes an object: call generateDXFFromPrompt (this produces a DXF, not a quote).
- General questions: answer directly without tools.
- Material questions: getMaterialsFromBackend.
- Delivery questions: getDeliveryInfo.

If a tool result reports PreconditionNotMet, do what it asks before retrying.
If it reports ValidationError, fix the arguments. If it reports ExecutionFailure,
explain the problem to the user and offer an alternative.

PERSONALITY: professional but friendly, technically precise, clear about
requirements, patient when explaining the process step by step."#
    }

    /// System prompt followed by a summary of the registered tools.
    pub fn system_with_tools(tool_spec: &ToolSpec) -> String {
        let tools = tool_spec
            .all()
            .map(|t| {
                let required: Vec<&str> = t
                    .parameters
                    .iter()
                    .filter(|p| p.required)
                    .map(|p| p.name.as_str())
                    .collect();
                if required.is_empty() {
                    format!("- {}: {}", t.name, t.description)
                } else {
                    format!(
                        "- {}: {} (required: {})",
                        t.name,
                        t.description,
                        required.join(", ")
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!("{}\n\nAVAILABLE TOOLS:\n{}", Self::system(), tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolDefinition, ToolParameter};

    #[test]
    fn test_system_prompt_mentions_workflow() {
        let prompt = AssistantPromptTemplate::system();
        assert!(prompt.contains("analyzeDXF"));
        assert!(prompt.contains("calculateQuote"));
        assert!(prompt.contains("PreconditionNotMet"));
    }

    #[test]
    fn test_system_with_tools_lists_required_params() {
        let mut spec = ToolSpec::new();
        spec.register(
            ToolDefinition::new("analyzeDXF", "Analyze a DXF file")
                .with_parameter(ToolParameter::required("file_content", "base64"))
                .with_parameter(ToolParameter::required("filename", "name")),
        )
        .unwrap();
        spec.register(ToolDefinition::new("getMaterialsFromBackend", "List materials"))
            .unwrap();

        let prompt = AssistantPromptTemplate::system_with_tools(&spec);
        assert!(prompt.contains("- analyzeDXF: Analyze a DXF file (required: file_content, filename)"));
        assert!(prompt.contains("- getMaterialsFromBackend: List materials"));
    }
}

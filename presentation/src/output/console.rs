//! Console output formatter

use arkcutt_application::RunTurnOutput;
use arkcutt_domain::quote::{DxfAnalysis, GeneratedDesign, QuoteBreakdown};
use arkcutt_domain::tool::names;
use arkcutt_domain::{History, TerminationReason};
use colored::Colorize;
use serde::de::DeserializeOwned;

/// What the turn produced for the customer, read back from the history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSummary {
    pub analysis: Option<DxfAnalysis>,
    pub quote: Option<QuoteBreakdown>,
    pub estimated_delivery: Option<String>,
    pub design: Option<GeneratedDesign>,
}

impl QuoteSummary {
    /// Latest successful result of each relevant tool; `None` when the turn
    /// produced nothing worth summarizing.
    pub fn from_history(history: &History) -> Option<Self> {
        let summary = Self {
            analysis: Self::payload(history, names::ANALYZE_DXF),
            quote: Self::payload(history, names::CALCULATE_QUOTE),
            estimated_delivery: history
                .last_success(names::GET_DELIVERY_INFO)
                .and_then(|r| r.payload.as_ref())
                .and_then(|p| p.get("estimated_date"))
                .and_then(|d| d.as_str())
                .map(str::to_string),
            design: Self::payload(history, names::GENERATE_DXF_FROM_PROMPT),
        };
        (summary != Self::default()).then_some(summary)
    }

    fn payload<T: DeserializeOwned>(history: &History, tool_name: &str) -> Option<T> {
        history
            .last_success(tool_name)
            .and_then(|r| r.payload.clone())
            .and_then(|p| serde_json::from_value(p).ok())
    }
}

/// Formats turn results for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Reply, quote summary and tool activity
    pub fn format(output: &RunTurnOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::format_reply(output));

        if let Some(summary) = QuoteSummary::from_history(&output.history) {
            out.push_str(&Self::format_summary(&summary));
        }

        if !output.history.is_empty() {
            out.push_str(&Self::section_header("Tools"));
            for entry in output.history.entries() {
                let mark = if entry.result.success {
                    "v".green()
                } else {
                    "x".red()
                };
                let mut line = format!(
                    "  {} [{}] {}",
                    mark, entry.step, entry.request.tool_name
                );
                if let Some(error) = &entry.result.error {
                    line.push_str(&format!(" ({}: {})", error.kind, error.message).dimmed().to_string());
                }
                out.push_str(&line);
                out.push('\n');
            }
        }

        out.push_str(&format!(
            "\n{}\n",
            Self::termination_line(output.steps, &output.termination).dimmed()
        ));
        out
    }

    /// Assistant text only
    pub fn format_reply(output: &RunTurnOutput) -> String {
        if output.text.is_empty() {
            format!("{}\n", "(no reply)".dimmed())
        } else {
            format!("{}\n", output.text)
        }
    }

    /// Format as JSON
    pub fn format_json(output: &RunTurnOutput) -> String {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_summary(summary: &QuoteSummary) -> String {
        let mut out = String::new();

        if let Some(analysis) = &summary.analysis {
            out.push_str(&Self::section_header("Design"));
            out.push_str(&format!(
                "  {} {}\n  {} {:.1} x {:.1} mm ({:.0} mm²)\n  {} {:.2} m ({} complexity)\n",
                "File:".bold(),
                analysis.filename,
                "Size:".bold(),
                analysis.dimensions.width,
                analysis.dimensions.height,
                analysis.dimensions.area_mm2,
                "Cut:".bold(),
                analysis.cut_length.total_m,
                analysis.complexity,
            ));
        }

        if let Some(quote) = &summary.quote {
            out.push_str(&Self::section_header("Quote"));
            let costs = &quote.costs;
            out.push_str(&format!("  Cutting:   {:>10.2} €\n", costs.cutting));
            out.push_str(&format!("  Material:  {:>10.2} €\n", costs.material));
            out.push_str(&format!("  Subtotal:  {:>10.2} €\n", costs.subtotal));
            out.push_str(&format!("  Margin:    {:>10.2} €\n", costs.margin));
            out.push_str(&format!(
                "  {}\n",
                format!("Total:     {:>10.2} €", costs.total).green().bold()
            ));
            if let Some(minutes) = quote.cutting_time_minutes {
                out.push_str(&format!("  Cutting time: {:.1} min\n", minutes));
            }
        }

        if let Some(date) = &summary.estimated_delivery {
            out.push_str(&format!("\n{} {}\n", "Estimated delivery:".cyan().bold(), date));
        }

        if let Some(design) = &summary.design {
            out.push_str(&Self::section_header("Generated design"));
            if let Some(filename) = &design.filename {
                out.push_str(&format!("  {} {}\n", "File:".bold(), filename));
            }
            if let Some(url) = &design.download_url {
                out.push_str(&format!("  {} {}\n", "Download:".bold(), url));
            }
        }

        out
    }

    fn termination_line(steps: usize, reason: &TerminationReason) -> String {
        let reason = match reason {
            TerminationReason::TextResponse => "model replied".to_string(),
            TerminationReason::StopPolicy { policy } => format!("stopped by {}", policy),
            TerminationReason::StepCeiling => "step ceiling reached".to_string(),
        };
        format!("{} step(s), {}", steps, reason)
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkcutt_domain::{ErrorKind, ToolCall, ToolError, ToolResult};
    use serde_json::json;

    fn analysis_payload() -> serde_json::Value {
        json!({
            "filename": "box.dxf",
            "total_entities": 12,
            "valid_entities": 12,
            "phantom_entities": 0,
            "dimensions": {"width": 120.0, "height": 100.0, "area_mm2": 12000.0, "area_cm2": 120.0},
            "cut_length": {"total_mm": 2400.0, "total_m": 2.4, "external_m": 2.4, "internal_m": 0.0},
            "complexity": "low"
        })
    }

    fn quote_payload() -> serde_json::Value {
        json!({
            "cutting_time_minutes": 3.5,
            "costs": {"cutting": 4.2, "material": 1.8, "subtotal": 6.0, "margin": 1.2, "total": 7.2},
            "inputs": {"area_mm2": 12000.0, "external_cut_m": 2.4, "internal_cut_m": 0.0}
        })
    }

    fn output(history: History) -> RunTurnOutput {
        RunTurnOutput {
            text: "Tu presupuesto es de 7,20 €.".to_string(),
            history,
            steps: 2,
            termination: TerminationReason::StopPolicy {
                policy: "quote_success".to_string(),
            },
        }
    }

    #[test]
    fn test_summary_from_history() {
        let mut history = History::new();
        history.append(
            1,
            ToolCall::new(names::ANALYZE_DXF),
            ToolResult::success(names::ANALYZE_DXF, analysis_payload()),
        );
        history.append(
            2,
            ToolCall::new(names::CALCULATE_QUOTE),
            ToolResult::success(names::CALCULATE_QUOTE, quote_payload()),
        );

        let summary = QuoteSummary::from_history(&history).unwrap();
        assert_eq!(summary.analysis.unwrap().filename, "box.dxf");
        assert_eq!(summary.quote.unwrap().costs.total, 7.2);
        assert!(summary.estimated_delivery.is_none());
        assert!(summary.design.is_none());
    }

    #[test]
    fn test_no_summary_for_failures_only() {
        let mut history = History::new();
        history.append(
            1,
            ToolCall::new(names::CALCULATE_QUOTE),
            ToolResult::failure(
                names::CALCULATE_QUOTE,
                ToolError::new(ErrorKind::PreconditionNotMet, "analyze the file first"),
            ),
        );
        assert!(QuoteSummary::from_history(&history).is_none());
    }

    #[test]
    fn test_format_lists_tools_and_total() {
        let mut history = History::new();
        history.append(
            1,
            ToolCall::new(names::ANALYZE_DXF),
            ToolResult::success(names::ANALYZE_DXF, analysis_payload()),
        );
        history.append(
            2,
            ToolCall::new(names::CALCULATE_QUOTE),
            ToolResult::success(names::CALCULATE_QUOTE, quote_payload()),
        );

        let text = ConsoleFormatter::format(&output(history));
        assert!(text.starts_with("Tu presupuesto es de 7,20 €."));
        assert!(text.contains("7.20 €"));
        assert!(text.contains(names::ANALYZE_DXF));
        assert!(text.contains("stopped by quote_success"));
    }

    #[test]
    fn test_format_json_round_trips() {
        let json = ConsoleFormatter::format_json(&output(History::new()));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["steps"], 2);
        assert_eq!(value["termination"]["reason"], "stop_policy");
    }
}

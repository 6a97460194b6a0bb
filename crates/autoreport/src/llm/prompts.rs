//! Prompt templates for the report narrative.

use serde::{Deserialize, Serialize};

/// Marker between the analytical directives and the role description.
pub const DIRECTIVES_END: &str = "--- END OF ANALYTICAL DIRECTIVES ---";

/// The two configurable prompt fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplates {
    /// Analytical directives placed at the top of the prompt.
    pub basic_prompt: String,

    /// Analyst role and required report structure.
    pub system_role: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            basic_prompt: default_basic_prompt(),
            system_role: default_system_role(),
        }
    }
}

fn default_basic_prompt() -> String {
    "You are analysing vehicle sales data. Base every statement on the figures in the data \
     context. Quantify trends, name the strongest and weakest segments, and call out regional \
     differences in demand and price."
        .to_string()
}

fn default_system_role() -> String {
    "You are a senior automotive market analyst writing for executives. Structure the report as: \
     Executive Summary, Sales Performance, Pricing & Mileage, Regional Insights, Model & \
     Powertrain Trends, Recommendations."
        .to_string()
}

/// Assemble the full narrative prompt around a data summary.
pub fn narrative_prompt(templates: &PromptTemplates, summary: &str) -> String {
    format!(
        "{basic}\n\n{end}\n\n\
         **Analyst Role & Required Report Structure:** {role}\n\n\
         Your report generation task starts now. Generate a complete, professional executive \
         report in Markdown format. Use the provided data summary and reference the generated \
         visualizations to support your analysis, following the required structural sections.\n\n\
         DATA CONTEXT:\n{summary}\n",
        basic = templates.basic_prompt,
        end = DIRECTIVES_END,
        role = templates.system_role,
        summary = summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        let templates = PromptTemplates {
            basic_prompt: "BASIC".into(),
            system_role: "ROLE".into(),
        };
        let prompt = narrative_prompt(&templates, "SUMMARY");

        assert!(prompt.starts_with("BASIC\n\n--- END OF ANALYTICAL DIRECTIVES ---\n\n"));
        assert!(prompt.contains("**Analyst Role & Required Report Structure:** ROLE\n\n"));
        assert!(prompt.ends_with("DATA CONTEXT:\nSUMMARY\n"));
    }

    #[test]
    fn test_both_fragments_required() {
        assert!(serde_json::from_str::<PromptTemplates>(r#"{"system_role": "x"}"#).is_err());
        let templates: PromptTemplates =
            serde_json::from_str(r#"{"basic_prompt": "b", "system_role": "r"}"#).unwrap();
        assert_eq!(templates.basic_prompt, "b");
    }
}

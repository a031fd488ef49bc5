//! System instruction for the planning agent.

use crate::tools::ToolRegistry;

/// Build the system instruction, listing the available tools.
pub fn build_instruction(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a travel planning assistant that helps with packing.

You have access to the following tools:
{tool_descriptions}

ALWAYS follow this exact process:
1. Call 'get_current_weather' FIRST with the exact city name.
2. Use the 'condition' from the weather result in 'get_packing_list'.
3. Respond with: a one-line weather summary, then a bullet list of packing items.
4. Keep responses concise and helpful."#,
        tool_descriptions = tool_descriptions
    )
}

//! Tools the planning agent can call.
//!
//! Each tool is a pure function wrapped in the [`Tool`] trait so the agent
//! loop can advertise it to the model and dispatch calls by name.

mod packing;
mod weather;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::FunctionDeclaration;

pub use packing::{recommend, GetPackingList, PackingResult, PackingStatus};
pub use weather::{classify, GetCurrentWeather, WeatherCondition, WeatherObservation};

/// A named, typed operation the agent may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the argument object.
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> anyhow::Result<Value>;
}

/// Name and description of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Registry of available tools, in registration order.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a registry with the weather and packing tools.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(GetCurrentWeather));
        registry.register(Arc::new(GetPackingList));
        registry
    }

    pub fn empty() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a tool. A tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.by_name.get(&name) {
            Some(&index) => self.tools[index] = tool,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Function declarations to advertise to the model.
    pub fn get_tool_schemas(&self) -> Vec<FunctionDeclaration> {
        self.tools
            .iter()
            .map(|t| FunctionDeclaration {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<Value> {
        let index = self
            .by_name
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        self.tools[*index].execute(args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull a required string argument out of a tool call's argument object.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> anyhow::Result<&'a str> {
    args[key]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", key))
}

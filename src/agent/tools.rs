use anyhow::Result;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

pub type ToolResult = Result<String>;

/// A capability the assistant can call through the host.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Value; // JSON Schema
    fn execute(&self, args: Value) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>>;
}

#[derive(Default)]
pub struct ToolDispatcher {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Registration payload announced to the host, one entry per tool.
    pub fn get_tools_schema(&self) -> Value {
        let schemas: Vec<Value> = self
            .tools
            .values()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.parameters()
                    }
                })
            })
            .collect();
        Value::Array(schemas)
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<String> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => Err(anyhow::anyhow!("Tool not found: {}", name)),
        }
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The advertised shape of a tool, as sent to the model. Carries no handler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// A json schema describing the arguments the tool accepts
    pub parameters: Value,
}

impl ToolSpec {
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ToolSpec {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

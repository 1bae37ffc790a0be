//! Small arithmetic tools for exercising the agent end to end.
//!
//! Heavier tools (web search, file inspection, transcripts) are expected to
//! be registered by embedders; these ship with the crate so a bare agent can
//! already do useful tool round trips.

use serde_json::{json, Map, Value};

use crate::errors::{AgentError, AgentResult};
use crate::registry::{FunctionTool, Tool};

fn two_number_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "a": {"type": "number", "description": "First operand"},
            "b": {"type": "number", "description": "Second operand"}
        },
        "required": ["a", "b"]
    })
}

fn operand(args: &Map<String, Value>, key: &str) -> AgentResult<f64> {
    args.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| AgentError::InvalidParameters(format!("'{key}' must be a number")))
}

/// Render whole results without a trailing ".0" so answers compare cleanly
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn add() -> Box<dyn Tool> {
    Box::new(FunctionTool::new(
        "add",
        "Add two numbers.",
        two_number_schema(),
        |args| Ok(format_number(operand(args, "a")? + operand(args, "b")?)),
    ))
}

pub fn subtract() -> Box<dyn Tool> {
    Box::new(FunctionTool::new(
        "subtract",
        "Subtract the second number from the first.",
        two_number_schema(),
        |args| Ok(format_number(operand(args, "a")? - operand(args, "b")?)),
    ))
}

pub fn multiply() -> Box<dyn Tool> {
    Box::new(FunctionTool::new(
        "multiply",
        "Multiply two numbers.",
        two_number_schema(),
        |args| Ok(format_number(operand(args, "a")? * operand(args, "b")?)),
    ))
}

pub fn divide() -> Box<dyn Tool> {
    Box::new(FunctionTool::new(
        "divide",
        "Divide the first number by the second.",
        two_number_schema(),
        |args| {
            let a = operand(args, "a")?;
            let b = operand(args, "b")?;
            if b == 0.0 {
                return Err(AgentError::ExecutionError("division by zero".to_string()));
            }
            Ok(format_number(a / b))
        },
    ))
}

pub fn modulus() -> Box<dyn Tool> {
    Box::new(FunctionTool::new(
        "modulus",
        "The remainder of dividing the first number by the second.",
        two_number_schema(),
        |args| {
            let a = operand(args, "a")?;
            let b = operand(args, "b")?;
            if b == 0.0 {
                return Err(AgentError::ExecutionError("modulus by zero".to_string()));
            }
            Ok(format_number(a % b))
        },
    ))
}

/// All builtin tools, ready to register
pub fn all() -> Vec<Box<dyn Tool>> {
    vec![multiply(), add(), subtract(), divide(), modulus()]
}

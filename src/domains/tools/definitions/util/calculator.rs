//! Calculator tool definition.
//!
//! Basic arithmetic on two operands.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use rmcp::model::CallToolResult;

use super::super::common::{error_result, success_result};
use crate::domains::tools::catalog::CatalogEntry;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Arithmetic operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }
}

/// Parameters for the calculator tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculatorParams {
    /// The mathematical operation to perform.
    pub operation: Operation,

    /// The first operand.
    pub a: f64,

    /// The second operand.
    pub b: f64,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Calculator tool - add, subtract, multiply or divide two numbers.
pub struct CalculatorTool;

impl CalculatorTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "calculator";

    #[instrument(skip_all, fields(operation = params.operation.as_str()))]
    pub fn execute(params: &CalculatorParams) -> CallToolResult {
        info!("Calculator tool called: {} {:?} {}", params.a, params.operation, params.b);

        let result = match params.operation {
            Operation::Add => params.a + params.b,
            Operation::Subtract => params.a - params.b,
            Operation::Multiply => params.a * params.b,
            Operation::Divide => {
                if params.b == 0.0 {
                    return error_result("Error: Division by zero is not allowed");
                }
                params.a / params.b
            }
        };

        success_result(format!(
            "Result: {} {} {} = {}",
            format_number(params.a),
            params.operation.as_str(),
            format_number(params.b),
            format_number(result)
        ))
    }

    pub fn catalog_entry() -> CatalogEntry {
        CatalogEntry::typed(|params: CalculatorParams| async move { Self::execute(&params) })
    }
}

/// Format a number without a trailing `.0` for integral values.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! General-purpose tools with no filesystem access.

pub mod calculator;
pub mod echo;
pub mod time;

pub use calculator::{CalculatorParams, CalculatorTool, Operation};
pub use echo::{EchoParams, EchoTool, FileEchoTool, PingPongParams, PingPongTool};
pub use time::{CurrentTimeParams, CurrentTimeTool};

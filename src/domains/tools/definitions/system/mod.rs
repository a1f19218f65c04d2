//! Process execution tools.

pub mod command;

pub use command::{RunCommandParams, RunCommandTool, ShellCommandParams, ShellCommandTool};

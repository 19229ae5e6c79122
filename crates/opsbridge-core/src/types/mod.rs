//! Core types shared by the gateway, the providers and the orchestrator

mod message;
mod tool;

pub use message::{ContentBlock, ConversationTurn};
pub use tool::{ModelTool, ToolCall, ToolDefinition, ToolResult};

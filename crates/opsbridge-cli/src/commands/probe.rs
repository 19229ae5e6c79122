//! Gateway smoke check: list tools, then call one and show raw blocks

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use opsbridge_core::gateway::{normalize_response, GatewayTransport, RawToolResponse, RmcpTransport, ToolOutcome};
use opsbridge_core::GatewayClient;
use serde_json::Value;

use super::Context;
use crate::GlobalArgs;

/// Characters shown per content block
const BLOCK_PREVIEW: usize = 500;

pub fn parse_arguments(raw: &str) -> anyhow::Result<Value> {
    let value: Value = serde_json::from_str(raw).context("--args must be JSON")?;
    anyhow::ensure!(value.is_object(), "--args must be a JSON object");
    Ok(value)
}

pub fn preview_blocks(response: &RawToolResponse) -> Vec<String> {
    response
        .content
        .iter()
        .map(|block| {
            let text = block
                .text
                .clone()
                .unwrap_or_else(|| serde_json::to_string(block).unwrap_or_default());
            text.chars().take(BLOCK_PREVIEW).collect()
        })
        .collect()
}

pub async fn run(
    global: &GlobalArgs,
    user: &str,
    tool: Option<&str>,
    raw_args: &str,
) -> anyhow::Result<ExitCode> {
    let ctx = Context::load(global)?;
    let arguments = parse_arguments(raw_args)?;

    let transport = Arc::new(RmcpTransport::new(
        ctx.settings.gateway.url.clone(),
        ctx.gateway_key()?,
        user,
        Duration::from_secs(ctx.settings.gateway.timeout_secs),
        ctx.logger.clone(),
    ));
    let gateway = GatewayClient::with_transport(user, transport.clone(), ctx.logger.clone());

    println!("Gateway: {}\n", gateway.endpoint());
    let tools = gateway.discover_tools().await.context("listing tools")?;
    println!("Connected! Found {} tools:\n", tools.len());
    for tool in &tools {
        println!("  - {}", tool.name);
    }

    let Some(tool) = tool else {
        return Ok(ExitCode::SUCCESS);
    };

    println!("\n--- Testing {} ---", tool);
    let response = transport.call_tool(tool, arguments).await.context("calling tool")?;
    for block in preview_blocks(&response) {
        println!("{}", block);
    }

    match normalize_response(tool, &response).outcome() {
        ToolOutcome::AuthorizationRequired { url } => {
            println!("\nAuthorization required: {}", url);
            Ok(ExitCode::SUCCESS)
        }
        ToolOutcome::Failed { .. } => Ok(ExitCode::FAILURE),
        ToolOutcome::Succeeded { .. } => Ok(ExitCode::SUCCESS),
    }
}

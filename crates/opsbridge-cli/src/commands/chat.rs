//! Interactive chat: identify, connect, then relay messages

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use opsbridge_core::orchestrator::{messages, ChatSession, Orchestrator, OrchestratorConfig, TurnOutcome};
use opsbridge_core::providers::{create_provider, ProviderModelConfig};
use opsbridge_core::GatewayClient;

use super::Context;
use crate::terminal::{prompt_marker, LineInput, TerminalSink};
use crate::GlobalArgs;

const IDENTIFY_TIMEOUT: Duration = Duration::from_secs(300);

/// What a line typed at the prompt asks for
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Quit,
    RefreshTools,
    Message(&'a str),
    Blank,
}

pub fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Blank,
        "/quit" | "/exit" => Input::Quit,
        "/refresh" => Input::RefreshTools,
        text => Input::Message(text),
    }
}

pub async fn run(global: &GlobalArgs, user: Option<String>) -> anyhow::Result<ExitCode> {
    let ctx = Context::load(global)?;
    let gateway_key = ctx.gateway_key()?;
    let mut input = LineInput::stdin();

    let user_id = match user {
        Some(user) => user,
        None => match input.ask(messages::WELCOME, IDENTIFY_TIMEOUT).await? {
            Some(user) => user,
            None => {
                println!("{}", messages::IDENTIFICATION_TIMED_OUT);
                return Ok(ExitCode::FAILURE);
            }
        },
    };

    println!("{}", messages::CONNECTING);
    let gateway = GatewayClient::connect(&ctx.settings.gateway, &gateway_key, user_id, ctx.logger.clone());
    let mut session = ChatSession::new(gateway);

    match session.connect().await {
        Ok(tools) => println!("{}\n", messages::connected(tools.len())),
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to the gateway");
            println!("{}", messages::connection_failed(&e.to_string()));
            return Ok(ExitCode::FAILURE);
        }
    }

    let mut model = ProviderModelConfig::new(ctx.settings.model.name.clone());
    if let Some(key) = ctx.model_key() {
        model = model.with_api_key(key);
    }
    if let Some(base) = &ctx.settings.model.api_base {
        model = model.with_api_base(base.clone());
    }

    let orchestrator = Orchestrator::new(
        create_provider(&ctx.settings.model.provider, ctx.logger.clone()),
        model,
        OrchestratorConfig::from_settings(&ctx.settings).context("loading system prompt")?,
        ctx.logger.clone(),
    );
    let sink = TerminalSink;

    loop {
        prompt_marker();
        let Some(line) = input.next().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::RefreshTools => {
                session.invalidate_tools();
                match session.connect().await {
                    Ok(tools) => println!("{}\n", messages::connected(tools.len())),
                    Err(e) => println!("{}\n", messages::connection_failed(&e.to_string())),
                }
            }
            Input::Message(text) => match orchestrator.handle_message(&mut session, text, &sink).await {
                Ok(TurnOutcome::Completed { rounds }) => {
                    tracing::debug!(rounds, "turn completed");
                }
                Ok(TurnOutcome::RoundLimitReached { rounds }) => {
                    tracing::warn!(rounds, "turn stopped at the round limit");
                }
                Err(e) => {
                    if e.is_connection_error() {
                        session.invalidate_tools();
                    }
                    tracing::error!(error = %e, "turn failed");
                    println!("Error: {}\n", e);
                }
            },
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), Input::Blank);
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input(" /exit "), Input::Quit);
        assert_eq!(parse_input("/refresh"), Input::RefreshTools);
        assert_eq!(parse_input(" any late loads? "), Input::Message("any late loads?"));
    }
}

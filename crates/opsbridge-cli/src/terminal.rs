//! Plain-text terminal surface

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use opsbridge_core::orchestrator::{MessageSink, OutboundMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented input with an optional deadline per read
pub struct LineInput<R> {
    lines: Lines<R>,
}

impl LineInput<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines() }
    }

    /// Next line, trimmed; `None` at end of input
    pub async fn next(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }

    /// Like [`next`](Self::next), but `None` also when the deadline passes
    /// or the answer is blank
    pub async fn ask(&mut self, prompt: &str, deadline: Duration) -> std::io::Result<Option<String>> {
        println!("{}", prompt);
        prompt_marker();
        match tokio::time::timeout(deadline, self.next()).await {
            Ok(line) => Ok(line?.filter(|answer| !answer.is_empty())),
            Err(_) => Ok(None),
        }
    }
}

pub fn prompt_marker() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Prints outbound messages to stdout
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn render(message: &OutboundMessage) -> String {
        match message {
            OutboundMessage::Text(text) | OutboundMessage::Authorization { text, .. } => text.clone(),
            OutboundMessage::ToolStep {
                tool,
                input,
                output,
                is_error,
            } => {
                let marker = if *is_error { "!" } else { "+" };
                let body = output
                    .lines()
                    .map(|line| format!("    {}", line))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("  [{}] {} {}\n{}", marker, tool, input, body)
            }
            OutboundMessage::Notice(text) => format!("-- {}", text),
        }
    }
}

#[async_trait]
impl MessageSink for TerminalSink {
    async fn send(&self, message: OutboundMessage) {
        println!("{}\n", Self::render(&message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_line_input_trims_and_ends() {
        let mut input = LineInput::new(BufReader::new(&b"  ops@allpoints.example  \nsecond\n"[..]));
        assert_eq!(input.next().await.unwrap().as_deref(), Some("ops@allpoints.example"));
        assert_eq!(input.next().await.unwrap().as_deref(), Some("second"));
        assert_eq!(input.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ask_blank_answer_is_none() {
        let mut input = LineInput::new(BufReader::new(&b"   \n"[..]));
        let answer = input.ask("email?", Duration::from_secs(1)).await.unwrap();
        assert_eq!(answer, None);
    }

    #[test]
    fn test_render_tool_step() {
        let rendered = TerminalSink::render(&OutboundMessage::ToolStep {
            tool: "detect_exceptions".to_string(),
            input: json!({"days": 2}),
            output: "SHP-1 late\nSHP-2 late".to_string(),
            is_error: false,
        });
        assert_eq!(rendered, "  [+] detect_exceptions {\"days\":2}\n    SHP-1 late\n    SHP-2 late");
    }

    #[test]
    fn test_render_notice() {
        let rendered = TerminalSink::render(&OutboundMessage::Notice("stopped".to_string()));
        assert_eq!(rendered, "-- stopped");
    }
}

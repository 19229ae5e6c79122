//! Orchestration loop
//!
//! For each user message the [`Orchestrator`] queries the model with the
//! full history and the user's tool catalog, runs whatever tools the model
//! asks for through the gateway, feeds the results back, and repeats until
//! the model answers in plain text or the round budget is spent.
//!
//! Authorization requirements never fail a turn. The user gets a link, the
//! model gets an error tool result saying so, and the conversation goes on.
//!
//! ```rust,ignore
//! let mut session = ChatSession::new(gateway);
//! session.connect().await?;
//!
//! let orchestrator = Orchestrator::new(provider, model, OrchestratorConfig::from_settings(&settings)?, logger);
//! match orchestrator.handle_message(&mut session, "Any late shipments?", &sink).await? {
//!     TurnOutcome::Completed { .. } => {}
//!     TurnOutcome::RoundLimitReached { rounds } => eprintln!("gave up after {rounds} rounds"),
//! }
//! ```

mod engine;
mod error;
pub mod messages;
mod session;
mod sink;

pub use engine::{Orchestrator, OrchestratorConfig, TurnOutcome};
pub use error::{OrchestrationError, OrchestrationResult};
pub use session::ChatSession;
pub use sink::{CollectingSink, MessageSink, OutboundMessage};

//! Flem - fix the last executed command with a language model.
//!
//! This library provides the core functionality behind the `flem` binary.
//! One invocation performs one fixing pass:
//!
//! - **History lookup** of the most recent command in `~/.bash_history`
//! - **Correction** via an OpenAI-style chat-completion endpoint
//! - **Confirmation** before anything runs, with an extra gate for
//!   destructive commands
//! - **Shell execution** of the accepted fix, propagating its exit status
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management (API key, model, endpoint)
//! - [`history`] - Reads the last command from bash history
//! - [`llm_corrector`] - Asks the model for a corrected command
//! - [`http_client`] - HTTP client abstraction
//! - [`safety`] - Classifies commands as dangerous
//! - [`confirm_ui`] - The execute/cancel prompt
//! - [`executor`] - Runs the accepted fix through the shell
//! - [`fix_flow`] - Wires the steps together into one pass
//!
//! # Example
//!
//! ```ignore
//! use flem::config::Config;
//! use flem::fix_flow::{FixFlow, FlowOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let flow = FixFlow::new(FlowOptions::default());
//!
//!     let exit_code = flow.run(&config).await?;
//!     std::process::exit(exit_code);
//! }
//! ```

pub mod config;
pub mod confirm_ui;
pub mod executor;
pub mod fix_flow;
pub mod history;
pub mod http_client;
pub mod llm_corrector;
pub mod safety;

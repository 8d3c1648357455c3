//! Colloquy: conversational agents over OpenAI-compatible chat completion APIs.
//!
//! An [`agent::Agent`] keeps a transcript, optionally runs scripted
//! chain-of-thought prompts, dispatches the tool calls the model asks for and
//! can finish with a schema-constrained answer parsed into a Rust type.
//! Audio input is transcribed and an image can ride along with a message.
//!
//! # Quick Start
//!
//! ```no_run
//! use colloquy::prelude::*;
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! # async fn example() -> colloquy::error::Result<()> {
//! let mut agent = Agent::builder(AgentConfig::from_env()?)
//!     .with_instructions("Extract people from text.")
//!     .build()?;
//! let person: Person = agent
//!     .structured_chat("Ana turned 30 last week.".into())
//!     .await?;
//! println!("{} is {}", person.name, person.age);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod audio;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod schema;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;

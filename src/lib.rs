//! # MixMaster MCP Library
//!
//! This library turns a list of bar ingredients into AI-generated cocktail
//! recipes, complete with images, English/Spanish translation, favorites and
//! link-based sharing. All generation is delegated to the Gemini API; the
//! crate owns request shaping, retry with backoff, response validation,
//! per-recipe image status and persistence.
//!
//! ## Client Module
//!
//! The [`client`] module holds the HTTP client, the cocktail types, error
//! kinds and the [`RetryableCall`](client::RetryableCall) wrapper.
//!
//! ## Gateway and Session
//!
//! [`gateway::AiGateway`] exposes the four AI operations. [`session::MixSession`]
//! drives a full generation: recipes first, then images one at a time through
//! [`batch::ImageBatch`], tracked per recipe by [`tracker::StatusTracker`].
//!
//! ## Server Module
//!
//! The [`server`] module exposes a session as MCP tools.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mcp_mixmaster::{AiGateway, GeminiClient, MixSession};
//! use mcp_mixmaster::store::MemoryStore;
//!
//! # async fn example() -> Result<(), mcp_mixmaster::client::AiError> {
//! let client = GeminiClient::new(
//!     "https://generativelanguage.googleapis.com".to_string(),
//!     Some("AIza...".to_string()),
//! );
//! let mut session = MixSession::new(AiGateway::new(Arc::new(client)), Arc::new(MemoryStore::new()));
//! session.ingredients_mut().add_input("Vodka, Lime Juice, Ginger Beer");
//!
//! let report = session.generate().await?;
//! for cocktail in &report.recipes {
//!     println!("{} ({:?})", cocktail.name(), cocktail.image_status());
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod connectivity;
pub mod favorites;
pub mod gateway;
pub mod ingredients;
pub mod server;
pub mod session;
pub mod share;
pub mod store;
pub mod tracker;

pub use client::GeminiClient;
pub use gateway::AiGateway;
pub use server::MixMasterMcpServer;
pub use session::MixSession;

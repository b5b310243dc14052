//! Thin HTTP proxy that normalizes chat requests into OpenAI chat-completion
//! calls, with a per-session in-memory thread cache and TTL eviction.

// Interdiction stricte de pratiques dangereuses ou non idiomatiques
#![deny(unsafe_code)] // Le code unsafe est interdit
#![deny(missing_docs)] // Tout élément public doit être documenté
#![deny(non_camel_case_types)]
#![deny(unused_must_use)] // Oblige à gérer explicitement les Result et Option
#![deny(non_snake_case)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]
// Clippy pour stricte discipline
#![deny(clippy::all)]
#![deny(clippy::unwrap_used)] // Interdit unwrap() hors tests
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

/// Conversation orchestrator running chat turns.
pub mod chat;
/// Environment-derived configuration.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Request/response envelopes and conversation messages.
pub mod models;
/// Upstream completion API client and test double.
pub mod openai;
/// HTTP server and API routes.
#[allow(clippy::unused_async)]
pub mod server;
/// In-memory thread store with TTL eviction.
pub mod threads;

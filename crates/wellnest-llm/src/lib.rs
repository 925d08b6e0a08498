//! Wellness plan generation contract.
//!
//! This crate builds the chat-completions requests for a personalised
//! 7-day meal and workout plan and for yoga suggestions, and interprets
//! the gateway's replies. The transport itself belongs to the host
//! application.

pub mod generation;
pub mod prompts;

pub use generation::*;
pub use prompts::*;

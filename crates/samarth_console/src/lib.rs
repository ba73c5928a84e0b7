//! Line-oriented console front end for the Samarth QA conversation core.
//!
//! ## Backend bootstrap
//!
//! `samarth_console` selects its chat backend from the environment:
//!
//! - `SAMARTH_CHAT_BACKEND=http` (default) for a running Samarth QA server
//! - `SAMARTH_CHAT_BACKEND=mock` for deterministic local runs
//!
//! The `http` backend reads `SAMARTH_CHAT_BASE_URL` (default
//! `http://127.0.0.1:7860`) and `SAMARTH_CHAT_TIMEOUT_SEC` (default 120).
//! `SAMARTH_CHAT_CATEGORY` optionally pins every question to one dataset
//! category.
//!
//! Contract notes:
//! - `SAMARTH_CHAT_TIMEOUT_SEC` must parse as a positive integer when set.
//! - Unknown backend ids fail startup with the supported set listed.
//!
//! ## Loop shape
//!
//! Prompt when idle, dispatch through the conversation core, block on the
//! worker event channel while a turn is in flight, apply the terminal event,
//! render. The core's busy state is the only concurrency control; the
//! console merely withholds the prompt while a turn runs.

pub mod backends;
pub mod commands;
pub mod config;
pub mod markup;
pub mod render;
pub mod runtime;
pub mod shell;
pub mod term;

//! Core conversation state for the Samarth QA console.
//!
//! Invariant: every terminal turn outcome returns the controller to `Idle`
//! through one private transition, so the input controls are never left
//! disabled.
//!
//! # Public API Overview
//! - Drive the conversation with [`App`] and a [`ConversationHost`]
//!   implementation that performs the actual dispatch.
//! - Feed backend outcomes back in as [`chat_backend::TurnEvent`] and
//!   [`session::SessionEvent`] values.
//! - Read the transcript via [`MessageLog`] and the sidebar projections via
//!   [`SourcesPanel`] and [`StatsPanel`].
//! - Size the sidebars with the pure [`input_bounds`] breakpoint helper.
//!
//! All types here are synchronous and I/O-free; threading and transport live
//! with the host.

pub mod app;
pub mod layout;
pub mod log;
pub mod panels;
pub mod session;

/// Conversation controller and its host-facing seam.
pub use crate::app::{App, BusyState, ConversationHost, TurnRequest};

/// Sidebar width computation.
pub use crate::layout::{input_bounds, InputBounds};

/// Transcript primitives and fixed copy.
pub use crate::log::{Message, MessageLog, Role, WelcomeView, LOADING_TEXT, WELCOME_VIEW};

/// Metadata panel projections.
pub use crate::panels::{
    SourceEntry, SourcesPanel, SourcesView, StatLine, StatsPanel, StatsProjection, StatsView,
};

/// Session identity tracking.
pub use crate::session::{SessionEpoch, SessionEvent, SessionManager, SessionOutcome};

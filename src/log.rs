//! Conversation transcript.
//!
//! `MessageLog` owns the ordered message sequence, the one-shot welcome view
//! shown before the first message, and the transient loading entry displayed
//! while an answer is being generated. Messages are immutable once appended
//! and are never reordered.

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry.
///
/// `rendered_as_markup` decides how the host displays `content`: assistant
/// answers carry markdown, user text is always literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub rendered_as_markup: bool,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            rendered_as_markup: false,
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            rendered_as_markup: true,
        }
    }
}

/// Introductory view shown while the transcript is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WelcomeView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub pills: [&'static str; 4],
    pub invitation: &'static str,
}

pub const WELCOME_VIEW: WelcomeView = WelcomeView {
    title: "Welcome to Project Samarth",
    subtitle: "Your intelligent assistant for agricultural and climate data insights",
    pills: [
        "🔍 Query Enhancement",
        "🎯 Multi-Stage Retrieval",
        "⚡ Intelligent Reranking",
        "📦 Context Compression",
    ],
    invitation: "Ask me anything about crop production, rainfall patterns, climate trends, and agricultural insights across India.",
};

/// Text of the transient loading entry.
pub const LOADING_TEXT: &str = "Analyzing data and generating insights...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<Message>,
    welcome_visible: bool,
    loading: bool,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            welcome_visible: true,
            loading: false,
        }
    }

    /// Appends a message. The first append since the conversation began
    /// discards the welcome view; later appends leave it discarded.
    pub fn push(&mut self, message: Message) {
        self.welcome_visible = false;
        self.messages.push(message);
    }

    /// Installs the transient loading entry shown below the transcript.
    pub fn show_loading(&mut self) {
        self.loading = true;
    }

    /// Removes the loading entry. A no-op when none is pending.
    pub fn clear_loading(&mut self) {
        self.loading = false;
    }

    /// Discards all messages and restores the welcome view.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the welcome view while it is still on display.
    #[must_use]
    pub fn welcome(&self) -> Option<&WelcomeView> {
        self.welcome_visible.then_some(&WELCOME_VIEW)
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }
}

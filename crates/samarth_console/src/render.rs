//! Transcript and panel rendering.
//!
//! All helpers here are pure over the conversation state; [`Renderer`] only
//! tracks how much of the transcript has already been written so frames stay
//! incremental.

use samarth_chat::layout::InputBounds;
use samarth_chat::log::{Message, MessageLog, Role, WelcomeView, LOADING_TEXT};
use samarth_chat::panels::{SourcesView, StatsView, ENTITIES_LABEL};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::markup::flatten_markdown;
use crate::term::COLUMN_PX;

pub const USER_HEADER: &str = "You:";
pub const ASSISTANT_HEADER: &str = "Samarth:";

const SOURCES_PANEL_TITLE: &str = "Data Sources";
const STATS_PANEL_TITLE: &str = "Pipeline Stats";
const PANEL_GAP: &str = "  ";

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Incremental transcript renderer.
#[derive(Debug, Default)]
pub struct Renderer {
    rendered_messages: usize,
    welcome_shown: bool,
    loading_shown: bool,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets rendered state after the transcript is cleared.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Renders one frame: the welcome view on first sight, queued notices,
    /// transcript entries appended since the last frame, the metadata panels
    /// after an assistant turn, and the transient loading entry while a turn
    /// is in flight.
    pub fn frame(
        &mut self,
        log: &MessageLog,
        sources: &SourcesView,
        stats: &StatsView,
        notices: &[String],
        bounds: InputBounds,
        columns: usize,
    ) -> Vec<String> {
        let width = columns.saturating_sub(2).max(16);
        let mut lines = Vec::new();

        if let Some(welcome) = log.welcome() {
            if !self.welcome_shown {
                lines.extend(welcome_block(welcome, width));
                self.welcome_shown = true;
            }
        }

        for notice in notices {
            for notice_line_text in notice.split('\n') {
                lines.push(notice_line(notice_line_text));
            }
        }

        let messages = log.messages();
        let start = self.rendered_messages.min(messages.len());
        let mut assistant_appended = false;
        for message in &messages[start..] {
            lines.extend(message_block(message, width));
            lines.push(String::new());
            if message.role == Role::Assistant {
                assistant_appended = true;
            }
        }
        self.rendered_messages = messages.len();

        if assistant_appended {
            lines.extend(panels_block(sources, stats, bounds));
        }

        if log.loading() {
            if !self.loading_shown {
                lines.push(format!("{DIM}{LOADING_TEXT}{RESET}"));
                self.loading_shown = true;
            }
        } else {
            self.loading_shown = false;
        }

        lines
    }
}

pub fn notice_line(text: &str) -> String {
    format!("{DIM}* {text}{RESET}")
}

pub fn welcome_block(view: &WelcomeView, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(wrap_plain(view.title, width));
    lines.extend(wrap_plain(view.subtitle, width));
    lines.push(String::new());
    for pill in view.pills {
        lines.push(format!("  {pill}"));
    }
    lines.push(String::new());
    lines.extend(wrap_plain(view.invitation, width));
    lines.push(String::new());
    lines
}

/// Transcript entry with its role header. Assistant markup is flattened;
/// user text is wrapped literally.
pub fn message_block(message: &Message, width: usize) -> Vec<String> {
    let header = match message.role {
        Role::User => USER_HEADER,
        Role::Assistant => ASSISTANT_HEADER,
    };
    let content_width = width.saturating_sub(2).max(1);

    let source_lines = if message.rendered_as_markup {
        flatten_markdown(&message.content)
    } else {
        message.content.split('\n').map(str::to_string).collect()
    };

    let mut lines = vec![header.to_string()];
    for source_line in source_lines {
        for wrapped in wrap_plain(&source_line, content_width) {
            if wrapped.is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("  {wrapped}"));
            }
        }
    }
    lines
}

/// Panel columns sized from the layout bounds. Zero-width sides are skipped
/// entirely; when both sides have width the panels render side by side.
pub fn panels_block(sources: &SourcesView, stats: &StatsView, bounds: InputBounds) -> Vec<String> {
    let left_width = (bounds.left / COLUMN_PX) as usize;
    let right_width = (bounds.right / COLUMN_PX) as usize;

    let left = (left_width > 0)
        .then(|| panel_lines(SOURCES_PANEL_TITLE, &sources_lines(sources), left_width));
    let right = (right_width > 0)
        .then(|| panel_lines(STATS_PANEL_TITLE, &stats_lines(stats), right_width));

    match (left, right) {
        (Some(left), Some(right)) => zip_columns(&left, left_width, &right),
        (Some(single), None) | (None, Some(single)) => single,
        (None, None) => Vec::new(),
    }
}

fn panel_lines(title: &str, body: &[String], width: usize) -> Vec<String> {
    let mut lines = vec![title.to_string(), "-".repeat(title.len().min(width))];
    for entry in body {
        lines.extend(wrap_plain(entry, width));
    }
    lines
}

fn sources_lines(view: &SourcesView) -> Vec<String> {
    match view {
        SourcesView::Placeholder(text) => vec![(*text).to_string()],
        SourcesView::Entries(entries) => entries
            .iter()
            .map(|entry| format!("{}. {} / {}", entry.index, entry.name, entry.category))
            .collect(),
    }
}

fn stats_lines(view: &StatsView) -> Vec<String> {
    match view {
        StatsView::Placeholder(text) => vec![(*text).to_string()],
        StatsView::Projected(projection) => {
            let mut lines: Vec<String> = projection
                .stats
                .iter()
                .map(|stat| format!("{}: {}", stat.label, stat.value))
                .collect();
            if let Some(entities) = projection.entities.as_ref() {
                lines.push(format!("{ENTITIES_LABEL}: {entities}"));
            }
            lines
        }
    }
}

fn zip_columns(left: &[String], left_width: usize, right: &[String]) -> Vec<String> {
    let rows = left.len().max(right.len());
    (0..rows)
        .map(|row| {
            let left_cell = left.get(row).map(String::as_str).unwrap_or("");
            let right_cell = right.get(row).map(String::as_str).unwrap_or("");
            let pad = " ".repeat(left_width.saturating_sub(left_cell.width()));
            format!("{left_cell}{pad}{PANEL_GAP}{right_cell}")
                .trim_end()
                .to_string()
        })
        .collect()
}

pub fn wrap_plain(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() || width == 0 {
        return vec![String::new()];
    }

    let mut result = Vec::new();
    for input_line in text.split('\n') {
        result.append(&mut wrap_single_line(input_line, width));
    }

    result
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .collect()
}

fn wrap_single_line(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    if line.width() <= width {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for token in split_into_tokens(line) {
        let token_width = token.width();
        let is_whitespace = token.trim().is_empty();

        if token_width > width && !is_whitespace {
            if !current_line.is_empty() {
                wrapped.push(current_line.trim_end().to_string());
                current_line.clear();
                current_width = 0;
            }

            let broken = break_long_word(&token, width);
            if let Some((last, rest)) = broken.split_last() {
                wrapped.extend_from_slice(rest);
                current_line = last.clone();
                current_width = current_line.width();
            }
            continue;
        }

        if current_width + token_width > width && current_width > 0 {
            wrapped.push(current_line.trim_end().to_string());
            current_line.clear();
            current_width = 0;
            if !is_whitespace {
                current_width = token_width;
                current_line = token;
            }
        } else {
            current_width += token_width;
            current_line.push_str(&token);
        }
    }

    if !current_line.is_empty() {
        wrapped.push(current_line);
    }

    wrapped
}

fn split_into_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_whitespace = false;

    for ch in text.chars() {
        let is_space = ch == ' ';
        if is_space != in_whitespace && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        in_whitespace = is_space;
        current.push(ch);
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn break_long_word(word: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for grapheme in word.graphemes(true) {
        let grapheme_width = grapheme.width();
        if current_width + grapheme_width > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }
        current_line.push_str(grapheme);
        current_width += grapheme_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use samarth_chat::layout::InputBounds;
    use samarth_chat::log::{Message, MessageLog};
    use samarth_chat::panels::{SourcesPanel, SourcesView, StatsPanel};

    use super::{
        message_block, notice_line, panels_block, welcome_block, wrap_plain, Renderer,
    };

    fn wide_bounds() -> InputBounds {
        InputBounds {
            left: 260,
            right: 280,
        }
    }

    #[test]
    fn wrap_respects_word_boundaries() {
        assert_eq!(
            wrap_plain("the quick brown fox", 10),
            vec!["the quick".to_string(), "brown fox".to_string()]
        );
    }

    #[test]
    fn wrap_breaks_words_longer_than_the_width() {
        assert_eq!(
            wrap_plain("abcdefghij", 4),
            vec!["abcd".to_string(), "efgh".to_string(), "ij".to_string()]
        );
    }

    #[test]
    fn wrap_of_empty_input_is_a_single_blank_line() {
        assert_eq!(wrap_plain("", 10), vec![String::new()]);
    }

    #[test]
    fn user_messages_render_literally() {
        let lines = message_block(&Message::user("**not markup**".to_string()), 40);
        assert_eq!(
            lines,
            vec!["You:".to_string(), "  **not markup**".to_string()]
        );
    }

    #[test]
    fn assistant_messages_are_flattened() {
        let lines = message_block(&Message::assistant("**Rainfall** declined".to_string()), 40);
        assert_eq!(
            lines,
            vec!["Samarth:".to_string(), "  Rainfall declined".to_string()]
        );
    }

    #[test]
    fn notices_are_dimmed_with_a_marker() {
        let line = notice_line("Failed to create session");
        assert!(line.starts_with("\x1b[2m* "));
        assert!(line.contains("Failed to create session"));
        assert!(line.ends_with("\x1b[0m"));
    }

    #[test]
    fn panels_are_skipped_at_zero_bounds() {
        let sources = SourcesPanel::new();
        let stats = StatsPanel::new();
        let bounds = InputBounds { left: 0, right: 0 };

        assert!(panels_block(sources.view(), stats.view(), bounds).is_empty());
    }

    #[test]
    fn panels_render_side_by_side_when_both_have_width() {
        let sources = SourcesView::Entries(vec![samarth_chat::panels::SourceEntry {
            index: 1,
            name: "IMD-2023".to_string(),
            category: "climate".to_string(),
        }]);
        let mut stats = StatsPanel::new();
        stats.project(Some(&chat_backend::PipelineInfo {
            query_variations: 2,
            retrieved_count: 10,
            reranked_count: 4,
            final_context_count: 3,
            entities: None,
        }));

        let lines = panels_block(&sources, stats.view(), wide_bounds());
        assert!(lines[0].starts_with("Data Sources"));
        assert!(lines[0].ends_with("Pipeline Stats"));
        assert!(lines[2].contains("1. IMD-2023 / climate"));
        assert!(lines[2].ends_with("Query Variations: 2"));
        assert!(lines[5].ends_with("Final Context: 3"));
    }

    #[test]
    fn collapsed_right_side_renders_the_left_panel_alone() {
        let sources = SourcesPanel::new();
        let stats = StatsPanel::new();
        let bounds = InputBounds {
            left: 260,
            right: 0,
        };

        let lines = panels_block(sources.view(), stats.view(), bounds);
        assert_eq!(lines[0], "Data Sources");
        assert!(!lines.iter().any(|line| line.contains("Pipeline Stats")));
    }

    #[test]
    fn welcome_block_lists_all_capability_pills() {
        let lines = welcome_block(&samarth_chat::log::WELCOME_VIEW, 80);
        let pill_lines = lines
            .iter()
            .filter(|line| line.starts_with("  ") && !line.trim().is_empty())
            .count();
        assert_eq!(pill_lines, 4);
        assert_eq!(lines[0], "Welcome to Project Samarth");
    }

    #[test]
    fn frames_render_only_messages_appended_since_the_last_frame() {
        let mut renderer = Renderer::new();
        let mut log = MessageLog::new();
        let sources = SourcesPanel::new();
        let stats = StatsPanel::new();
        let bounds = InputBounds { left: 0, right: 0 };

        log.push(Message::user("first question".to_string()));
        let first = renderer.frame(&log, sources.view(), stats.view(), &[], bounds, 80);
        assert!(first.iter().any(|line| line.contains("first question")));

        log.push(Message::user("second question".to_string()));
        let second = renderer.frame(&log, sources.view(), stats.view(), &[], bounds, 80);
        assert!(!second.iter().any(|line| line.contains("first question")));
        assert!(second.iter().any(|line| line.contains("second question")));
    }

    #[test]
    fn welcome_is_rendered_once_until_reset() {
        let mut renderer = Renderer::new();
        let log = MessageLog::new();
        let sources = SourcesPanel::new();
        let stats = StatsPanel::new();
        let bounds = InputBounds { left: 0, right: 0 };

        let first = renderer.frame(&log, sources.view(), stats.view(), &[], bounds, 80);
        assert!(first.iter().any(|line| line.contains("Welcome to Project Samarth")));

        let second = renderer.frame(&log, sources.view(), stats.view(), &[], bounds, 80);
        assert!(second.is_empty());

        renderer.reset();
        let third = renderer.frame(&log, sources.view(), stats.view(), &[], bounds, 80);
        assert!(third.iter().any(|line| line.contains("Welcome to Project Samarth")));
    }

    #[test]
    fn loading_entry_appears_once_while_a_turn_is_in_flight() {
        let mut renderer = Renderer::new();
        let mut log = MessageLog::new();
        let sources = SourcesPanel::new();
        let stats = StatsPanel::new();
        let bounds = InputBounds { left: 0, right: 0 };

        log.push(Message::user("question".to_string()));
        log.show_loading();

        let first = renderer.frame(&log, sources.view(), stats.view(), &[], bounds, 80);
        assert!(first
            .iter()
            .any(|line| line.contains("Analyzing data and generating insights...")));

        let second = renderer.frame(&log, sources.view(), stats.view(), &[], bounds, 80);
        assert!(second.is_empty());

        log.clear_loading();
        log.push(Message::assistant("answer".to_string()));
        let third = renderer.frame(&log, sources.view(), stats.view(), &[], bounds, 80);
        assert!(!third
            .iter()
            .any(|line| line.contains("Analyzing data and generating insights...")));
        assert!(third.iter().any(|line| line.contains("answer")));
    }
}

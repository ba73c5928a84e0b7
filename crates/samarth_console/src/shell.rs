//! Interactive console loop.
//!
//! [`Shell`] owns the controller, the runtime, and the event channel. Lines
//! are read one at a time; while a turn is in flight the prompt is withheld
//! and the loop blocks on the event channel until the turn reaches a terminal
//! event. Ready events are drained before each prompt so answers that arrive
//! between lines still land in the transcript.

use std::io::{BufRead, Write};

use samarth_chat::layout::{input_bounds, InputBounds};
use samarth_chat::{App, SessionEvent};

use crate::commands::{parse_slash_command, SlashCommand, HELP_TEXT, UNKNOWN_COMMAND_NOTICE};
use crate::render::Renderer;
use crate::runtime::{ConsoleEvent, ConsoleRuntime};
use crate::term::{ResizeWatcher, COLUMN_PX};

const PROMPT: &str = "> ";

const SOURCES_SHOWN_NOTICE: &str = "Sources panel shown.";
const SOURCES_HIDDEN_NOTICE: &str = "Sources panel hidden.";
const STATS_SHOWN_NOTICE: &str = "Stats panel shown.";
const STATS_HIDDEN_NOTICE: &str = "Stats panel hidden.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopSignal {
    Continue,
    Quit,
}

pub struct Shell<W: Write> {
    app: App,
    runtime: ConsoleRuntime,
    events: std::sync::mpsc::Receiver<ConsoleEvent>,
    renderer: Renderer,
    out: W,
    viewport_px: u32,
    sources_collapsed: bool,
    stats_collapsed: bool,
    resize: Option<ResizeWatcher>,
}

impl<W: Write> Shell<W> {
    pub fn new(
        app: App,
        runtime: ConsoleRuntime,
        events: std::sync::mpsc::Receiver<ConsoleEvent>,
        out: W,
        viewport_px: u32,
    ) -> Self {
        Self {
            app,
            runtime,
            events,
            renderer: Renderer::new(),
            out,
            viewport_px,
            sources_collapsed: false,
            stats_collapsed: false,
            resize: None,
        }
    }

    /// Installs the SIGWINCH watcher driving viewport refreshes.
    pub fn set_resize_watcher(&mut self, watcher: ResizeWatcher) {
        self.resize = Some(watcher);
    }

    /// Runs the console until `/quit` or end of input.
    pub fn run(&mut self, input: impl BufRead) -> std::io::Result<()> {
        self.app.begin_session_acquire(&mut self.runtime);
        self.render_frame()?;

        let mut lines = input.lines();
        loop {
            if self.drain_ready_events() > 0 {
                self.render_frame()?;
            }
            self.refresh_viewport();

            self.out.write_all(PROMPT.as_bytes())?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            if self.handle_line(&line?) == LoopSignal::Quit {
                break;
            }

            self.wait_for_active_turn()?;
            self.render_frame()?;
        }

        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> LoopSignal {
        if let Some(command) = parse_slash_command(line) {
            return self.dispatch_command(command);
        }

        self.app.on_input_replace(line.to_string());
        self.app.on_submit(&mut self.runtime);
        LoopSignal::Continue
    }

    fn dispatch_command(&mut self, command: SlashCommand) -> LoopSignal {
        match command {
            SlashCommand::Help => self.app.push_notice(HELP_TEXT),
            SlashCommand::New => {
                self.app.start_new_conversation(&mut self.runtime);
                if !self.app.is_busy() {
                    self.renderer.reset();
                }
            }
            SlashCommand::Sources => {
                self.sources_collapsed = !self.sources_collapsed;
                self.app.push_notice(if self.sources_collapsed {
                    SOURCES_HIDDEN_NOTICE
                } else {
                    SOURCES_SHOWN_NOTICE
                });
            }
            SlashCommand::Stats => {
                self.stats_collapsed = !self.stats_collapsed;
                self.app.push_notice(if self.stats_collapsed {
                    STATS_HIDDEN_NOTICE
                } else {
                    STATS_SHOWN_NOTICE
                });
            }
            SlashCommand::Health => self.probe_health(),
            SlashCommand::Datasets => self.list_datasets(),
            SlashCommand::Quit => return LoopSignal::Quit,
            SlashCommand::Unknown(_) => self.app.push_notice(UNKNOWN_COMMAND_NOTICE),
        }
        LoopSignal::Continue
    }

    fn probe_health(&mut self) {
        match self.runtime.backend().health() {
            Ok(report) => {
                let readiness = if report.system_ready { "ready" } else { "degraded" };
                self.app.push_notice(format!(
                    "Server {} ({readiness}, rag mode {})",
                    report.status, report.rag_mode
                ));
            }
            Err(error) => self.app.push_notice(format!("Health check failed: {error}")),
        }
    }

    fn list_datasets(&mut self) {
        match self.runtime.backend().datasets() {
            Ok(entries) if entries.is_empty() => {
                self.app.push_notice("No datasets available");
            }
            Ok(entries) => {
                for entry in entries {
                    self.app.push_notice(format!(
                        "{} ({}, {} records)",
                        entry.name, entry.category, entry.record_count
                    ));
                }
            }
            Err(error) => self.app.push_notice(format!("Dataset listing failed: {error}")),
        }
    }

    /// Blocks until the in-flight turn reaches its terminal event. Renders
    /// first so the submitted question and the loading entry are visible
    /// while the worker runs.
    fn wait_for_active_turn(&mut self) -> std::io::Result<()> {
        if !self.app.is_busy() {
            return Ok(());
        }
        self.render_frame()?;

        while self.app.is_busy() {
            match self.events.recv() {
                Ok(event) => self.apply_event(event),
                Err(_) => break,
            }
        }
        Ok(())
    }

    fn drain_ready_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    fn apply_event(&mut self, event: ConsoleEvent) {
        match event {
            ConsoleEvent::Turn(event) => self.app.apply_turn_event(event),
            ConsoleEvent::Session(event) => {
                match &event {
                    SessionEvent::Acquired { epoch, .. } => {
                        tracing::debug!(epoch = *epoch, "session acquired");
                    }
                    SessionEvent::Failed { epoch, message } => {
                        tracing::error!(epoch = *epoch, %message, "session acquisition failed");
                    }
                }
                self.app.apply_session_event(event);
            }
        }
    }

    fn render_frame(&mut self) -> std::io::Result<()> {
        let notices = self.app.take_notices();
        let columns = (self.viewport_px / COLUMN_PX) as usize;
        let lines = self.renderer.frame(
            self.app.log(),
            self.app.sources().view(),
            self.app.stats().view(),
            &notices,
            self.bounds(),
            columns,
        );
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    fn bounds(&self) -> InputBounds {
        input_bounds(self.viewport_px, self.sources_collapsed, self.stats_collapsed)
    }

    fn refresh_viewport(&mut self) {
        let Some(watcher) = self.resize.as_ref() else {
            return;
        };
        if watcher.take_resized() {
            if let Some(width) = crate::term::viewport_width_px() {
                self.viewport_px = width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chat_backend_mock::MockBackend;
    use samarth_chat::App;

    use super::{LoopSignal, Shell};
    use crate::runtime::ConsoleRuntime;

    fn shell() -> Shell<Vec<u8>> {
        let (runtime, events) = ConsoleRuntime::new(Arc::new(MockBackend::default()));
        Shell::new(App::new(), runtime, events, Vec::new(), 1280)
    }

    fn queued_notices(shell: &mut Shell<Vec<u8>>) -> Vec<String> {
        shell.app.take_notices()
    }

    #[test]
    fn help_command_queues_the_command_listing() {
        let mut shell = shell();

        assert_eq!(shell.handle_line("/help"), LoopSignal::Continue);
        assert_eq!(
            queued_notices(&mut shell),
            vec!["Commands: /help, /new, /sources, /stats, /health, /datasets, /quit".to_string()]
        );
    }

    #[test]
    fn unknown_command_points_at_help() {
        let mut shell = shell();

        assert_eq!(shell.handle_line("/frobnicate"), LoopSignal::Continue);
        assert_eq!(
            queued_notices(&mut shell),
            vec!["Type /help for help.".to_string()]
        );
    }

    #[test]
    fn quit_command_stops_the_loop() {
        let mut shell = shell();
        assert_eq!(shell.handle_line("/quit"), LoopSignal::Quit);
    }

    #[test]
    fn panel_toggles_flip_their_side_and_announce_it() {
        let mut shell = shell();

        shell.handle_line("/sources");
        assert!(shell.sources_collapsed);
        assert!(!shell.stats_collapsed);
        assert_eq!(
            queued_notices(&mut shell),
            vec!["Sources panel hidden.".to_string()]
        );

        shell.handle_line("/sources");
        assert!(!shell.sources_collapsed);
        assert_eq!(
            queued_notices(&mut shell),
            vec!["Sources panel shown.".to_string()]
        );

        shell.handle_line("/stats");
        assert!(shell.stats_collapsed);
        assert_eq!(
            queued_notices(&mut shell),
            vec!["Stats panel hidden.".to_string()]
        );
    }

    #[test]
    fn health_command_reports_the_mock_backend_status() {
        let mut shell = shell();

        shell.handle_line("/health");
        assert_eq!(
            queued_notices(&mut shell),
            vec!["Server ok (ready, rag mode mock)".to_string()]
        );
    }

    #[test]
    fn datasets_command_lists_one_notice_per_entry() {
        let mut shell = shell();

        shell.handle_line("/datasets");
        let notices = queued_notices(&mut shell);
        assert_eq!(notices.len(), 2);
        assert!(notices[0].contains("records)"));
    }

    #[test]
    fn run_renders_the_welcome_and_stops_at_end_of_input() {
        let mut shell = shell();

        shell.run("/quit\n".as_bytes()).unwrap();

        let output = String::from_utf8(shell.out.clone()).unwrap();
        assert!(output.contains("Welcome to Project Samarth"));
        assert!(output.contains("> "));
    }

    #[test]
    fn plain_lines_become_conversation_turns() {
        let mut shell = shell();

        shell.handle_line("rainfall in Punjab?");
        assert!(shell.app.is_busy());
        shell.wait_for_active_turn().unwrap();

        assert!(!shell.app.is_busy());
        assert_eq!(shell.app.log().len(), 2);
    }

    #[test]
    fn empty_lines_do_not_produce_turns() {
        let mut shell = shell();

        shell.handle_line("");
        shell.handle_line("   ");

        assert!(!shell.app.is_busy());
        assert!(shell.app.log().is_empty());
    }
}

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use chat_backend::{
    AskRequest, BackendProfile, ChatBackend, ChatReply, PipelineInfo, Source, TurnFailure,
};
use chat_backend_mock::{MockBackend, ScriptedReply};
use samarth_chat::layout::{input_bounds, InputBounds};
use samarth_chat::panels::{SourceEntry, SourcesView, StatsView};
use samarth_chat::{App, Role};
use samarth_console::commands::{parse_slash_command, SlashCommand};
use samarth_console::runtime::{ConsoleEvent, ConsoleRuntime};
use samarth_console::term::COLUMN_PX;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

fn scripted_runtime(replies: Vec<ScriptedReply>) -> (App, ConsoleRuntime, Receiver<ConsoleEvent>) {
    let (runtime, events) = ConsoleRuntime::new(Arc::new(MockBackend::new(replies)));
    (App::new(), runtime, events)
}

fn submit(app: &mut App, runtime: &mut ConsoleRuntime, text: &str) {
    app.on_input_replace(text.to_string());
    app.on_submit(runtime);
}

fn apply_next_event(app: &mut App, events: &Receiver<ConsoleEvent>) {
    match events.recv_timeout(EVENT_TIMEOUT).expect("console event") {
        ConsoleEvent::Turn(event) => app.apply_turn_event(event),
        ConsoleEvent::Session(event) => app.apply_session_event(event),
    }
}

fn punjab_reply() -> ChatReply {
    ChatReply {
        answer: "Rainfall has declined 5%.".to_string(),
        sources: vec![Source {
            name: "IMD-2023".to_string(),
            category: "climate".to_string(),
        }],
        pipeline_info: Some(PipelineInfo {
            query_variations: 2,
            retrieved_count: 10,
            reranked_count: 4,
            final_context_count: 3,
            entities: None,
        }),
        confidence: None,
    }
}

#[test]
fn punjab_question_round_trips_through_the_mock_backend() {
    let (mut app, mut runtime, events) = scripted_runtime(vec![Ok(punjab_reply())]);

    submit(&mut app, &mut runtime, "What is the rainfall outlook for Punjab?");
    assert!(app.is_busy());
    assert!(app.log().loading());

    apply_next_event(&mut app, &events);

    assert!(!app.is_busy());
    assert!(!app.log().loading());
    assert_eq!(app.log().len(), 2);

    let question = &app.log().messages()[0];
    assert_eq!(question.role, Role::User);
    assert_eq!(question.content, "What is the rainfall outlook for Punjab?");

    let answer = &app.log().messages()[1];
    assert_eq!(answer.role, Role::Assistant);
    assert_eq!(answer.content, "Rainfall has declined 5%.");
    assert!(answer.rendered_as_markup);

    assert_eq!(
        app.sources().view(),
        &SourcesView::Entries(vec![SourceEntry {
            index: 1,
            name: "IMD-2023".to_string(),
            category: "climate".to_string(),
        }])
    );
    assert_matches!(app.stats().view(), StatsView::Projected(projection) => {
        let values: Vec<(&str, u32)> = projection
            .stats
            .iter()
            .map(|line| (line.label, line.value))
            .collect();
        assert_eq!(
            values,
            vec![
                ("Query Variations", 2),
                ("Retrieved Docs", 10),
                ("After Reranking", 4),
                ("Final Context", 3),
            ]
        );
        assert_eq!(projection.entities, None);
    });
}

#[test]
fn scripted_failure_reaches_the_transcript_with_its_prefix() {
    let (mut app, mut runtime, events) =
        scripted_runtime(vec![Err(TurnFailure::application("Question is required"))]);

    submit(&mut app, &mut runtime, "anything");
    apply_next_event(&mut app, &events);

    assert!(!app.is_busy());
    let message = app.log().messages().last().expect("failure message");
    assert_eq!(message.content, "⚠️ Error: Question is required");
}

#[test]
fn session_acquisition_completes_over_the_channel() {
    let (mut app, mut runtime, events) = scripted_runtime(Vec::new());

    app.begin_session_acquire(&mut runtime);
    assert_eq!(app.session_id(), None);

    apply_next_event(&mut app, &events);

    assert!(app.session_id().is_some());
}

#[test]
fn worker_panic_is_reported_as_transport_failure() {
    struct PanickingBackend;

    impl ChatBackend for PanickingBackend {
        fn profile(&self) -> BackendProfile {
            BackendProfile {
                backend_id: "panicking".to_string(),
                base_url: None,
            }
        }

        fn create_session(&self) -> Result<String, String> {
            Ok("session-1".to_string())
        }

        fn ask(&self, _req: AskRequest) -> Result<ChatReply, TurnFailure> {
            panic!("backend exploded");
        }
    }

    let (mut runtime, events) = ConsoleRuntime::new(Arc::new(PanickingBackend));
    let mut app = App::new();

    submit(&mut app, &mut runtime, "will this survive?");
    apply_next_event(&mut app, &events);

    assert!(!app.is_busy());
    let message = app.log().messages().last().expect("panic message");
    assert_eq!(message.content, "⚠️ Network error: Chat backend panicked");
}

#[test]
fn console_columns_map_onto_the_breakpoint_table() {
    assert_eq!(
        input_bounds(200 * COLUMN_PX, false, false),
        InputBounds { left: 300, right: 320 }
    );
    assert_eq!(
        input_bounds(160 * COLUMN_PX, false, false),
        InputBounds { left: 280, right: 300 }
    );
    assert_eq!(
        input_bounds(80 * COLUMN_PX, false, false),
        InputBounds { left: 0, right: 0 }
    );
}

#[test]
fn parser_recognizes_known_and_unknown_slash_commands() {
    assert_eq!(parse_slash_command("plain question"), None);
    assert_eq!(parse_slash_command("/help"), Some(SlashCommand::Help));
    assert_eq!(parse_slash_command("/new"), Some(SlashCommand::New));
    assert_eq!(parse_slash_command("/sources"), Some(SlashCommand::Sources));
    assert_eq!(parse_slash_command("/stats"), Some(SlashCommand::Stats));
    assert_eq!(parse_slash_command("/health"), Some(SlashCommand::Health));
    assert_eq!(parse_slash_command("/datasets"), Some(SlashCommand::Datasets));
    assert_eq!(parse_slash_command("/quit"), Some(SlashCommand::Quit));
    assert_eq!(
        parse_slash_command("/nope extra args"),
        Some(SlashCommand::Unknown("/nope".to_string()))
    );
}

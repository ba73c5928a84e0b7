pub const HELP_TEXT: &str =
    "Commands: /help, /new, /sources, /stats, /health, /datasets, /quit";
pub const UNKNOWN_COMMAND_NOTICE: &str = "Type /help for help.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    New,
    Sources,
    Stats,
    Health,
    Datasets,
    Quit,
    Unknown(String),
}

pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let command = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_string();

    let parsed = match command.as_str() {
        "/help" => SlashCommand::Help,
        "/new" => SlashCommand::New,
        "/sources" => SlashCommand::Sources,
        "/stats" => SlashCommand::Stats,
        "/health" => SlashCommand::Health,
        "/datasets" => SlashCommand::Datasets,
        "/quit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(command),
    };

    Some(parsed)
}

use std::io;

use samarth_chat::App;
use samarth_console::backends::backend_from_env;
use samarth_console::config::EnvConfig;
use samarth_console::runtime::ConsoleRuntime;
use samarth_console::shell::Shell;
use samarth_console::term::{self, ResizeWatcher, COLUMN_PX};

// Fallback viewport when stdout is not a terminal.
const DEFAULT_VIEWPORT_PX: u32 = COLUMN_PX * 80;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .init();

    let config = EnvConfig::from_env().map_err(io::Error::other)?;
    let backend = backend_from_env(&config).map_err(io::Error::other)?;
    let profile = backend.profile();
    tracing::info!(
        backend_id = %profile.backend_id,
        base_url = profile.base_url.as_deref().unwrap_or("-"),
        "starting samarth console"
    );

    let app = App::with_category(config.category);
    let (runtime, events) = ConsoleRuntime::new(backend);
    let viewport_px = term::viewport_width_px().unwrap_or(DEFAULT_VIEWPORT_PX);

    let mut shell = Shell::new(app, runtime, events, io::stdout(), viewport_px);
    match ResizeWatcher::start() {
        Ok(watcher) => shell.set_resize_watcher(watcher),
        Err(error) => tracing::warn!(%error, "resize watching disabled"),
    }

    shell.run(io::stdin().lock())
}

mod config;
mod events;
mod gui;
mod sys;

use clap::{Parser, Subcommand};
use events::ControlCommand;
use gui::editor::EditorModel;
use gui::host::HostModel;
use radial::editor::EditorSession;
use relm4::prelude::*;
use std::io::Write;
use std::os::unix::net::UnixStream;
use sys::runtime;
use sys::server::SOCKET_PATH;

#[derive(Parser, Debug)]
#[command(name = "radial-menu", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Run the host window with the hold gesture installed (default).
    Host,
    /// Open the preset editor.
    Editor,
    /// Send a command to a running host.
    Ctl {
        #[command(subcommand)]
        action: CtlAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum CtlAction {
    /// Install the detector, or flip it on and off.
    Toggle,
    Enable,
    Disable,
    /// Flip smart preset selection, or force it with `on`/`off`.
    Smart { state: Option<String> },
    /// Make a preset the active one.
    Preset { name: String },
    /// Remove the detector entirely.
    Uninstall,
}

impl CtlAction {
    fn into_command(self) -> anyhow::Result<ControlCommand> {
        Ok(match self {
            CtlAction::Toggle => ControlCommand::Toggle,
            CtlAction::Enable => ControlCommand::Enable,
            CtlAction::Disable => ControlCommand::Disable,
            CtlAction::Smart { state: None } => ControlCommand::Smart(None),
            CtlAction::Smart { state: Some(state) } => format!("smart {state}").parse::<ControlCommand>()?,
            CtlAction::Preset { name } => ControlCommand::Preset(name),
            CtlAction::Uninstall => ControlCommand::Uninstall,
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Host) {
        Commands::Host => run_host(),
        Commands::Editor => run_editor(),
        Commands::Ctl { action } => send_command(&action.into_command()?),
    }
}

fn run_host() -> anyhow::Result<()> {
    let settings = config::load_or_default();
    let store = settings.document_store()?;
    // creates the document with its starter preset on first run
    store.load()?;

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(tx, store.path().to_path_buf(), true);

    let app = RelmApp::new("org.radial.menu").with_args(Vec::new());
    app.run::<HostModel>((settings, store, rx));
    Ok(())
}

fn run_editor() -> anyhow::Result<()> {
    let settings = config::load_or_default();
    let store = settings.document_store()?;
    let path = store.path().to_path_buf();
    let session = EditorSession::open(store)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(tx, path, false);

    let app = RelmApp::new("org.radial.menu.editor").with_args(Vec::new());
    app.run::<EditorModel>((session, rx));
    Ok(())
}

fn send_command(cmd: &ControlCommand) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to radial-menu at {}: {}. Is the host running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}

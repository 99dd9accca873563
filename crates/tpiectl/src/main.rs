use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use tpie::input::KeyCode;
use tpie::sys::server::SOCKET_PATH;

#[derive(Parser, Debug)]
#[command(name = "tpiectl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Direction {
    Down,
    Up,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Report a key transition, e.g. from a compositor bind
    Key {
        direction: Direction,
        /// Key name such as "LAlt", "Q" or "Control_L"
        key: KeyCode,
    },
    /// Show a ring at the center of the screen until `end-preview`
    Preview { ring: String },
    /// Hide a ring shown with `preview`
    EndPreview { ring: String },
    /// Record a new keybind for a ring from the next held combination
    Rebind { ring: String },
    /// Reload the configuration file
    Reload,
}

impl Commands {
    fn to_line(&self) -> String {
        match self {
            Commands::Key {
                direction: Direction::Down,
                key,
            } => format!("key-down {}", key),
            Commands::Key {
                direction: Direction::Up,
                key,
            } => format!("key-up {}", key),
            Commands::Preview { ring } => format!("preview {}", ring),
            Commands::EndPreview { ring } => format!("end-preview {}", ring),
            Commands::Rebind { ring } => format!("rebind {}", ring),
            Commands::Reload => "reload".to_string(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    send_command(&cli.command.to_line())
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to tpie at {}: {}. Is tpie running?",
            SOCKET_PATH,
            e
        )
    })?;

    log::debug!("Sending '{}'", cmd);
    writeln!(stream, "{}", cmd)?;

    let mut reply = String::new();
    BufReader::new(stream).read_line(&mut reply)?;
    match reply.trim().strip_prefix("error: ") {
        Some(error) => anyhow::bail!("tpie rejected '{}': {}", cmd, error),
        None => Ok(()),
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod paths;
mod render;

#[derive(Parser)]
#[command(name = "kaybee")]
#[command(version, about = "Kanban boards in your terminal")]
pub struct Cli {
    /// Config file (defaults to <config dir>/kaybee/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Board to open, as a location fragment (e.g. "#2"). Empty opens the default board.
    #[arg(short, long, global = true, default_value = "")]
    pub board: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the active board
    Show {
        /// Only show cards of this color (yellow, blue, green, pink)
        #[arg(long)]
        color: Option<String>,
    },
    /// Manage boards
    Boards {
        #[command(subcommand)]
        command: BoardsCommands,
    },
    /// Edit columns of the active board
    Column {
        #[command(subcommand)]
        command: ColumnCommands,
    },
    /// Edit cards of the active board
    Card {
        #[command(subcommand)]
        command: CardCommands,
    },
    /// Replace the active board with an empty To Do / Doing / Done board
    Reset,
    /// Write the active board as markdown
    Export {
        /// Directory for the export file (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Toggle a display preference
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
}

#[derive(Subcommand, Clone)]
pub enum BoardsCommands {
    /// List known boards
    List,
    /// Create the next numbered board and open it
    Add,
    /// Delete the active board
    Delete,
    /// Rename the active board
    Rename { name: String },
}

#[derive(Subcommand, Clone)]
pub enum ColumnCommands {
    Add,
    Rename { id: String, title: String },
    Delete { id: String },
}

#[derive(Subcommand, Clone)]
pub enum CardCommands {
    /// Add a card to a column
    Add { column: String },
    Edit { id: String, text: String },
    Color { id: String, color: String },
    /// Move a card to the end of another column
    Move {
        id: String,
        to: String,
        /// Column the card is believed to be in
        #[arg(long, default_value = "")]
        from: String,
    },
    Delete { id: String, column: String },
}

#[derive(Subcommand, Clone)]
pub enum PrefsCommands {
    Font,
    Theme,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = commands::run(cli) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

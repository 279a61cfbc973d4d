/// Command handlers: each turns a parsed subcommand into session calls and
/// returns the text to print.
use std::fs;
use std::path::PathBuf;

use kaybee_core::config::load_config;
use kaybee_core::export::export_file_name;
use kaybee_core::filter::ColorFilter;
use kaybee_core::router::fragment_for;
use kaybee_core::{
    BoardDeletion, CardColor, Command, JsonFileStore, KeyValueStore, Outcome, Session,
};

use crate::paths;
use crate::render;
use crate::{BoardsCommands, CardCommands, Cli, ColumnCommands, Commands, PrefsCommands};

pub fn run(cli: Cli) -> Result<(), String> {
    let config_path = cli.config.unwrap_or_else(paths::default_config_path);
    let config = load_config(&config_path);
    let store = JsonFileStore::open(paths::store_path(&config));

    let mut session = Session::open(store, &config, &cli.board).map_err(|e| e.to_string())?;
    if session.storage_is_fallback() {
        eprintln!("warning: board storage is unavailable, changes will not be saved");
    }

    let output = execute(&mut session, cli.command)?;
    print!("{}", output);
    Ok(())
}

pub fn execute<S: KeyValueStore>(
    session: &mut Session<S>,
    command: Commands,
) -> Result<String, String> {
    match command {
        Commands::Show { color } => {
            let mut filter = ColorFilter::new();
            if let Some(color) = color {
                filter.toggle(parse_color(&color)?);
            }
            Ok(render::render_board(session.board(), &session.location(), &filter))
        }
        Commands::Boards { command } => boards(session, command),
        Commands::Column { command } => column(session, command),
        Commands::Card { command } => card(session, command),
        Commands::Reset => {
            session.apply(Command::Reset);
            Ok(format!("Reset board {}\n", session.location()))
        }
        Commands::Export { out } => {
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            let name = export_file_name(
                session.keys().namespace(),
                chrono::Utc::now().timestamp_millis(),
            );
            let path = dir.join(name);
            fs::write(&path, session.export_markdown()).map_err(|e| e.to_string())?;
            log::info!("[kaybee.cli] Exported {} to {}", session.location(), path.display());
            Ok(format!("Exported to {}\n", path.display()))
        }
        Commands::Prefs { command } => match command {
            PrefsCommands::Font => Ok(format!("font: {}\n", session.toggle_font())),
            PrefsCommands::Theme => Ok(format!("theme: {}\n", session.toggle_theme())),
        },
    }
}

fn boards<S: KeyValueStore>(
    session: &mut Session<S>,
    command: BoardsCommands,
) -> Result<String, String> {
    match command {
        BoardsCommands::List => Ok(render::render_boards(
            session.list_boards(),
            session.current_board_id(),
        )),
        BoardsCommands::Add => {
            let id = session.add_board();
            session
                .navigate(&fragment_for(&id))
                .map_err(|e| e.to_string())?;
            Ok(format!("Created board {}\n", session.location()))
        }
        BoardsCommands::Delete => {
            let id = session.current_board_id().to_string();
            match session.delete_board(&id).map_err(|e| e.to_string())? {
                BoardDeletion::Removed => Ok(format!("Deleted board #{}\n", id)),
                BoardDeletion::Switched { to } | BoardDeletion::Reset { to } => Ok(format!(
                    "Deleted board #{}, now on {}\n",
                    id,
                    fragment_for(&to)
                )),
            }
        }
        BoardsCommands::Rename { name } => {
            let id = session.current_board_id().to_string();
            let outcome = session.rename_board(&id, &name);
            Ok(rename_message(outcome, &id, &name))
        }
    }
}

fn column<S: KeyValueStore>(
    session: &mut Session<S>,
    command: ColumnCommands,
) -> Result<String, String> {
    let result = match command {
        ColumnCommands::Add => session.apply(Command::AddColumn),
        ColumnCommands::Rename { id, title } => session.apply(Command::RenameColumn {
            column_id: id,
            title,
        }),
        ColumnCommands::Delete { id } => session.apply(Command::DeleteColumn { column_id: id }),
    };
    Ok(describe(result.outcome, result.created_id))
}

fn card<S: KeyValueStore>(
    session: &mut Session<S>,
    command: CardCommands,
) -> Result<String, String> {
    let command = match command {
        CardCommands::Add { column } => Command::AddCard { column_id: column },
        CardCommands::Edit { id, text } => Command::EditCardText { card_id: id, text },
        CardCommands::Color { id, color } => Command::SetCardColor {
            card_id: id,
            color: parse_color(&color)?,
        },
        CardCommands::Move { id, to, from } => Command::MoveCard {
            card_id: id,
            from_column_id: from,
            to_column_id: to,
        },
        CardCommands::Delete { id, column } => Command::DeleteCard {
            card_id: id,
            column_id: column,
        },
    };
    let result = session.apply(command);
    Ok(describe(result.outcome, result.created_id))
}

fn describe(outcome: Outcome, created_id: Option<String>) -> String {
    match (outcome, created_id) {
        (Outcome::Changed, Some(id)) => format!("{}\n", id),
        (Outcome::Changed, None) => "ok\n".to_string(),
        (Outcome::Unchanged, _) => "nothing changed\n".to_string(),
    }
}

fn rename_message(outcome: Outcome, id: &str, name: &str) -> String {
    match outcome {
        Outcome::Changed => format!("Renamed board #{} to {}\n", id, name),
        Outcome::Unchanged => describe(outcome, None),
    }
}

/// Palette colors only; free-form tokens are rejected on the command line.
fn parse_color(raw: &str) -> Result<CardColor, String> {
    match CardColor::parse(raw) {
        CardColor::Other(_) => Err(format!(
            "unknown color '{}' (expected yellow, blue, green or pink)",
            raw
        )),
        color => Ok(color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaybee_core::{KaybeeConfig, MemoryStore};
    use tempfile::TempDir;

    fn session() -> Session<MemoryStore> {
        Session::open(MemoryStore::new(), &KaybeeConfig::default(), "").unwrap()
    }

    #[test]
    fn test_card_add_prints_id() {
        let mut session = session();
        let out = execute(
            &mut session,
            Commands::Card {
                command: CardCommands::Add {
                    column: "col-1".into(),
                },
            },
        )
        .unwrap();
        let id = out.trim();
        assert!(session.board().find_card(id).is_some());
    }

    #[test]
    fn test_unknown_column_reports_no_change() {
        let mut session = session();
        let out = execute(
            &mut session,
            Commands::Column {
                command: ColumnCommands::Delete { id: "col-9".into() },
            },
        )
        .unwrap();
        assert_eq!(out, "nothing changed\n");
    }

    #[test]
    fn test_bad_color_is_an_error() {
        let mut session = session();
        let result = execute(
            &mut session,
            Commands::Show {
                color: Some("mauve".into()),
            },
        );
        assert!(result.unwrap_err().contains("mauve"));
    }

    #[test]
    fn test_boards_add_then_delete() {
        let mut session = session();
        let out = execute(
            &mut session,
            Commands::Boards {
                command: BoardsCommands::Add,
            },
        )
        .unwrap();
        assert_eq!(out, "Created board #2\n");
        assert_eq!(session.current_board_id(), "2");

        let out = execute(
            &mut session,
            Commands::Boards {
                command: BoardsCommands::Delete,
            },
        )
        .unwrap();
        assert_eq!(out, "Deleted board #2, now on #1\n");
    }

    #[test]
    fn test_rename_reports_outcome() {
        let mut session = session();
        let rename = |name: &str| Commands::Boards {
            command: BoardsCommands::Rename { name: name.into() },
        };
        let out = execute(&mut session, rename("Home")).unwrap();
        assert_eq!(out, "Renamed board #1 to Home\n");
        assert_eq!(session.list_boards()[0].name, "Home");
        assert_eq!(rename_message(Outcome::Unchanged, "9", "x"), "nothing changed\n");
    }

    #[test]
    fn test_export_writes_markdown_file() {
        let dir = TempDir::new().unwrap();
        let mut session = session();
        let out = execute(
            &mut session,
            Commands::Export {
                out: Some(dir.path().to_path_buf()),
            },
        )
        .unwrap();
        assert!(out.starts_with("Exported to "));

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().flatten().collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].file_name().to_string_lossy().to_string();
        assert!(name.starts_with("kaybee_") && name.ends_with(".md"));
        let content = fs::read_to_string(entries[0].path()).unwrap();
        assert!(content.starts_with("# Kaybee Board Export\n\n## To Do\n(No cards)\n"));
    }
}

/// Markdown export of a board.
///
/// Output format:
///   # Kaybee Board Export
///
///   ## <column title>
///   - <card text>            (one per card, or "(No cards)")
///   <blank line after every column>
use crate::types::Board;

pub const EXPORT_HEADING: &str = "# Kaybee Board Export";
pub const EMPTY_COLUMN_LINE: &str = "(No cards)";

/// Render a board as a markdown document. Pure and deterministic.
pub fn export_markdown(board: &Board) -> String {
    let mut markdown = format!("{}\n\n", EXPORT_HEADING);
    for column in &board.columns {
        markdown.push_str(&format!("## {}\n", column.title));
        if column.cards.is_empty() {
            markdown.push_str(EMPTY_COLUMN_LINE);
            markdown.push('\n');
        } else {
            for card in &column.cards {
                markdown.push_str(&format!("- {}\n", card.text));
            }
        }
        markdown.push('\n');
    }
    markdown
}

/// File name for an export taken at `timestamp_ms`: `<namespace>_<ms>.md`.
pub fn export_file_name(namespace: &str, timestamp_ms: i64) -> String {
    format!("{}_{}.md", namespace, timestamp_ms)
}

/// Plain-text rendering of boards for the terminal.
use kaybee_core::filter::ColorFilter;
use kaybee_core::{Board, BoardEntry};

/// Board as text: one section per column, one line per visible card.
pub fn render_board(board: &Board, location: &str, filter: &ColorFilter) -> String {
    let mut out = format!("Board {}", location);
    if let Some(color) = filter.active() {
        out.push_str(&format!("  [only {}]", color));
    }
    out.push('\n');

    for column in &board.columns {
        out.push_str(&format!("\n{} ({})  [{}]\n", column.title, column.cards.len(), column.id));
        let mut shown = 0;
        for card in filter.visible_cards(column) {
            out.push_str(&format!("  - {}  <{}> [{}]\n", card.text, card.color, card.id));
            shown += 1;
        }
        if shown == 0 {
            out.push_str("  (No cards)\n");
        }
    }
    out
}

/// Registry listing, marking the active board with `*`.
pub fn render_boards(entries: &[BoardEntry], current: &str) -> String {
    entries
        .iter()
        .map(|entry| {
            let marker = if entry.id == current { '*' } else { ' ' };
            format!("{} #{}  {}\n", marker, entry.id, entry.name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaybee_core::{Card, CardColor};

    fn board() -> Board {
        let mut board = Board::default();
        board.columns[0].cards.push(Card {
            id: "card-1".into(),
            text: "Plan".into(),
            color: CardColor::Blue,
        });
        board.columns[0].cards.push(Card {
            id: "card-2".into(),
            text: "Build".into(),
            color: CardColor::Pink,
        });
        board
    }

    #[test]
    fn test_render_board_lists_cards() {
        let text = render_board(&board(), "#1", &ColorFilter::new());
        assert!(text.starts_with("Board #1\n"));
        assert!(text.contains("To Do (2)  [col-1]"));
        assert!(text.contains("  - Plan  <blue> [card-1]"));
        assert_eq!(text.matches("(No cards)").count(), 2);
    }

    #[test]
    fn test_render_board_with_filter() {
        let mut filter = ColorFilter::new();
        filter.toggle(CardColor::Pink);
        let text = render_board(&board(), "#1", &filter);
        assert!(text.contains("[only pink]"));
        assert!(text.contains("Build"));
        assert!(!text.contains("Plan"));
    }

    #[test]
    fn test_render_boards_marks_current() {
        let entries = vec![BoardEntry::named_after("1"), BoardEntry::named_after("2")];
        assert_eq!(render_boards(&entries, "2"), "  #1  Board 1\n* #2  Board 2\n");
    }
}

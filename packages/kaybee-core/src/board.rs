/// Board mutations.
///
/// Every operation either applies fully or not at all and reports whether the
/// board changed. An unknown column or card id is a silent no-op
/// (`Outcome::Unchanged`), never an error. Lookups are first-match-by-id.
use chrono::Utc;
use uuid::Uuid;

use crate::types::{Board, Card, CardColor, Column, NEW_CARD_TEXT, NEW_COLUMN_TITLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

impl Outcome {
    pub fn is_changed(self) -> bool {
        self == Outcome::Changed
    }
}

impl From<bool> for Outcome {
    fn from(changed: bool) -> Self {
        if changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }
}

/// Fresh id for a new card or column: `<prefix>-<millis hex>-<8 random hex>`.
/// Re-drawn until it is unused on `board`. Carries no ordering meaning.
pub fn generate_id(prefix: &str, board: &Board) -> String {
    loop {
        let ts = Utc::now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();
        let id = format!("{}-{:x}-{}", prefix, ts, &random[..8]);
        if !board.contains_id(&id) {
            return id;
        }
    }
}

/// Uniform pick from the four-color palette.
pub fn random_color() -> CardColor {
    // 256 is a multiple of 4, so the byte maps uniformly
    let byte = Uuid::new_v4().as_bytes()[0];
    CardColor::PALETTE[(byte as usize) % CardColor::PALETTE.len()].clone()
}

impl Board {
    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    /// Locate a card anywhere on the board, with its owning column.
    pub fn find_card(&self, card_id: &str) -> Option<(&Column, &Card)> {
        self.columns.iter().find_map(|col| {
            col.cards
                .iter()
                .find(|card| card.id == card_id)
                .map(|card| (col, card))
        })
    }

    fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.columns
            .iter_mut()
            .flat_map(|col| col.cards.iter_mut())
            .find(|card| card.id == card_id)
    }

    /// Whether any column or card uses this id.
    pub fn contains_id(&self, id: &str) -> bool {
        self.columns
            .iter()
            .any(|col| col.id == id || col.cards.iter().any(|card| card.id == id))
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|col| col.cards.len()).sum()
    }

    /// Append an empty `New Column`. Returns its id.
    pub fn add_column(&mut self) -> String {
        let id = generate_id("col", self);
        self.columns.push(Column::new(id.clone(), NEW_COLUMN_TITLE));
        id
    }

    pub fn rename_column(&mut self, column_id: &str, title: &str) -> Outcome {
        match self.column_mut(column_id) {
            Some(col) if col.title != title => {
                col.title = title.to_string();
                Outcome::Changed
            }
            _ => Outcome::Unchanged,
        }
    }

    /// Remove a column together with all of its cards.
    pub fn delete_column(&mut self, column_id: &str) -> Outcome {
        match self.columns.iter().position(|c| c.id == column_id) {
            Some(index) => {
                self.columns.remove(index);
                Outcome::Changed
            }
            None => Outcome::Unchanged,
        }
    }

    /// Append a `New Card` with a random palette color to a column.
    /// Returns the new card's id, or `None` if the column is unknown.
    pub fn add_card(&mut self, column_id: &str) -> Option<String> {
        self.column(column_id)?;
        let card = Card {
            id: generate_id("card", self),
            text: NEW_CARD_TEXT.to_string(),
            color: random_color(),
        };
        let id = card.id.clone();
        self.column_mut(column_id)?.cards.push(card);
        Some(id)
    }

    pub fn edit_card_text(&mut self, card_id: &str, text: &str) -> Outcome {
        match self.card_mut(card_id) {
            Some(card) if card.text != text => {
                card.text = text.to_string();
                Outcome::Changed
            }
            _ => Outcome::Unchanged,
        }
    }

    pub fn set_card_color(&mut self, card_id: &str, color: CardColor) -> Outcome {
        match self.card_mut(card_id) {
            Some(card) if card.color != color => {
                card.color = color;
                Outcome::Changed
            }
            _ => Outcome::Unchanged,
        }
    }

    /// Move a card to the end of `to_column_id`.
    ///
    /// `from_column_id` is advisory: the card is located and removed by a
    /// scan of every column, so a stale source still ends with the card in
    /// exactly one column. No-op if the card or the target is unknown.
    pub fn move_card(&mut self, card_id: &str, _from_column_id: &str, to_column_id: &str) -> Outcome {
        let Some(target) = self.column(to_column_id) else {
            return Outcome::Unchanged;
        };
        let Some((_, card)) = self.find_card(card_id) else {
            return Outcome::Unchanged;
        };

        let already_placed = target.cards.last().map_or(false, |last| last.id == card_id)
            && self
                .columns
                .iter()
                .flat_map(|col| col.cards.iter())
                .filter(|c| c.id == card_id)
                .count()
                == 1;
        if already_placed {
            return Outcome::Unchanged;
        }

        let card = card.clone();
        for col in &mut self.columns {
            col.cards.retain(|c| c.id != card_id);
        }
        if let Some(target) = self.column_mut(to_column_id) {
            target.cards.push(card);
        }
        Outcome::Changed
    }

    /// Remove a card from the given column only.
    pub fn delete_card(&mut self, card_id: &str, column_id: &str) -> Outcome {
        let Some(col) = self.column_mut(column_id) else {
            return Outcome::Unchanged;
        };
        match col.cards.iter().position(|c| c.id == card_id) {
            Some(index) => {
                col.cards.remove(index);
                Outcome::Changed
            }
            None => Outcome::Unchanged,
        }
    }

    /// Replace everything with the canonical three-column board.
    pub fn reset(&mut self) -> Outcome {
        let fresh = Board::default();
        if *self == fresh {
            return Outcome::Unchanged;
        }
        *self = fresh;
        Outcome::Changed
    }
}

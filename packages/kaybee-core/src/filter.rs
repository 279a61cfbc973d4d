use crate::types::{Card, CardColor, Column};

/// "Show only one color" view state. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFilter {
    active: Option<CardColor>,
}

impl ColorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&CardColor> {
        self.active.as_ref()
    }

    /// Selecting the active color again turns the filter off; any other
    /// color replaces it.
    pub fn toggle(&mut self, color: CardColor) {
        let same = self
            .active
            .as_ref()
            .map_or(false, |active| active.key() == color.key());
        self.active = if same { None } else { Some(color) };
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Every card matches when no filter is active.
    pub fn matches(&self, card: &Card) -> bool {
        match &self.active {
            Some(active) => active.key() == card.color.key(),
            None => true,
        }
    }

    pub fn visible_cards<'a>(&'a self, column: &'a Column) -> impl Iterator<Item = &'a Card> + 'a {
        column.cards.iter().filter(move |card| self.matches(card))
    }
}

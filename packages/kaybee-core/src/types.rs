use serde::{Deserialize, Serialize};

/// `(id, title)` of each column of a fresh board.
pub const DEFAULT_COLUMN_TITLES: [(&str, &str); 3] =
    [("col-1", "To Do"), ("col-2", "Doing"), ("col-3", "Done")];

pub const NEW_COLUMN_TITLE: &str = "New Column";
pub const NEW_CARD_TEXT: &str = "New Card";

/// Opaque board identifier, surfaced through the location fragment.
pub type BoardId = String;

/// Card color tag.
///
/// Persisted as the raw CSS token (`var(--card-yellow)`), which is what the
/// board has always written. Older data may carry the bare name (`yellow`);
/// both forms parse to the same variant. Anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardColor {
    #[default]
    Yellow,
    Blue,
    Green,
    Pink,
    Other(String),
}

impl CardColor {
    /// The fixed palette new cards draw from.
    pub const PALETTE: [CardColor; 4] = [
        CardColor::Yellow,
        CardColor::Blue,
        CardColor::Green,
        CardColor::Pink,
    ];

    /// Bare color name (`yellow`), or the stored string for unknown colors.
    pub fn name(&self) -> &str {
        match self {
            CardColor::Yellow => "yellow",
            CardColor::Blue => "blue",
            CardColor::Green => "green",
            CardColor::Pink => "pink",
            CardColor::Other(raw) => raw,
        }
    }

    /// Token as written to storage.
    pub fn token(&self) -> String {
        match self {
            CardColor::Other(raw) => raw.clone(),
            known => format!("var(--card-{})", known.name()),
        }
    }

    /// Parse either a CSS token or a bare name.
    pub fn parse(raw: &str) -> Self {
        match normalize_color(raw).as_str() {
            "yellow" => CardColor::Yellow,
            "blue" => CardColor::Blue,
            "green" => CardColor::Green,
            "pink" => CardColor::Pink,
            _ => CardColor::Other(raw.to_string()),
        }
    }

    /// Normalized comparison key, so `yellow` and `var(--card-yellow)` match.
    pub fn key(&self) -> String {
        normalize_color(&self.token())
    }
}

/// Strip the `var(--card-` wrapper from a color token.
pub fn normalize_color(raw: &str) -> String {
    raw.replace("var(--card-", "").replace(')', "").trim().to_string()
}

impl From<String> for CardColor {
    fn from(raw: String) -> Self {
        CardColor::parse(&raw)
    }
}

impl From<CardColor> for String {
    fn from(color: CardColor) -> Self {
        color.token()
    }
}

impl std::fmt::Display for CardColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub color: CardColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards: Vec::new(),
        }
    }
}

/// A board: ordered columns of ordered cards. The unit of persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Default for Board {
    /// The canonical fresh board: `To Do`, `Doing`, `Done`, all empty.
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMN_TITLES
                .iter()
                .map(|(id, title)| Column::new(*id, *title))
                .collect(),
        }
    }
}

/// One entry of the board registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEntry {
    pub id: BoardId,
    pub name: String,
}

impl BoardEntry {
    /// Entry with the generated display name `Board <id>`.
    pub fn named_after(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Board {}", id),
        }
    }
}

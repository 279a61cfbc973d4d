/// Typed board intents issued by a view.
///
/// A view never edits the board directly: it sends a `Command` to
/// `Session::apply` and re-renders from the returned outcome.
use serde::{Deserialize, Serialize};

use crate::board::Outcome;
use crate::types::CardColor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    AddColumn,
    RenameColumn {
        column_id: String,
        title: String,
    },
    DeleteColumn {
        column_id: String,
    },
    AddCard {
        column_id: String,
    },
    EditCardText {
        card_id: String,
        text: String,
    },
    SetCardColor {
        card_id: String,
        color: CardColor,
    },
    MoveCard {
        card_id: String,
        from_column_id: String,
        to_column_id: String,
    },
    DeleteCard {
        card_id: String,
        column_id: String,
    },
    Reset,
}

/// Result of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub outcome: Outcome,
    /// Id of the column or card the command created, if any.
    pub created_id: Option<String>,
}

impl CommandOutcome {
    pub fn changed(created_id: Option<String>) -> Self {
        Self {
            outcome: Outcome::Changed,
            created_id,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.outcome.is_changed()
    }
}

impl From<Outcome> for CommandOutcome {
    fn from(outcome: Outcome) -> Self {
        Self {
            outcome,
            created_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_format() {
        let cmd = Command::MoveCard {
            card_id: "card-1".into(),
            from_column_id: "col-1".into(),
            to_column_id: "col-3".into(),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "moveCard");
        assert_eq!(json["card_id"], "card-1");

        let parsed: Command =
            serde_json::from_str(r#"{"type":"setCardColor","card_id":"c","color":"green"}"#)
                .unwrap();
        assert_eq!(
            parsed,
            Command::SetCardColor {
                card_id: "c".into(),
                color: CardColor::Green
            }
        );
    }
}

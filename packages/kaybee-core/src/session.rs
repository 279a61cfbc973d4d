/// Session state: the storage adapter, the board registry, the active board
/// and the router, owned together.
///
/// Every mutating operation writes through to storage before returning.
/// Operations that miss their target return `Outcome::Unchanged` and write
/// nothing.
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::board::Outcome;
use crate::command::{Command, CommandOutcome};
use crate::config::KaybeeConfig;
use crate::export;
use crate::keys::StorageKeys;
use crate::preferences::{Font, Theme};
use crate::registry::BoardRegistry;
use crate::router::{RouteEvent, Router};
use crate::storage::{KeyValueStore, SafeStorage};
use crate::types::{Board, BoardEntry, BoardId, CardColor};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Malformed payload under {key}: {source}")]
    MalformedPayload {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// What happened to the active board after `delete_board`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardDeletion {
    /// A board other than the active one was deleted.
    Removed,
    /// The active board was deleted; the session switched to another board.
    Switched { to: BoardId },
    /// The last board was deleted; the session re-initialized on the default id.
    Reset { to: BoardId },
}

pub struct Session<S> {
    storage: SafeStorage<S>,
    keys: StorageKeys,
    registry: BoardRegistry,
    board: Board,
    router: Router,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session on the board named by `fragment` (default board when
    /// empty). Runs the legacy migration, seeds an empty registry and loads
    /// the active board.
    pub fn open(store: S, config: &KaybeeConfig, fragment: &str) -> Result<Self, SessionError> {
        let mut session = Self {
            storage: SafeStorage::new(store),
            keys: StorageKeys::new(config.namespace.clone()),
            registry: BoardRegistry::default(),
            board: Board::default(),
            router: Router::start(fragment, &config.default_board_id),
        };
        session.initialize()?;
        Ok(session)
    }

    /// Load registry and active board from storage, as on a fresh start.
    fn initialize(&mut self) -> Result<(), SessionError> {
        self.migrate_legacy();

        let meta_key = self.keys.boards_meta();
        let mut registry: BoardRegistry =
            Self::read_json(&mut self.storage, &meta_key)?.unwrap_or_default();
        let mut changed = false;
        if registry.is_empty() {
            log::info!("[kaybee.registry] Empty registry, seeding #{}", self.router.default_id());
            registry = BoardRegistry::seeded(self.router.default_id());
            changed = true;
        }
        changed |= registry.ensure_known(self.router.current());

        let current = self.router.current().to_string();
        let board = self.read_board(&current)?;

        self.registry = registry;
        if changed {
            self.save_registry();
        }
        self.install_board(board);
        Ok(())
    }

    /// One-time copy of the pre-multi-board payload into the default board key.
    /// Only runs on the default board, and only while that board has no data.
    fn migrate_legacy(&mut self) {
        if !self.router.is_on_default() {
            return;
        }
        let board_key = self.keys.board(self.router.default_id());
        if self.storage.get(&board_key).is_some() {
            return;
        }
        let legacy_key = self.keys.legacy_data();
        if let Some(legacy) = self.storage.get(&legacy_key) {
            log::info!("[kaybee.session] Migrating {} to {}", legacy_key, board_key);
            self.storage.set(&board_key, &legacy);
            self.storage.remove(&legacy_key);
        }
    }

    // ------------------------------------------------------------------
    // Persistence helpers
    // ------------------------------------------------------------------

    fn read_json<T: DeserializeOwned>(
        storage: &mut SafeStorage<S>,
        key: &str,
    ) -> Result<Option<T>, SessionError> {
        match storage.get(key) {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|source| {
                log::error!("[kaybee.session] Cannot parse {}: {}", key, source);
                SessionError::MalformedPayload {
                    key: key.to_string(),
                    source,
                }
            }),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(storage: &mut SafeStorage<S>, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => storage.set(key, &json),
            Err(e) => log::error!("[kaybee.session] Cannot serialize {}: {}", key, e),
        }
    }

    /// Read a board without switching to it. A miss writes and returns the
    /// canonical default so the id is never a miss again.
    fn read_board(&mut self, board_id: &str) -> Result<Board, SessionError> {
        let key = self.keys.board(board_id);
        match Self::read_json(&mut self.storage, &key)? {
            Some(board) => Ok(board),
            None => {
                log::debug!("[kaybee.session] No data for board {}, creating default", board_id);
                let board = Board::default();
                Self::write_json(&mut self.storage, &key, &board);
                Ok(board)
            }
        }
    }

    fn install_board(&mut self, board: Board) {
        self.board = board;
    }

    fn save_board(&mut self) {
        let key = self.keys.board(self.router.current());
        Self::write_json(&mut self.storage, &key, &self.board);
    }

    fn save_registry(&mut self) {
        let key = self.keys.boards_meta();
        Self::write_json(&mut self.storage, &key, &self.registry);
    }

    fn persist_if(&mut self, outcome: Outcome) -> Outcome {
        if outcome.is_changed() {
            self.save_board();
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn current_board_id(&self) -> &str {
        self.router.current()
    }

    /// Fragment the location should show for the active board.
    pub fn location(&self) -> String {
        self.router.location()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<RouteEvent> {
        self.router.subscribe()
    }

    /// Whether storage fell back to memory.
    pub fn storage_is_fallback(&mut self) -> bool {
        self.storage.is_fallback()
    }

    pub fn storage(&self) -> &SafeStorage<S> {
        &self.storage
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Known boards in insertion order.
    pub fn list_boards(&self) -> &[BoardEntry] {
        self.registry.list()
    }

    /// Register `Board <id>` if unknown. Idempotent.
    pub fn ensure_board_known(&mut self, board_id: &str) -> bool {
        let added = self.registry.ensure_known(board_id);
        if added {
            log::info!("[kaybee.registry] Registered board {}", board_id);
            self.save_registry();
        }
        added
    }

    /// Id for a new board. Navigating to it registers and creates it.
    pub fn add_board(&self) -> BoardId {
        self.registry.next_board_id()
    }

    /// Rename a board's registry entry. Unknown ids are ignored.
    pub fn rename_board(&mut self, board_id: &str, name: &str) -> Outcome {
        let outcome = Outcome::from(self.registry.rename(board_id, name));
        if outcome.is_changed() {
            self.save_registry();
        }
        outcome
    }

    /// Delete a board's data and its registry entry.
    ///
    /// Deleting the active board switches to the first remaining board, or,
    /// when none remain, re-initializes the whole session on the default id.
    /// The board the session lands on is read first; if it fails to load,
    /// nothing is deleted.
    pub fn delete_board(&mut self, board_id: &str) -> Result<BoardDeletion, SessionError> {
        let deleting_current = board_id == self.router.current();
        let mut remaining = self.registry.clone();
        let registered = remaining.remove(board_id).is_some();
        let next = remaining.first().map(|entry| entry.id.clone());

        let landing = match (&next, deleting_current) {
            (_, false) => None,
            (Some(next), true) => Some(next.clone()),
            (None, true) => Some(self.router.default_id().to_string()),
        };
        let preloaded = match landing {
            Some(ref id) if id.as_str() != board_id => Some(self.read_board(id)?),
            _ => None,
        };

        let key = self.keys.board(board_id);
        self.storage.remove(&key);
        if registered {
            self.registry = remaining;
            self.save_registry();
        }
        log::info!("[kaybee.registry] Deleted board {}", board_id);

        if !deleting_current {
            return Ok(BoardDeletion::Removed);
        }

        match next {
            Some(next) => {
                match preloaded {
                    Some(board) => self.enter(&next, board),
                    None => self.switch_to(&next)?,
                }
                Ok(BoardDeletion::Switched { to: next })
            }
            None => {
                let default_id = self.router.default_id().to_string();
                self.router.set_current(&default_id);
                self.reinitialize()?;
                Ok(BoardDeletion::Reset { to: default_id })
            }
        }
    }

    /// Drop all in-memory state and reload it from storage.
    pub fn reinitialize(&mut self) -> Result<(), SessionError> {
        self.registry = BoardRegistry::default();
        self.board = Board::default();
        self.initialize()?;
        self.router.notify(RouteEvent::Reloaded {
            board_id: self.router.current().to_string(),
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Routing
    // ------------------------------------------------------------------

    /// React to a location fragment change. Only a different, non-empty id
    /// switches boards.
    pub fn navigate(&mut self, fragment: &str) -> Result<Outcome, SessionError> {
        match self.router.resolve(fragment) {
            Some(board_id) => {
                self.switch_to(&board_id)?;
                Ok(Outcome::Changed)
            }
            None => Ok(Outcome::Unchanged),
        }
    }

    fn switch_to(&mut self, board_id: &str) -> Result<(), SessionError> {
        let board = self.read_board(board_id)?;
        self.enter(board_id, board);
        Ok(())
    }

    fn enter(&mut self, board_id: &str, board: Board) {
        self.ensure_board_known(board_id);
        self.router.set_current(board_id);
        self.install_board(board);
        log::debug!("[kaybee.router] Switched to board {}", board_id);
        self.router.notify(RouteEvent::BoardChanged {
            board_id: board_id.to_string(),
        });
    }

    // ------------------------------------------------------------------
    // Board state
    // ------------------------------------------------------------------

    /// Read a board by id, creating the default on a miss. Does not switch
    /// the active board, but registers the id.
    pub fn load(&mut self, board_id: &str) -> Result<Board, SessionError> {
        let board = self.read_board(board_id)?;
        self.ensure_board_known(board_id);
        Ok(board)
    }

    pub fn add_column(&mut self) -> String {
        let id = self.board.add_column();
        self.save_board();
        id
    }

    pub fn rename_column(&mut self, column_id: &str, title: &str) -> Outcome {
        let outcome = self.board.rename_column(column_id, title);
        self.persist_if(outcome)
    }

    pub fn delete_column(&mut self, column_id: &str) -> Outcome {
        let outcome = self.board.delete_column(column_id);
        self.persist_if(outcome)
    }

    pub fn add_card(&mut self, column_id: &str) -> Option<String> {
        let id = self.board.add_card(column_id)?;
        self.save_board();
        Some(id)
    }

    pub fn edit_card_text(&mut self, card_id: &str, text: &str) -> Outcome {
        let outcome = self.board.edit_card_text(card_id, text);
        self.persist_if(outcome)
    }

    pub fn set_card_color(&mut self, card_id: &str, color: CardColor) -> Outcome {
        let outcome = self.board.set_card_color(card_id, color);
        self.persist_if(outcome)
    }

    pub fn move_card(&mut self, card_id: &str, from_column_id: &str, to_column_id: &str) -> Outcome {
        let outcome = self.board.move_card(card_id, from_column_id, to_column_id);
        self.persist_if(outcome)
    }

    pub fn delete_card(&mut self, card_id: &str, column_id: &str) -> Outcome {
        let outcome = self.board.delete_card(card_id, column_id);
        self.persist_if(outcome)
    }

    /// Replace the active board with the canonical default. Always persists.
    pub fn reset(&mut self) -> Outcome {
        let outcome = self.board.reset();
        self.save_board();
        outcome
    }

    pub fn export_markdown(&self) -> String {
        export::export_markdown(&self.board)
    }

    /// Apply a view intent.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::AddColumn => CommandOutcome::changed(Some(self.add_column())),
            Command::RenameColumn { column_id, title } => {
                self.rename_column(&column_id, &title).into()
            }
            Command::DeleteColumn { column_id } => self.delete_column(&column_id).into(),
            Command::AddCard { column_id } => match self.add_card(&column_id) {
                Some(id) => CommandOutcome::changed(Some(id)),
                None => Outcome::Unchanged.into(),
            },
            Command::EditCardText { card_id, text } => self.edit_card_text(&card_id, &text).into(),
            Command::SetCardColor { card_id, color } => {
                self.set_card_color(&card_id, color).into()
            }
            Command::MoveCard {
                card_id,
                from_column_id,
                to_column_id,
            } => self
                .move_card(&card_id, &from_column_id, &to_column_id)
                .into(),
            Command::DeleteCard { card_id, column_id } => {
                self.delete_card(&card_id, &column_id).into()
            }
            Command::Reset => self.reset().into(),
        }
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    pub fn font(&mut self) -> Font {
        let key = self.keys.font();
        Font::from_stored(self.storage.get(&key).as_deref())
    }

    pub fn theme(&mut self) -> Theme {
        let key = self.keys.theme();
        Theme::from_stored(self.storage.get(&key).as_deref())
    }

    pub fn set_font(&mut self, font: Font) {
        let key = self.keys.font();
        self.storage.set(&key, font.as_str());
    }

    pub fn set_theme(&mut self, theme: Theme) {
        let key = self.keys.theme();
        self.storage.set(&key, theme.as_str());
    }

    pub fn toggle_font(&mut self) -> Font {
        let font = self.font().toggled();
        self.set_font(font);
        font
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.theme().toggled();
        self.set_theme(theme);
        theme
    }

    /// Hand back the underlying store, e.g. to simulate a restart.
    pub fn into_store(self) -> S {
        self.storage.into_inner()
    }
}

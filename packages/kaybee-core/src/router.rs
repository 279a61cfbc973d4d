/// Location-fragment routing.
///
/// The fragment (`#<board id>`) is the only addressing mechanism for boards.
/// The router tracks the active board id and broadcasts navigation events so
/// a view can re-render. Sends with no subscribers are dropped.
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::BoardId;

/// Characters escaped when writing a board id back into a fragment.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`');

const EVENT_CAPACITY: usize = 64;

/// Events emitted when the active board changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RouteEvent {
    /// Navigation selected a different board; re-render it.
    BoardChanged { board_id: BoardId },
    /// State was re-initialized from storage (last board deleted).
    Reloaded { board_id: BoardId },
}

/// Board id named by a location fragment. Strips one leading `#` and
/// percent-decodes; an empty fragment names nothing.
pub fn parse_fragment(fragment: &str) -> Option<BoardId> {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    if raw.is_empty() {
        return None;
    }
    let decoded = percent_decode_str(raw).decode_utf8_lossy().into_owned();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

/// Fragment addressing a board id, e.g. `#3`.
pub fn fragment_for(board_id: &str) -> String {
    format!("#{}", utf8_percent_encode(board_id, FRAGMENT))
}

pub struct Router {
    current: BoardId,
    default_id: BoardId,
    event_tx: broadcast::Sender<RouteEvent>,
}

impl Router {
    /// Start on the board named by `fragment`, or on `default_id` when the
    /// fragment is empty.
    pub fn start(fragment: &str, default_id: &str) -> Self {
        let current = parse_fragment(fragment).unwrap_or_else(|| {
            log::debug!("[kaybee.router] Empty fragment, using #{}", default_id);
            default_id.to_string()
        });
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            current,
            default_id: default_id.to_string(),
            event_tx,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn is_on_default(&self) -> bool {
        self.current == self.default_id
    }

    /// Fragment for the active board; what the location should read.
    pub fn location(&self) -> String {
        fragment_for(&self.current)
    }

    /// Target of a fragment change, if it names a different, non-empty id.
    pub fn resolve(&self, fragment: &str) -> Option<BoardId> {
        parse_fragment(fragment).filter(|id| *id != self.current)
    }

    pub(crate) fn set_current(&mut self, board_id: &str) {
        self.current = board_id.to_string();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RouteEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) fn notify(&self, event: RouteEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        assert_eq!(parse_fragment("#3").as_deref(), Some("3"));
        assert_eq!(parse_fragment("3").as_deref(), Some("3"));
        assert_eq!(parse_fragment("#"), None);
        assert_eq!(parse_fragment(""), None);
        assert_eq!(parse_fragment("#Team%20Board").as_deref(), Some("Team Board"));
    }

    #[test]
    fn test_fragment_round_trip() {
        let fragment = fragment_for("Team #2");
        assert_eq!(fragment, "#Team%20%232");
        assert_eq!(parse_fragment(&fragment).as_deref(), Some("Team #2"));
        assert_eq!(fragment_for("7"), "#7");
    }

    #[test]
    fn test_start_normalizes_empty_fragment() {
        let router = Router::start("", "1");
        assert_eq!(router.current(), "1");
        assert_eq!(router.location(), "#1");
        assert!(router.is_on_default());

        let router = Router::start("#4", "1");
        assert_eq!(router.current(), "4");
        assert!(!router.is_on_default());
    }

    #[test]
    fn test_resolve_ignores_same_and_empty() {
        let router = Router::start("#2", "1");
        assert_eq!(router.resolve("#2"), None);
        assert_eq!(router.resolve("#"), None);
        assert_eq!(router.resolve("#5").as_deref(), Some("5"));
    }

    #[test]
    fn test_notify_reaches_subscribers() {
        let router = Router::start("#1", "1");
        // No subscribers yet: dropped silently
        router.notify(RouteEvent::BoardChanged {
            board_id: "0".into(),
        });

        let mut rx = router.subscribe();
        router.notify(RouteEvent::BoardChanged {
            board_id: "2".into(),
        });
        assert_eq!(
            rx.try_recv().unwrap(),
            RouteEvent::BoardChanged {
                board_id: "2".into()
            }
        );
        assert!(rx.try_recv().is_err());
    }
}

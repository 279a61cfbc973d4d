/// Persisted display preferences (font and theme).
/// Stored as plain strings under `<ns>-font` and `<ns>-theme`.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    #[default]
    Handwritten,
    Readable,
}

impl Font {
    pub fn as_str(self) -> &'static str {
        match self {
            Font::Handwritten => "handwritten",
            Font::Readable => "readable",
        }
    }

    /// Anything other than `readable` is the handwritten default.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("readable") => Font::Readable,
            _ => Font::Handwritten,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Font::Handwritten => Font::Readable,
            Font::Readable => Font::Handwritten,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than `dark` is the light default.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_values() {
        assert_eq!(Font::from_stored(Some("readable")), Font::Readable);
        assert_eq!(Font::from_stored(Some("handwritten")), Font::Handwritten);
        assert_eq!(Font::from_stored(None), Font::Handwritten);
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("sepia")), Theme::Light);
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Font::Handwritten.toggled().as_str(), "readable");
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}

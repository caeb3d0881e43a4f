//! Live HUD text surface.

/// Ordered key/value lines shown on the debug overlay.
///
/// Each [`replace`](Self::replace) swaps the whole surface; there is no
/// partial update, matching a HUD that is redrawn every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudSurface {
    lines: Vec<(String, String)>,
}

impl HudSurface {
    /// Replace all lines.
    pub fn replace<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.lines = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    /// The current lines.
    #[must_use]
    pub fn lines(&self) -> &[(String, String)] {
        &self.lines
    }

    /// Value shown for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as `key: value` lines joined by newlines.
    #[must_use]
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

//! Hover and selection state for map regions.
//!
//! Each region runs a small state machine driven by abstract input events,
//! so the rendering layer only has to map states to paint.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionState {
    #[default]
    Idle,
    Hovered,
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Enter,
    Leave,
    /// Toggles selection.
    Click,
    Reset,
}

impl RegionState {
    pub fn on_event(self, event: InputEvent) -> Self {
        match (self, event) {
            (_, InputEvent::Reset) => Self::Idle,
            (Self::Idle, InputEvent::Enter) => Self::Hovered,
            (Self::Hovered, InputEvent::Leave) => Self::Idle,
            (Self::Idle | Self::Hovered, InputEvent::Click) => Self::Selected,
            // The pointer is still over a region it just deselected.
            (Self::Selected, InputEvent::Click) => Self::Hovered,
            (state, _) => state,
        }
    }

    pub fn is_highlighted(self) -> bool {
        self != Self::Idle
    }
}

/// Strips whitespace and everything except ASCII word characters and Hangul
/// syllables, so `"서울 특별시!"` and `"서울특별시"` name the same region.
pub fn normalize_region_id(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || ('가'..='힣').contains(c))
        .collect()
}

#[derive(Debug, Clone)]
struct Entry<H> {
    handle: H,
    state: RegionState,
}

/// Region id to shape handle lookup, owned by the map view.
#[derive(Debug, Clone)]
pub struct RegionRegistry<H> {
    entries: BTreeMap<String, Entry<H>>,
}

impl<H> Default for RegionRegistry<H> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<H> RegionRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, handle: H) {
        self.entries.insert(
            id.into(),
            Entry {
                handle,
                state: RegionState::Idle,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves `id` to the registered key: exact match first, then the
    /// normalised form.
    pub fn resolve_key(&self, id: &str) -> Option<&str> {
        if let Some((key, _)) = self.entries.get_key_value(id) {
            return Some(key.as_str());
        }
        let wanted = normalize_region_id(id);
        self.entries
            .keys()
            .find(|key| normalize_region_id(key) == wanted)
            .map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&H> {
        let key = self.resolve_key(id)?;
        self.entries.get(key).map(|e| &e.handle)
    }

    pub fn state(&self, id: &str) -> RegionState {
        self.resolve_key(id)
            .and_then(|key| self.entries.get(key))
            .map(|e| e.state)
            .unwrap_or_default()
    }

    /// Feeds `event` to the region and returns its new state, or `None` for
    /// an unknown region.
    pub fn dispatch(&mut self, id: &str, event: InputEvent) -> Option<RegionState> {
        let key = self.resolve_key(id)?.to_string();
        let entry = self.entries.get_mut(&key)?;
        entry.state = entry.state.on_event(event);
        Some(entry.state)
    }

    pub fn reset_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.state = RegionState::Idle;
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, e)| e.state == RegionState::Selected)
            .map(|(k, _)| k.as_str())
    }
}

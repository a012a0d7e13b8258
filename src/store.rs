//! Local UI state
//!
//! Holds the ids the user has highlighted or selected and the theme flag.
//! Nothing here is fetched from the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highlighted actors and the selected movie
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Actor highlighted in the "available" list
    pub available_id: Option<u64>,
    /// Actor highlighted in the "selected" list
    pub selected_id: Option<u64>,
    /// Movie currently being edited
    pub movie_id: Option<u64>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the initial state: nothing highlighted, no movie
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_available_id(&mut self, id: u64) {
        self.available_id = Some(id);
    }

    pub fn set_selected_id(&mut self, id: u64) {
        self.selected_id = Some(id);
    }

    /// Select a movie. Actor highlights belong to the previous movie and are dropped.
    pub fn set_movie_id(&mut self, id: u64) {
        if self.movie_id != Some(id) {
            self.available_id = None;
            self.selected_id = None;
        }
        self.movie_id = Some(id);
    }

    pub fn has_movie(&self) -> bool {
        self.movie_id.is_some()
    }
}

/// Color scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(format!("Unknown theme '{}' (expected dark or light)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_initial_state() {
        let state = SelectionState::new();
        assert_eq!(state.available_id, None);
        assert_eq!(state.selected_id, None);
        assert_eq!(state.movie_id, None);
        assert!(!state.has_movie());
    }

    #[test]
    fn test_selection_reset() {
        let mut state = SelectionState::new();
        state.set_movie_id(2);
        state.set_available_id(1);
        state.set_selected_id(5);

        state.reset();
        assert_eq!(state, SelectionState::default());
    }

    #[test]
    fn test_changing_movie_clears_actor_highlights() {
        let mut state = SelectionState::new();
        state.set_movie_id(2);
        state.set_available_id(1);
        state.set_selected_id(5);

        // Same movie again keeps highlights
        state.set_movie_id(2);
        assert_eq!(state.available_id, Some(1));

        state.set_movie_id(3);
        assert_eq!(state.movie_id, Some(3));
        assert_eq!(state.available_id, None);
        assert_eq!(state.selected_id, None);
    }

    #[test]
    fn test_theme_toggle_and_parse() {
        assert_eq!(ThemeMode::default(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert!(ThemeMode::Dark.is_dark());
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!("light".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("blue".parse::<ThemeMode>().is_err());
    }
}

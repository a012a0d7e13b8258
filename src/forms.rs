//! Form state
//!
//! Editable field values, per-field error messages and the transient status
//! line of each form. Forms validate locally before anything is sent.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::api::FieldIssue;
use crate::models::{property_name, Movie, MovieUpdate, Property, PropertyKind};

pub const FIELD_NAME: &str = "name";
pub const FIELD_SERIES_NUMBER: &str = "series_number";

/// Shown when Update/Remove is submitted without picking an entry
pub const SELECTION_REQUIRED: &str = "Please make a selection first";

// =============================================================================
// Text Input
// =============================================================================

/// Single-line text field with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters
    cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.set(value);
        input
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the value, cursor at the end
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Text before and after the cursor, for rendering
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_index(self.cursor))
    }
}

// =============================================================================
// Field Errors and Status
// =============================================================================

/// Per-field error messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&[FieldIssue]> for FieldErrors {
    fn from(issues: &[FieldIssue]) -> Self {
        let mut errors = FieldErrors::new();
        for issue in issues {
            errors.insert(issue.field.clone(), issue.message.clone());
        }
        errors
    }
}

/// Transient human-readable outcome of the last action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    message: Option<String>,
    failed: bool,
}

impl Status {
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.failed = false;
    }

    /// Record a failure message
    pub fn fail(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.failed = true;
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.failed = false;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_failure(&self) -> bool {
        self.message.is_some() && self.failed
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_none()
    }
}

// =============================================================================
// Movie Form
// =============================================================================

/// Editable properties of the selected movie
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieForm {
    pub name: TextInput,
    pub studio_id: Option<u64>,
    pub series_id: Option<u64>,
    pub series_number: TextInput,
    /// Checked categories
    pub categories: BTreeSet<u64>,
    pub errors: FieldErrors,
}

impl MovieForm {
    /// Fill every field from a server record
    pub fn populate(&mut self, movie: &Movie) {
        self.name.set(movie.name.clone().unwrap_or_default());
        self.studio_id = movie.studio.as_ref().map(|s| s.id);
        self.series_id = movie.series.as_ref().map(|s| s.id);
        self.series_number
            .set(movie.series_number.map(|n| n.to_string()).unwrap_or_default());
        self.categories = movie.category_ids();
        self.errors.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the update body; empty fields become `null`
    pub fn to_update(&self) -> Result<MovieUpdate, FieldErrors> {
        let number = self.series_number.value().trim();
        let series_number = if number.is_empty() {
            None
        } else {
            match number.parse::<i64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    let mut errors = FieldErrors::new();
                    errors.insert(FIELD_SERIES_NUMBER, "Series # must be a whole number");
                    return Err(errors);
                }
            }
        };

        let name = self.name.value();
        Ok(MovieUpdate {
            name: (!name.is_empty()).then(|| name.to_string()),
            series_id: self.series_id,
            series_number,
            studio_id: self.studio_id,
        })
    }
}

// =============================================================================
// Property Form
// =============================================================================

/// What the property form does on submit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PropertyAction {
    #[default]
    Add,
    Update,
    Remove,
}

impl PropertyAction {
    pub const ALL: [PropertyAction; 3] = [
        PropertyAction::Add,
        PropertyAction::Update,
        PropertyAction::Remove,
    ];

    /// Past tense used in status messages
    pub fn verb(self) -> &'static str {
        match self {
            PropertyAction::Add => "added",
            PropertyAction::Update => "updated",
            PropertyAction::Remove => "removed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PropertyAction::Add => PropertyAction::Update,
            PropertyAction::Update => PropertyAction::Remove,
            PropertyAction::Remove => PropertyAction::Add,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            PropertyAction::Add => PropertyAction::Remove,
            PropertyAction::Update => PropertyAction::Add,
            PropertyAction::Remove => PropertyAction::Update,
        }
    }

    /// Whether the form needs an existing entry picked
    pub fn needs_selection(self) -> bool {
        self != PropertyAction::Add
    }

    /// Whether the name field is shown
    pub fn needs_name(self) -> bool {
        self != PropertyAction::Remove
    }
}

impl fmt::Display for PropertyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyAction::Add => write!(f, "add"),
            PropertyAction::Update => write!(f, "update"),
            PropertyAction::Remove => write!(f, "remove"),
        }
    }
}

/// A validated property form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyRequest {
    Add { kind: PropertyKind, name: String },
    Update { kind: PropertyKind, id: u64, name: String },
    Remove { kind: PropertyKind, id: u64, name: String },
}

impl PropertyRequest {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyRequest::Add { kind, .. }
            | PropertyRequest::Update { kind, .. }
            | PropertyRequest::Remove { kind, .. } => *kind,
        }
    }

    pub fn action(&self) -> PropertyAction {
        match self {
            PropertyRequest::Add { .. } => PropertyAction::Add,
            PropertyRequest::Update { .. } => PropertyAction::Update,
            PropertyRequest::Remove { .. } => PropertyAction::Remove,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PropertyRequest::Add { name, .. }
            | PropertyRequest::Update { name, .. }
            | PropertyRequest::Remove { name, .. } => name,
        }
    }

    /// `"{Kind} {name} {verb}"`
    pub fn success_message(&self) -> String {
        format!(
            "{} {} {}",
            self.kind().title(),
            self.name(),
            self.action().verb()
        )
    }
}

/// Why a property form submission was refused before sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Update/Remove without an entry picked
    NoSelection,
    /// Field-level problems
    Invalid(FieldErrors),
}

/// Add/update/remove form for actors, categories, series and studios
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyForm {
    pub action: PropertyAction,
    pub kind: PropertyKind,
    pub name: TextInput,
    /// Existing entry picked for update/remove
    pub selection: Option<u64>,
    pub errors: FieldErrors,
}

impl PropertyForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_action(&mut self, action: PropertyAction) {
        self.action = action;
        self.errors.clear();
    }

    /// Switch entity kind; name and selection belong to the old kind
    pub fn set_kind(&mut self, kind: PropertyKind) {
        if self.kind != kind {
            self.kind = kind;
            self.name.clear();
            self.selection = None;
            self.errors.clear();
        }
    }

    /// Pick an existing entry (or none) and load its name
    pub fn select(&mut self, id: Option<u64>, catalog: &[Property]) {
        self.selection = id;
        match id {
            None => self.name.clear(),
            Some(_) => self.sync_name(catalog),
        }
    }

    /// Reload the name of the picked entry after its catalog changed
    pub fn sync_name(&mut self, catalog: &[Property]) {
        if let Some(name) = self.selection.and_then(|id| property_name(catalog, id)) {
            self.name.set(name);
        }
    }

    /// Check the form and build the request to send
    pub fn validate(&self) -> Result<PropertyRequest, Rejection> {
        let selection = match (self.action.needs_selection(), self.selection) {
            (true, None) => return Err(Rejection::NoSelection),
            (_, selection) => selection,
        };

        let name = self.name.value().to_string();
        if self.action.needs_name() && name.trim().is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert(FIELD_NAME, "Name is required");
            return Err(Rejection::Invalid(errors));
        }

        let kind = self.kind;
        Ok(match (self.action, selection) {
            (PropertyAction::Update, Some(id)) => PropertyRequest::Update { kind, id, name },
            (PropertyAction::Remove, Some(id)) => PropertyRequest::Remove { kind, id, name },
            _ => PropertyRequest::Add { kind, name },
        })
    }

    /// Form state after a successful submission
    pub fn after_success(&mut self) {
        self.name.clear();
        if self.action == PropertyAction::Remove {
            self.selection = None;
        }
        self.errors.clear();
    }
}

//! Data structures and types for MovieManager
//!
//! Contains the wire models exchanged with the movie library backend:
//! - **Movies**: file listing entries and full movie detail records
//! - **Properties**: actors, categories, series and studios (id + name)
//! - **Requests**: update and create bodies sent to the backend
//! - **Responses**: plain confirmation messages

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Movie Models
// =============================================================================

/// Entry of the movie file listing (`GET /movies`, `POST /movies`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieFile {
    pub id: u64,
    pub filename: String,
}

impl fmt::Display for MovieFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.filename)
    }
}

/// Full movie record (`GET /movies/{id}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub filename: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub actors: Vec<Actor>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub series: Option<Series>,
    #[serde(default)]
    pub series_number: Option<i64>,
    #[serde(default)]
    pub studio: Option<Studio>,
}

impl Movie {
    /// Name shown in status messages; falls back to the filename when unnamed
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.filename,
        }
    }

    /// Ids of the categories linked to this movie
    pub fn category_ids(&self) -> BTreeSet<u64> {
        self.categories.iter().map(|c| c.id).collect()
    }

}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())?;
        if let Some(series) = &self.series {
            match self.series_number {
                Some(n) => write!(f, " [{} #{}]", series.name, n)?,
                None => write!(f, " [{}]", series.name)?,
            }
        }
        if let Some(studio) = &self.studio {
            write!(f, " ({})", studio.name)?;
        }
        Ok(())
    }
}

/// The backend sends `null` for empty relation lists on some endpoints
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Property Models (reference data)
// =============================================================================

/// Reference data entry: actor, category, series or studio
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub id: u64,
    pub name: String,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub type Actor = Property;
pub type Category = Property;
pub type Series = Property;
pub type Studio = Property;

/// Find a property's name by id in a catalog
pub fn property_name(catalog: &[Property], id: u64) -> Option<&str> {
    catalog.iter().find(|p| p.id == id).map(|p| p.name.as_str())
}

/// Kind of reference data, each with its own collection endpoint
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    Actor,
    Category,
    Series,
    Studio,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 4] = [
        PropertyKind::Actor,
        PropertyKind::Category,
        PropertyKind::Series,
        PropertyKind::Studio,
    ];

    /// Collection endpoint path
    pub fn endpoint(self) -> &'static str {
        match self {
            PropertyKind::Actor => "/actors",
            PropertyKind::Category => "/categories",
            PropertyKind::Series => "/series",
            PropertyKind::Studio => "/studios",
        }
    }

    /// Capitalized label used in status messages
    pub fn title(self) -> &'static str {
        match self {
            PropertyKind::Actor => "Actor",
            PropertyKind::Category => "Category",
            PropertyKind::Series => "Series",
            PropertyKind::Studio => "Studio",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PropertyKind::Actor => PropertyKind::Category,
            PropertyKind::Category => PropertyKind::Series,
            PropertyKind::Series => PropertyKind::Studio,
            PropertyKind::Studio => PropertyKind::Actor,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            PropertyKind::Actor => PropertyKind::Studio,
            PropertyKind::Category => PropertyKind::Actor,
            PropertyKind::Series => PropertyKind::Category,
            PropertyKind::Studio => PropertyKind::Series,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Actor => write!(f, "actor"),
            PropertyKind::Category => write!(f, "category"),
            PropertyKind::Series => write!(f, "series"),
            PropertyKind::Studio => write!(f, "studio"),
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Body of `PUT /movies/{id}`; `None` is sent as `null`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieUpdate {
    pub name: Option<String>,
    pub series_id: Option<u64>,
    pub series_number: Option<i64>,
    pub studio_id: Option<u64>,
}

/// Body of property create/rename requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyName {
    pub name: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Plain confirmation returned by delete endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Client-side remote data cache
//!
//! Query results are stored under a [`QueryKey`]. Every mutation carries a
//! fixed set of [`Tag`]s; when it succeeds, every cached entry provided
//! under one of those tags is dropped and must be fetched again.

use std::collections::{BTreeSet, HashMap};

use crate::models::{Movie, MovieFile, Property, PropertyKind};

// =============================================================================
// Keys and Tags
// =============================================================================

/// Identity of one cached query (endpoint + arguments)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKey {
    /// `GET /movies`
    Movies,
    /// `GET /movies/{id}`
    Movie(u64),
    /// `GET /{kind}`
    Properties(PropertyKind),
}

impl QueryKey {
    /// Tag under which this query's result is provided
    pub fn tag(self) -> Tag {
        match self {
            QueryKey::Movies => Tag::Movies,
            QueryKey::Movie(_) => Tag::Movie,
            QueryKey::Properties(kind) => Tag::Properties(kind),
        }
    }
}

/// Resource type a query provides and a mutation invalidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Movies,
    Movie,
    Properties(PropertyKind),
}

/// Every remote write the client performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    PropertyAdd(PropertyKind),
    PropertyUpdate(PropertyKind),
    PropertyDelete(PropertyKind),
    MovieActorAdd,
    MovieActorRemove,
    MovieCategoryAdd,
    MovieCategoryRemove,
    MovieUpdate,
    MovieDelete,
    MoviesImport,
}

impl Mutation {
    /// Tags whose cached entries become stale once this mutation succeeds
    pub fn invalidates(self) -> Vec<Tag> {
        match self {
            Mutation::PropertyAdd(kind) => vec![Tag::Properties(kind)],
            // Category names are not part of the movie file listing
            Mutation::PropertyUpdate(PropertyKind::Category) => {
                vec![Tag::Properties(PropertyKind::Category), Tag::Movie]
            }
            Mutation::PropertyUpdate(kind) => {
                vec![Tag::Properties(kind), Tag::Movie, Tag::Movies]
            }
            Mutation::PropertyDelete(kind) => vec![Tag::Properties(kind), Tag::Movie],
            Mutation::MovieActorAdd | Mutation::MovieActorRemove => {
                vec![Tag::Movie, Tag::Movies]
            }
            Mutation::MovieCategoryAdd | Mutation::MovieCategoryRemove => vec![Tag::Movie],
            Mutation::MovieUpdate => vec![Tag::Movie, Tag::Movies],
            Mutation::MovieDelete | Mutation::MoviesImport => vec![Tag::Movies],
        }
    }
}

// =============================================================================
// Cache
// =============================================================================

/// A cached query result
#[derive(Debug, Clone, PartialEq)]
pub enum CachedData {
    Movies(Vec<MovieFile>),
    Movie(Movie),
    Properties(Vec<Property>),
}

/// Remote data cache keyed by query
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CachedData>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: QueryKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: QueryKey, data: CachedData) {
        self.entries.insert(key, data);
    }

    pub fn store_movies(&mut self, movies: Vec<MovieFile>) {
        self.insert(QueryKey::Movies, CachedData::Movies(movies));
    }

    pub fn store_movie(&mut self, movie: Movie) {
        self.insert(QueryKey::Movie(movie.id), CachedData::Movie(movie));
    }

    pub fn store_properties(&mut self, kind: PropertyKind, properties: Vec<Property>) {
        self.insert(QueryKey::Properties(kind), CachedData::Properties(properties));
    }

    pub fn movies(&self) -> Option<&[MovieFile]> {
        match self.entries.get(&QueryKey::Movies) {
            Some(CachedData::Movies(movies)) => Some(movies),
            _ => None,
        }
    }

    pub fn movie(&self, id: u64) -> Option<&Movie> {
        match self.entries.get(&QueryKey::Movie(id)) {
            Some(CachedData::Movie(movie)) => Some(movie),
            _ => None,
        }
    }

    pub fn properties(&self, kind: PropertyKind) -> Option<&[Property]> {
        match self.entries.get(&QueryKey::Properties(kind)) {
            Some(CachedData::Properties(properties)) => Some(properties),
            _ => None,
        }
    }

    /// Drop every entry provided under one of `tags`; returns the dropped keys
    pub fn invalidate(&mut self, tags: &[Tag]) -> BTreeSet<QueryKey> {
        let stale: BTreeSet<QueryKey> = self
            .entries
            .keys()
            .filter(|key| tags.contains(&key.tag()))
            .copied()
            .collect();
        for key in &stale {
            self.entries.remove(key);
        }
        if !stale.is_empty() {
            tracing::debug!(?tags, dropped = stale.len(), "cache invalidated");
        }
        stale
    }

    /// Invalidate the tags of a successful mutation
    pub fn apply(&mut self, mutation: Mutation) -> BTreeSet<QueryKey> {
        self.invalidate(&mutation.invalidates())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64) -> Movie {
        Movie {
            id,
            filename: format!("movie{}.mp4", id),
            name: None,
            actors: Vec::new(),
            categories: Vec::new(),
            series: None,
            series_number: None,
            studio: None,
        }
    }

    fn filled_cache() -> QueryCache {
        let mut cache = QueryCache::new();
        cache.store_movies(vec![MovieFile {
            id: 1,
            filename: "movie1.mp4".into(),
        }]);
        cache.store_movie(movie(1));
        cache.store_movie(movie(2));
        for kind in PropertyKind::ALL {
            cache.store_properties(kind, Vec::new());
        }
        cache
    }

    #[test]
    fn test_store_and_read_back() {
        let cache = filled_cache();
        assert_eq!(cache.len(), 7);
        assert_eq!(cache.movies().map(|m| m.len()), Some(1));
        assert_eq!(cache.movie(2).map(|m| m.id), Some(2));
        assert!(cache.movie(3).is_none());
        assert!(cache.properties(PropertyKind::Studio).is_some());
    }

    #[test]
    fn test_movie_tag_drops_all_details() {
        let mut cache = filled_cache();
        let dropped = cache.invalidate(&[Tag::Movie]);
        assert_eq!(
            dropped,
            BTreeSet::from([QueryKey::Movie(1), QueryKey::Movie(2)])
        );
        assert!(cache.contains(QueryKey::Movies));
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn test_actor_association_invalidates_movie_and_list() {
        let mut cache = filled_cache();
        let dropped = cache.apply(Mutation::MovieActorAdd);
        assert!(dropped.contains(&QueryKey::Movies));
        assert!(dropped.contains(&QueryKey::Movie(1)));
        assert!(cache.contains(QueryKey::Properties(PropertyKind::Actor)));
    }

    #[test]
    fn test_category_association_keeps_list() {
        let mut cache = filled_cache();
        cache.apply(Mutation::MovieCategoryRemove);
        assert!(cache.contains(QueryKey::Movies));
        assert!(!cache.contains(QueryKey::Movie(1)));
    }

    #[test]
    fn test_property_add_only_touches_its_kind() {
        let mut cache = filled_cache();
        let dropped = cache.apply(Mutation::PropertyAdd(PropertyKind::Series));
        assert_eq!(
            dropped,
            BTreeSet::from([QueryKey::Properties(PropertyKind::Series)])
        );
    }

    #[test]
    fn test_property_update_tags() {
        assert_eq!(
            Mutation::PropertyUpdate(PropertyKind::Category).invalidates(),
            vec![Tag::Properties(PropertyKind::Category), Tag::Movie]
        );
        assert_eq!(
            Mutation::PropertyUpdate(PropertyKind::Studio).invalidates(),
            vec![
                Tag::Properties(PropertyKind::Studio),
                Tag::Movie,
                Tag::Movies
            ]
        );
    }

    #[test]
    fn test_movie_delete_and_import_only_drop_list() {
        for mutation in [Mutation::MovieDelete, Mutation::MoviesImport] {
            let mut cache = filled_cache();
            let dropped = cache.apply(mutation);
            assert_eq!(dropped, BTreeSet::from([QueryKey::Movies]));
        }
    }

    #[test]
    fn test_invalidate_empty_cache() {
        let mut cache = QueryCache::new();
        assert!(cache.apply(Mutation::MovieUpdate).is_empty());
        assert!(cache.is_empty());
    }
}

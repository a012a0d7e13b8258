//! Admin session
//!
//! Owns the backend client, the query cache, the selection state and every
//! form. Each user operation is one async method: it validates locally,
//! sends at most one mutation, records a status message and, on success,
//! refetches whatever the mutation invalidated.

use std::collections::BTreeSet;

use crate::api::{ApiError, ApiResult, MovieManagerClient};
use crate::cache::{Mutation, QueryCache, QueryKey};
use crate::forms::{
    FieldErrors, MovieForm, PropertyForm, PropertyRequest, Rejection, Status, SELECTION_REQUIRED,
};
use crate::models::{property_name, Movie, MovieFile, Property, PropertyKind};
use crate::store::SelectionState;

/// Import status shown before the first import
pub const IMPORT_IDLE: &str = "Click to import movies";

/// Direction of an actor transfer between the two lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Available → selected
    Add,
    /// Selected → available
    Remove,
}

/// Pane owning a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSlot {
    Actors,
    Categories,
    Movie,
    Property,
    Import,
}

/// Result of one user operation
#[derive(Debug)]
pub enum Outcome {
    /// Nothing was sent: missing selection or rejected locally
    Skipped,
    Succeeded,
    /// The backend call failed; the status or field errors say why
    Failed(ApiError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Status message for an import that returned `count` files
pub fn import_message(count: usize) -> String {
    match count {
        0 => "No movie files found".to_string(),
        1 => "Imported 1 file".to_string(),
        n => format!("Imported {} files", n),
    }
}

/// Record a failed mutation: validation issues go to the form fields,
/// everything else becomes the status message.
fn report_failure(status: &mut Status, errors: Option<&mut FieldErrors>, error: &ApiError) {
    match (error, error.status_message()) {
        (ApiError::Validation(issues), _) => {
            tracing::debug!(issues = issues.len(), "validation failure");
            if let Some(errors) = errors {
                *errors = FieldErrors::from(issues.as_slice());
            }
        }
        (_, Some(message)) => {
            if matches!(error, ApiError::RequestFailed(_) | ApiError::InvalidResponse(_)) {
                tracing::error!(error = %error, "backend unreachable or response unusable");
            }
            status.fail(message);
        }
        (_, None) => {}
    }
}

#[derive(Debug, Default)]
pub struct Session {
    client: MovieManagerClient,
    cache: QueryCache,
    selection: SelectionState,
    movie_form: MovieForm,
    property_form: PropertyForm,
    actor_status: Status,
    category_status: Status,
    movie_status: Status,
    property_status: Status,
    import_status: Status,
    /// Movie awaiting delete confirmation
    pending_remove: Option<u64>,
}

impl Session {
    pub fn new(client: MovieManagerClient) -> Self {
        Self {
            client,
            ..Default::default()
        }
    }

    pub fn client(&self) -> &MovieManagerClient {
        &self.client
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn movie_form(&self) -> &MovieForm {
        &self.movie_form
    }

    pub fn movie_form_mut(&mut self) -> &mut MovieForm {
        &mut self.movie_form
    }

    pub fn property_form(&self) -> &PropertyForm {
        &self.property_form
    }

    pub fn property_form_mut(&mut self) -> &mut PropertyForm {
        &mut self.property_form
    }

    pub fn actor_status(&self) -> Option<&str> {
        self.actor_status.message()
    }

    pub fn category_status(&self) -> Option<&str> {
        self.category_status.message()
    }

    pub fn movie_status(&self) -> Option<&str> {
        self.movie_status.message()
    }

    pub fn property_status(&self) -> Option<&str> {
        self.property_status.message()
    }

    pub fn import_status(&self) -> &str {
        self.import_status.message().unwrap_or(IMPORT_IDLE)
    }

    /// Whether a pane's status reports a failure
    pub fn status_failed(&self, slot: StatusSlot) -> bool {
        match slot {
            StatusSlot::Actors => &self.actor_status,
            StatusSlot::Categories => &self.category_status,
            StatusSlot::Movie => &self.movie_status,
            StatusSlot::Property => &self.property_status,
            StatusSlot::Import => &self.import_status,
        }
        .is_failure()
    }

    /// Cached movie file listing (empty until loaded)
    pub fn movies(&self) -> &[MovieFile] {
        self.cache.movies().unwrap_or_default()
    }

    /// Cached catalog of one kind (empty until loaded)
    pub fn catalog(&self, kind: PropertyKind) -> &[Property] {
        self.cache.properties(kind).unwrap_or_default()
    }

    /// Detail record of the selected movie, once fetched
    pub fn current_movie(&self) -> Option<&Movie> {
        self.selection
            .movie_id
            .and_then(|id| self.cache.movie(id))
    }

    /// Whether the movie-dependent panes accept input
    pub fn enabled(&self) -> bool {
        self.current_movie().is_some()
    }

    /// Actors linked to the selected movie
    pub fn selected_actors(&self) -> &[Property] {
        self.current_movie()
            .map(|m| m.actors.as_slice())
            .unwrap_or_default()
    }

    pub fn pending_remove(&self) -> Option<u64> {
        self.pending_remove
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Movie listing, fetched only on a cache miss
    pub async fn load_movies(&mut self) -> ApiResult<&[MovieFile]> {
        if !self.cache.contains(QueryKey::Movies) {
            let movies = self.client.movies().await?;
            tracing::debug!(count = movies.len(), "movies loaded");
            self.cache.store_movies(movies);
        }
        Ok(self.movies())
    }

    pub async fn load_catalog(&mut self, kind: PropertyKind) -> ApiResult<&[Property]> {
        if !self.cache.contains(QueryKey::Properties(kind)) {
            let entries = self.client.properties(kind).await?;
            tracing::debug!(%kind, count = entries.len(), "catalog loaded");
            self.cache.store_properties(kind, entries);
        }
        Ok(self.catalog(kind))
    }

    pub async fn load_movie(&mut self, id: u64) -> ApiResult<&Movie> {
        if !self.cache.contains(QueryKey::Movie(id)) {
            let movie = self.client.movie(id).await?;
            self.cache.store_movie(movie);
        }
        self.cache
            .movie(id)
            .ok_or_else(|| ApiError::InvalidResponse(format!("movie {} missing from cache", id)))
    }

    /// Drop everything cached and load the listing and all catalogs
    pub async fn refresh(&mut self) -> ApiResult<()> {
        self.cache.clear();
        self.load_movies().await?;
        for kind in PropertyKind::ALL {
            self.load_catalog(kind).await?;
        }
        if let Some(id) = self.selection.movie_id {
            self.load_movie(id).await?;
            self.sync_movie_form(id);
        }
        self.sync_property_name();
        Ok(())
    }

    // =========================================================================
    // Movie selection
    // =========================================================================

    /// Select a movie and populate the form from its detail, or clear
    /// everything with `None`.
    pub async fn select_movie(&mut self, id: Option<u64>) -> ApiResult<()> {
        let Some(id) = id else {
            self.deselect();
            return Ok(());
        };

        self.selection.set_movie_id(id);
        self.pending_remove = None;
        self.clear_movie_statuses();
        self.movie_form.reset();
        tracing::debug!(movie_id = id, "movie selected");

        self.load_movie(id).await?;
        self.sync_movie_form(id);
        Ok(())
    }

    /// Full reset of the movie-dependent state
    fn deselect(&mut self) {
        self.selection.reset();
        self.movie_form.reset();
        self.pending_remove = None;
        self.clear_movie_statuses();
    }

    fn clear_movie_statuses(&mut self) {
        self.actor_status.clear();
        self.category_status.clear();
        self.movie_status.clear();
    }

    /// Populate the form from the cached detail if `id` is still selected
    fn sync_movie_form(&mut self, id: u64) {
        if self.selection.movie_id != Some(id) {
            tracing::debug!(movie_id = id, "stale movie detail ignored");
            return;
        }
        if let Some(movie) = self.cache.movie(id) {
            self.movie_form.populate(movie);
        }
    }

    fn sync_property_name(&mut self) {
        let kind = self.property_form.kind;
        let catalog = self.cache.properties(kind).unwrap_or_default();
        self.property_form.sync_name(catalog);
    }

    pub fn highlight_available(&mut self, actor_id: u64) {
        self.selection.set_available_id(actor_id);
    }

    pub fn highlight_selected(&mut self, actor_id: u64) {
        self.selection.set_selected_id(actor_id);
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Invalidate the mutation's tags and refetch what is still on screen.
    /// A movie returned by the mutation replaces its detail directly.
    async fn finish(&mut self, mutation: Mutation, returned: Option<Movie>) {
        let mut dropped = self.cache.apply(mutation);
        if let Some(movie) = returned {
            dropped.remove(&QueryKey::Movie(movie.id));
            self.cache.store_movie(movie);
        }
        self.refetch(dropped).await;

        if let Some(id) = self.selection.movie_id {
            self.sync_movie_form(id);
        }
        self.sync_property_name();
    }

    async fn refetch(&mut self, keys: BTreeSet<QueryKey>) {
        let selected = self.selection.movie_id;
        for key in keys {
            let result = match key {
                QueryKey::Movies => self.load_movies().await.map(|_| ()),
                QueryKey::Properties(kind) => self.load_catalog(kind).await.map(|_| ()),
                // Details of other movies are fetched again when selected
                QueryKey::Movie(id) if Some(id) == selected => {
                    self.load_movie(id).await.map(|_| ())
                }
                QueryKey::Movie(_) => Ok(()),
            };
            if let Err(e) = result {
                tracing::warn!(?key, error = %e, "refetch failed");
            }
        }
    }

    /// Link or unlink the highlighted actor. Skipped when no movie is
    /// selected or no actor is highlighted.
    pub async fn transfer_actor(&mut self, transfer: Transfer) -> Outcome {
        let Some(movie_id) = self.selection.movie_id else {
            return Outcome::Skipped;
        };
        let highlighted = match transfer {
            Transfer::Add => self.selection.available_id,
            Transfer::Remove => self.selection.selected_id,
        };
        let Some(actor_id) = highlighted else {
            return Outcome::Skipped;
        };

        let result = match transfer {
            Transfer::Add => self.client.add_movie_actor(movie_id, actor_id).await,
            Transfer::Remove => self.client.remove_movie_actor(movie_id, actor_id).await,
        };

        let movie = match result {
            Ok(movie) => movie,
            Err(e) => {
                report_failure(&mut self.actor_status, None, &e);
                return Outcome::Failed(e);
            }
        };

        let actor = property_name(self.catalog(PropertyKind::Actor), actor_id)
            .or_else(|| property_name(&movie.actors, actor_id))
            .or_else(|| {
                self.cache
                    .movie(movie_id)
                    .and_then(|m| property_name(&m.actors, actor_id))
            })
            .unwrap_or_default()
            .to_string();
        tracing::info!(movie_id, actor_id, ?transfer, "actor association changed");

        let mutation = match transfer {
            Transfer::Add => {
                self.actor_status.set(format!(
                    "Successfully added {} to {}",
                    actor,
                    movie.display_name()
                ));
                Mutation::MovieActorAdd
            }
            Transfer::Remove => {
                self.actor_status.set(format!(
                    "Successfully removed {} from {}",
                    actor,
                    movie.display_name()
                ));
                self.selection.selected_id = None;
                Mutation::MovieActorRemove
            }
        };
        self.finish(mutation, Some(movie)).await;
        Outcome::Succeeded
    }

    /// Flip a category checkbox and persist it
    pub async fn toggle_category(&mut self, category_id: u64) -> Outcome {
        let checked = !self.movie_form.categories.contains(&category_id);
        self.set_category(category_id, checked).await
    }

    /// Check or uncheck a category and persist it. On failure the checkbox
    /// set is rolled back to the last known server state.
    pub async fn set_category(&mut self, category_id: u64, checked: bool) -> Outcome {
        let Some(movie_id) = self.selection.movie_id else {
            return Outcome::Skipped;
        };
        if !self.enabled() {
            return Outcome::Skipped;
        }

        if checked {
            self.movie_form.categories.insert(category_id);
        } else {
            self.movie_form.categories.remove(&category_id);
        }
        let result = if checked {
            self.client.add_movie_category(movie_id, category_id).await
        } else {
            self.client.remove_movie_category(movie_id, category_id).await
        };

        let movie = match result {
            Ok(movie) => movie,
            Err(e) => {
                self.movie_form.categories = self
                    .cache
                    .movie(movie_id)
                    .map(Movie::category_ids)
                    .unwrap_or_default();
                report_failure(&mut self.category_status, None, &e);
                return Outcome::Failed(e);
            }
        };

        let category = property_name(self.catalog(PropertyKind::Category), category_id)
            .or_else(|| property_name(&movie.categories, category_id))
            .unwrap_or_default()
            .to_string();
        tracing::info!(movie_id, category_id, checked, "category association changed");

        let mutation = if checked {
            self.category_status.set(format!(
                "Successfully added category {} to {}",
                category,
                movie.display_name()
            ));
            Mutation::MovieCategoryAdd
        } else {
            self.category_status.set(format!(
                "Successfully removed category {} from {}",
                category,
                movie.display_name()
            ));
            Mutation::MovieCategoryRemove
        };
        self.finish(mutation, Some(movie)).await;
        Outcome::Succeeded
    }

    /// Send the movie data form. Skipped when no movie is selected or a
    /// field fails local validation.
    pub async fn submit_movie_form(&mut self) -> Outcome {
        let Some(movie_id) = self.selection.movie_id else {
            return Outcome::Skipped;
        };

        let update = match self.movie_form.to_update() {
            Ok(update) => update,
            Err(errors) => {
                self.movie_form.errors = errors;
                return Outcome::Skipped;
            }
        };
        self.movie_form.errors.clear();

        match self.client.update_movie(movie_id, &update).await {
            Ok(movie) => {
                tracing::info!(movie_id, "movie updated");
                self.movie_status
                    .set(format!("Successfully updated movie {}", movie.display_name()));
                self.finish(Mutation::MovieUpdate, Some(movie)).await;
                Outcome::Succeeded
            }
            Err(e) => {
                report_failure(
                    &mut self.movie_status,
                    Some(&mut self.movie_form.errors),
                    &e,
                );
                Outcome::Failed(e)
            }
        }
    }

    /// First phase of movie removal: remember the movie and return the
    /// prompt to show.
    pub fn request_remove(&mut self) -> Option<String> {
        let movie_id = self.selection.movie_id?;
        let filename = self.filename_of(movie_id)?;
        self.pending_remove = Some(movie_id);
        Some(format!("Really remove {}?", filename))
    }

    pub fn cancel_remove(&mut self) {
        self.pending_remove = None;
    }

    fn filename_of(&self, movie_id: u64) -> Option<String> {
        self.cache
            .movie(movie_id)
            .map(|m| m.filename.clone())
            .or_else(|| {
                self.movies()
                    .iter()
                    .find(|m| m.id == movie_id)
                    .map(|m| m.filename.clone())
            })
    }

    /// Second phase: delete the movie confirmed by [`Self::request_remove`]
    pub async fn confirm_remove(&mut self) -> Outcome {
        let Some(movie_id) = self.pending_remove.take() else {
            return Outcome::Skipped;
        };
        let filename = self.filename_of(movie_id).unwrap_or_default();

        match self.client.delete_movie(movie_id).await {
            Ok(message) => {
                tracing::info!(movie_id, response = %message.message, "movie removed");
                if self.selection.movie_id == Some(movie_id) {
                    self.deselect();
                }
                self.movie_status
                    .set(format!("Successfully removed {}", filename));
                self.finish(Mutation::MovieDelete, None).await;
                Outcome::Succeeded
            }
            Err(e) => {
                report_failure(&mut self.movie_status, None, &e);
                Outcome::Failed(e)
            }
        }
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    /// Switch the property form to another kind and make sure its catalog
    /// is loaded
    pub async fn set_property_kind(&mut self, kind: PropertyKind) -> ApiResult<()> {
        self.property_form.set_kind(kind);
        self.property_status.clear();
        self.load_catalog(kind).await?;
        Ok(())
    }

    /// Pick an existing entry in the property form
    pub fn select_property(&mut self, id: Option<u64>) {
        let kind = self.property_form.kind;
        let catalog = self.cache.properties(kind).unwrap_or_default();
        self.property_form.select(id, catalog);
    }

    /// Send the property form. Skipped when the form is rejected locally.
    pub async fn submit_property_form(&mut self) -> Outcome {
        let request = match self.property_form.validate() {
            Ok(request) => request,
            Err(Rejection::NoSelection) => {
                self.property_status.fail(SELECTION_REQUIRED);
                return Outcome::Skipped;
            }
            Err(Rejection::Invalid(errors)) => {
                self.property_form.errors = errors;
                return Outcome::Skipped;
            }
        };
        self.property_form.errors.clear();

        let kind = request.kind();
        let result = match &request {
            PropertyRequest::Add { name, .. } => self
                .client
                .add_property(kind, name)
                .await
                .map(|_| Mutation::PropertyAdd(kind)),
            PropertyRequest::Update { id, name, .. } => self
                .client
                .update_property(kind, *id, name)
                .await
                .map(|_| Mutation::PropertyUpdate(kind)),
            PropertyRequest::Remove { id, .. } => self
                .client
                .delete_property(kind, *id)
                .await
                .map(|_| Mutation::PropertyDelete(kind)),
        };

        match result {
            Ok(mutation) => {
                tracing::info!(
                    %kind,
                    action = %request.action(),
                    name = request.name(),
                    "reference data changed"
                );
                self.property_status.set(request.success_message());
                self.property_form.after_success();
                self.finish(mutation, None).await;
                Outcome::Succeeded
            }
            Err(e) => {
                report_failure(
                    &mut self.property_status,
                    Some(&mut self.property_form.errors),
                    &e,
                );
                Outcome::Failed(e)
            }
        }
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Ask the backend to scan for new movie files
    pub async fn import_movies(&mut self) -> Outcome {
        match self.client.import_movies().await {
            Ok(files) => {
                tracing::info!(count = files.len(), "movies imported");
                self.import_status.set(import_message(files.len()));
                self.finish(Mutation::MoviesImport, None).await;
                Outcome::Succeeded
            }
            Err(e) => {
                report_failure(&mut self.import_status, None, &e);
                Outcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_message_counts() {
        assert_eq!(import_message(0), "No movie files found");
        assert_eq!(import_message(1), "Imported 1 file");
        assert_eq!(import_message(7), "Imported 7 files");
    }

    #[test]
    fn test_initial_session_is_disabled() {
        let session = Session::default();
        assert!(!session.enabled());
        assert!(session.movies().is_empty());
        assert!(session.selected_actors().is_empty());
        assert_eq!(session.import_status(), IMPORT_IDLE);
        assert!(session.movie_status().is_none());
    }

    #[test]
    fn test_report_failure_validation_leaves_status() {
        let mut status = Status::default();
        status.set("previous");
        let mut errors = FieldErrors::new();
        let error = ApiError::Validation(vec![crate::api::FieldIssue {
            field: "name".into(),
            message: "too long".into(),
        }]);
        report_failure(&mut status, Some(&mut errors), &error);
        assert_eq!(status.message(), Some("previous"));
        assert_eq!(errors.get("name"), Some("too long"));
    }

    #[test]
    fn test_report_failure_server_message() {
        let mut status = Status::default();
        let error = ApiError::Server {
            status: 409,
            message: Some("Actor already linked".into()),
        };
        report_failure(&mut status, None, &error);
        assert_eq!(status.message(), Some("Actor already linked"));
        assert!(status.is_failure());

        let error = ApiError::Server {
            status: 500,
            message: None,
        };
        report_failure(&mut status, None, &error);
        assert_eq!(status.message(), Some(crate::api::UNKNOWN_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_transfer_without_movie_sends_nothing() {
        // Nothing listens here; a request would set the status
        let mut session = Session::new(MovieManagerClient::new("http://127.0.0.1:9"));
        session.highlight_available(1);
        assert!(matches!(
            session.transfer_actor(Transfer::Add).await,
            Outcome::Skipped
        ));
        assert!(session.actor_status().is_none());
    }
}

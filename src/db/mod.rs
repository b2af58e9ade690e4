pub use backend::*;
pub use memory::*;
pub use photos::*;
pub use profiles::*;
pub use query::*;
pub use shows::*;

mod backend;
mod memory;
mod photos;
mod profiles;
mod query;
mod shows;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::BackendError;
use crate::models::{
    AccessToken, Contact, ContactUpsert, Event, Photo, PhotoInput, PhotoUpdate, Profile,
    ProfileUpsert, Show, ShowInput, ShowType,
};

/// Which shows to read. Results are always ordered by date, ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShowQuery {
    /// Only shows dated strictly after this instant.
    pub after: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl ShowQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn upcoming(now: DateTime<Utc>, limit: usize) -> Self {
        Self {
            after: Some(now),
            limit: Some(limit),
        }
    }
}

/// Table access the screens need. Reads are anonymous; writes carry the
/// signed-in admin's token.
#[async_trait]
pub trait SiteStore: Send + Sync {
    async fn get_profile(&self) -> Result<Option<Profile>, BackendError>;

    async fn upsert_profile(
        &self,
        token: &AccessToken,
        data: &ProfileUpsert,
    ) -> Result<(), BackendError>;

    async fn get_contact(&self) -> Result<Option<Contact>, BackendError>;

    async fn upsert_contact(
        &self,
        token: &AccessToken,
        data: &ContactUpsert,
    ) -> Result<(), BackendError>;

    async fn list_show_types(&self) -> Result<Vec<ShowType>, BackendError>;

    async fn list_shows(&self, query: &ShowQuery) -> Result<Vec<Show>, BackendError>;

    /// Inserts the show and its type relations, returning the new id.
    async fn create_show(&self, token: &AccessToken, input: &ShowInput)
        -> Result<i64, BackendError>;

    /// Updates the show and replaces its type relations.
    async fn update_show(
        &self,
        token: &AccessToken,
        id: i64,
        input: &ShowInput,
    ) -> Result<(), BackendError>;

    async fn delete_show(&self, token: &AccessToken, id: i64) -> Result<(), BackendError>;

    /// Newest first.
    async fn list_photos(&self, limit: Option<usize>) -> Result<Vec<Photo>, BackendError>;

    async fn create_photo(&self, token: &AccessToken, input: &PhotoInput)
        -> Result<(), BackendError>;

    async fn update_photo(
        &self,
        token: &AccessToken,
        id: i64,
        data: &PhotoUpdate,
    ) -> Result<(), BackendError>;

    async fn delete_photos(&self, token: &AccessToken, ids: &[i64]) -> Result<(), BackendError>;

    /// Ordered by name.
    async fn list_events(&self) -> Result<Vec<Event>, BackendError>;
}

#[async_trait]
impl SiteStore for Backend {
    async fn get_profile(&self) -> Result<Option<Profile>, BackendError> {
        profiles::get_profile(self).await
    }

    async fn upsert_profile(
        &self,
        token: &AccessToken,
        data: &ProfileUpsert,
    ) -> Result<(), BackendError> {
        profiles::upsert_profile(self, token, data).await
    }

    async fn get_contact(&self) -> Result<Option<Contact>, BackendError> {
        profiles::get_contact(self).await
    }

    async fn upsert_contact(
        &self,
        token: &AccessToken,
        data: &ContactUpsert,
    ) -> Result<(), BackendError> {
        profiles::upsert_contact(self, token, data).await
    }

    async fn list_show_types(&self) -> Result<Vec<ShowType>, BackendError> {
        shows::list_show_types(self).await
    }

    async fn list_shows(&self, query: &ShowQuery) -> Result<Vec<Show>, BackendError> {
        shows::list_shows(self, query).await
    }

    async fn create_show(
        &self,
        token: &AccessToken,
        input: &ShowInput,
    ) -> Result<i64, BackendError> {
        shows::create_show(self, token, input).await
    }

    async fn update_show(
        &self,
        token: &AccessToken,
        id: i64,
        input: &ShowInput,
    ) -> Result<(), BackendError> {
        shows::update_show(self, token, id, input).await
    }

    async fn delete_show(&self, token: &AccessToken, id: i64) -> Result<(), BackendError> {
        shows::delete_show(self, token, id).await
    }

    async fn list_photos(&self, limit: Option<usize>) -> Result<Vec<Photo>, BackendError> {
        photos::list_photos(self, limit).await
    }

    async fn create_photo(
        &self,
        token: &AccessToken,
        input: &PhotoInput,
    ) -> Result<(), BackendError> {
        photos::create_photo(self, token, input).await
    }

    async fn update_photo(
        &self,
        token: &AccessToken,
        id: i64,
        data: &PhotoUpdate,
    ) -> Result<(), BackendError> {
        photos::update_photo(self, token, id, data).await
    }

    async fn delete_photos(&self, token: &AccessToken, ids: &[i64]) -> Result<(), BackendError> {
        photos::delete_photos(self, token, ids).await
    }

    async fn list_events(&self) -> Result<Vec<Event>, BackendError> {
        shows::list_events(self).await
    }
}

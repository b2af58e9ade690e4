use crate::common::BackendError;
use crate::models::{AccessToken, Contact, ContactUpsert, Profile, ProfileUpsert};

use super::{Backend, RestQuery};

pub async fn get_profile(backend: &Backend) -> Result<Option<Profile>, BackendError> {
    RestQuery::table("profiles")
        .select("*")
        .order("id", true)
        .fetch_optional(backend, None)
        .await
}

pub async fn upsert_profile(
    backend: &Backend,
    token: &AccessToken,
    data: &ProfileUpsert,
) -> Result<(), BackendError> {
    RestQuery::table("profiles")
        .upsert(data, "id")?
        .execute(backend, Some(token))
        .await
}

pub async fn get_contact(backend: &Backend) -> Result<Option<Contact>, BackendError> {
    RestQuery::table("contacts")
        .select("*")
        .order("id", true)
        .fetch_optional(backend, None)
        .await
}

pub async fn upsert_contact(
    backend: &Backend,
    token: &AccessToken,
    data: &ContactUpsert,
) -> Result<(), BackendError> {
    RestQuery::table("contacts")
        .upsert(data, "id")?
        .execute(backend, Some(token))
        .await
}

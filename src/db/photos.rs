use crate::common::BackendError;
use crate::models::{AccessToken, Photo, PhotoInput, PhotoUpdate};

use super::{Backend, RestQuery};

const PHOTO_COLUMNS: &str = "*, event:events(name)";

pub async fn list_photos(
    backend: &Backend,
    limit: Option<usize>,
) -> Result<Vec<Photo>, BackendError> {
    let mut rest = RestQuery::table("photos")
        .select(PHOTO_COLUMNS)
        .order("created_at", false);
    if let Some(limit) = limit {
        rest = rest.limit(limit);
    }

    rest.fetch_all(backend, None).await
}

pub async fn create_photo(
    backend: &Backend,
    token: &AccessToken,
    input: &PhotoInput,
) -> Result<(), BackendError> {
    RestQuery::table("photos")
        .insert(input)?
        .execute(backend, Some(token))
        .await
}

pub async fn update_photo(
    backend: &Backend,
    token: &AccessToken,
    id: i64,
    data: &PhotoUpdate,
) -> Result<(), BackendError> {
    RestQuery::table("photos")
        .update(data)?
        .eq("id", id)
        .execute(backend, Some(token))
        .await
}

pub async fn delete_photos(
    backend: &Backend,
    token: &AccessToken,
    ids: &[i64],
) -> Result<(), BackendError> {
    if ids.is_empty() {
        return Ok(());
    }

    RestQuery::table("photos")
        .delete()
        .in_list("id", ids)
        .execute(backend, Some(token))
        .await
}

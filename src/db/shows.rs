use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::common::BackendError;
use crate::models::{AccessToken, Event, Show, ShowInput, ShowType};

use super::{Backend, RestQuery, ShowQuery};

const SHOW_COLUMNS: &str = "*, show_type_relations(type_id)";

#[derive(Deserialize)]
struct IdRow {
    id: i64,
}

#[derive(Serialize)]
struct TypeRelationInsert {
    show_id: i64,
    type_id: i64,
}

pub async fn list_show_types(backend: &Backend) -> Result<Vec<ShowType>, BackendError> {
    RestQuery::table("show_types")
        .select("*")
        .order("id", true)
        .fetch_all(backend, None)
        .await
}

pub async fn list_events(backend: &Backend) -> Result<Vec<Event>, BackendError> {
    RestQuery::table("events")
        .select("id, name")
        .order("name", true)
        .fetch_all(backend, None)
        .await
}

pub async fn list_shows(backend: &Backend, query: &ShowQuery) -> Result<Vec<Show>, BackendError> {
    let mut rest = RestQuery::table("shows").select(SHOW_COLUMNS);
    if let Some(after) = query.after {
        rest = rest.gt("date", after.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    rest = rest.order("date", true);
    if let Some(limit) = query.limit {
        rest = rest.limit(limit);
    }

    rest.fetch_all(backend, None).await
}

pub async fn create_show(
    backend: &Backend,
    token: &AccessToken,
    input: &ShowInput,
) -> Result<i64, BackendError> {
    let created: Vec<IdRow> = RestQuery::table("shows")
        .insert(input)?
        .select("id")
        .returning()
        .fetch_all(backend, Some(token))
        .await?;

    let id = created
        .first()
        .map(|row| row.id)
        .ok_or(BackendError::MissingRow("shows"))?;

    insert_type_relations(backend, token, id, &input.type_ids).await;

    Ok(id)
}

pub async fn update_show(
    backend: &Backend,
    token: &AccessToken,
    id: i64,
    input: &ShowInput,
) -> Result<(), BackendError> {
    RestQuery::table("shows")
        .update(input)?
        .eq("id", id)
        .execute(backend, Some(token))
        .await?;

    if let Err(e) = delete_type_relations(backend, token, id).await {
        log::error!("Failed to clear show types of show {}: {}", id, e);
    }
    insert_type_relations(backend, token, id, &input.type_ids).await;

    Ok(())
}

pub async fn delete_show(
    backend: &Backend,
    token: &AccessToken,
    id: i64,
) -> Result<(), BackendError> {
    if let Err(e) = delete_type_relations(backend, token, id).await {
        log::error!("Failed to clear show types of show {}: {}", id, e);
    }

    RestQuery::table("shows")
        .delete()
        .eq("id", id)
        .execute(backend, Some(token))
        .await
}

async fn delete_type_relations(
    backend: &Backend,
    token: &AccessToken,
    show_id: i64,
) -> Result<(), BackendError> {
    RestQuery::table("show_type_relations")
        .delete()
        .eq("show_id", show_id)
        .execute(backend, Some(token))
        .await
}

/// Relation failures are logged and swallowed: the show row itself was written.
async fn insert_type_relations(backend: &Backend, token: &AccessToken, show_id: i64, type_ids: &[i64]) {
    if type_ids.is_empty() {
        return;
    }

    let rows: Vec<TypeRelationInsert> = type_ids
        .iter()
        .map(|&type_id| TypeRelationInsert { show_id, type_id })
        .collect();

    let result = match RestQuery::table("show_type_relations").insert(&rows) {
        Ok(q) => q.execute(backend, Some(token)).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        log::error!("Failed to link show {} to types {:?}: {}", show_id, type_ids, e);
    }
}

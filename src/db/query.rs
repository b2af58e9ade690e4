use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use std::fmt::Display;

use crate::common::BackendError;
use crate::models::AccessToken;

use super::backend::{check_status, Backend};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Clone, PartialEq)]
enum Action {
    Select,
    Insert(Value),
    Update(Value),
    Upsert { body: Value, on_conflict: String },
    Delete,
}

/// Builder for one request against the relational API.
///
/// Mirrors the query surface the screens need: column selection with
/// embedded relations, `eq`/`gt`/`in` filters, ordering, limits and
/// insert/update/upsert/delete.
#[derive(Debug, Clone, PartialEq)]
pub struct RestQuery {
    table: String,
    action: Action,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
    returning: bool,
}

impl RestQuery {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            action: Action::Select,
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            returning: false,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.split_whitespace().collect::<String>());
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn gt(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("gt.{value}")));
        self
    }

    pub fn in_list<T: Display>(mut self, column: &str, values: &[T]) -> Self {
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push((column.to_string(), format!("in.({joined})")));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{column}.{direction}"));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn insert<T: Serialize + ?Sized>(mut self, rows: &T) -> Result<Self, BackendError> {
        self.action = Action::Insert(serde_json::to_value(rows)?);
        Ok(self)
    }

    pub fn update<T: Serialize + ?Sized>(mut self, values: &T) -> Result<Self, BackendError> {
        self.action = Action::Update(serde_json::to_value(values)?);
        Ok(self)
    }

    pub fn upsert<T: Serialize + ?Sized>(
        mut self,
        rows: &T,
        on_conflict: &str,
    ) -> Result<Self, BackendError> {
        self.action = Action::Upsert {
            body: serde_json::to_value(rows)?,
            on_conflict: on_conflict.to_string(),
        };
        Ok(self)
    }

    pub fn delete(mut self) -> Self {
        self.action = Action::Delete;
        self
    }

    /// Ask a write to return the affected rows (restricted by `select`).
    pub fn returning(mut self) -> Self {
        self.returning = true;
        self
    }

    pub fn method(&self) -> Method {
        match self.action {
            Action::Select => Method::GET,
            Action::Insert(_) | Action::Upsert { .. } => Method::POST,
            Action::Update(_) => Method::PATCH,
            Action::Delete => Method::DELETE,
        }
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if matches!(self.action, Action::Select) || self.returning {
            let select = self.select.clone().unwrap_or_else(|| "*".to_string());
            pairs.push(("select".to_string(), select));
        }
        if let Action::Upsert { on_conflict, .. } = &self.action {
            pairs.push(("on_conflict".to_string(), on_conflict.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }

    pub fn prefer(&self) -> Option<String> {
        let ret = if self.returning {
            "return=representation"
        } else {
            "return=minimal"
        };

        match self.action {
            Action::Select => None,
            Action::Upsert { .. } => Some(format!("resolution=merge-duplicates,{ret}")),
            _ => Some(ret.to_string()),
        }
    }

    fn body(&self) -> Option<&Value> {
        match &self.action {
            Action::Insert(body) | Action::Update(body) | Action::Upsert { body, .. } => Some(body),
            Action::Select | Action::Delete => None,
        }
    }

    fn build(&self, backend: &Backend, token: Option<&AccessToken>) -> reqwest::RequestBuilder {
        let mut request = backend
            .request(self.method(), &backend.rest_url(&self.table), token)
            .query(&self.query_pairs());

        if let Some(prefer) = self.prefer() {
            request = request.header("Prefer", prefer);
        }
        if let Some(body) = self.body() {
            request = request.json(body);
        }

        request
    }

    pub async fn fetch_all<T: DeserializeOwned>(
        self,
        backend: &Backend,
        token: Option<&AccessToken>,
    ) -> Result<Vec<T>, BackendError> {
        let response = check_status(self.build(backend, token).send().await?).await?;
        let bytes = response.bytes().await?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Reads exactly one row; "no row" comes back as `None` instead of an error.
    pub async fn fetch_optional<T: DeserializeOwned>(
        self,
        backend: &Backend,
        token: Option<&AccessToken>,
    ) -> Result<Option<T>, BackendError> {
        let response = self
            .limit(1)
            .build(backend, token)
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }

        let bytes = check_status(response).await?.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub async fn execute(
        self,
        backend: &Backend,
        token: Option<&AccessToken>,
    ) -> Result<(), BackendError> {
        check_status(self.build(backend, token).send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(q: &RestQuery) -> Vec<(String, String)> {
        q.query_pairs()
    }

    fn expected(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn select_with_embedded_relation_filter_order_and_limit() {
        let q = RestQuery::table("shows")
            .select("*, show_type_relations(type_id)")
            .gt("date", "2025-07-01T00:00:00Z")
            .order("date", true)
            .limit(10);

        assert_eq!(q.method(), Method::GET);
        assert_eq!(q.prefer(), None);
        assert_eq!(
            pairs(&q),
            expected(&[
                ("select", "*,show_type_relations(type_id)"),
                ("date", "gt.2025-07-01T00:00:00Z"),
                ("order", "date.asc"),
                ("limit", "10"),
            ])
        );
    }

    #[test]
    fn delete_with_in_filter_has_no_select() {
        let q = RestQuery::table("photos").delete().in_list("id", &[3, 5, 8]);

        assert_eq!(q.method(), Method::DELETE);
        assert_eq!(q.prefer().as_deref(), Some("return=minimal"));
        assert_eq!(pairs(&q), expected(&[("id", "in.(3,5,8)")]));
    }

    #[test]
    fn insert_returning_id() {
        let q = RestQuery::table("shows")
            .insert(&serde_json::json!({"title": "周末笑声专场"}))
            .expect("serializable")
            .select("id")
            .returning();

        assert_eq!(q.method(), Method::POST);
        assert_eq!(q.prefer().as_deref(), Some("return=representation"));
        assert_eq!(pairs(&q), expected(&[("select", "id")]));
    }

    #[test]
    fn upsert_merges_on_conflict_column() {
        let q = RestQuery::table("profiles")
            .upsert(&serde_json::json!({"id": 1, "name": "马达"}), "id")
            .expect("serializable");

        assert_eq!(q.method(), Method::POST);
        assert_eq!(
            q.prefer().as_deref(),
            Some("resolution=merge-duplicates,return=minimal")
        );
        assert_eq!(pairs(&q), expected(&[("on_conflict", "id")]));
    }

    #[test]
    fn update_by_id_is_a_patch() {
        let q = RestQuery::table("photos")
            .update(&serde_json::json!({"title": "IMG_3178"}))
            .expect("serializable")
            .eq("id", 5);

        assert_eq!(q.method(), Method::PATCH);
        assert_eq!(pairs(&q), expected(&[("id", "eq.5")]));
    }
}

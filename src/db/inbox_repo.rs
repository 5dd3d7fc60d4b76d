// src/db/inbox_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::map_reference_error,
        error::AppError,
        query::{Pagination, SortAllowList, DEFAULT_LIMIT},
    },
    models::inbox::{CreateInboxPayload, InboxListParams, InboxMessage, UpdateInboxPayload},
};

const INBOX_COLUMNS: &str = "inbox_id, source, channel, type, name, email, phone, service_type, \
     message_raw, ai_json, dedupe_key, received_at, status, urgency_score, \
     urgency_level, customer_id, created_at, updated_at";

pub const INBOX_SORTS: SortAllowList = SortAllowList {
    default: "received_at DESC",
    allowed: &[
        ("received_at desc", "received_at DESC"),
        ("received_at asc", "received_at ASC"),
        ("created_at desc", "created_at DESC"),
        ("created_at asc", "created_at ASC"),
    ],
};

pub(crate) fn list_query(params: &InboxListParams) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM inbox WHERE 1=1", INBOX_COLUMNS));

    // unlinked_only vence: o filtro por cliente é ignorado
    if params.unlinked_only {
        qb.push(" AND customer_id IS NULL");
    } else if let Some(customer_id) = params.customer_id {
        qb.push(" AND customer_id = ").push_bind(customer_id);
    }

    if let Some(status) = &params.status {
        qb.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(kind) = &params.kind {
        qb.push(" AND type = ").push_bind(kind.clone());
    }
    if let Some(source) = &params.source {
        qb.push(" AND source = ").push_bind(source.clone());
    }
    if let Some(channel) = &params.channel {
        qb.push(" AND channel = ").push_bind(channel.clone());
    }

    let page = Pagination::clamp(params.limit, params.offset, DEFAULT_LIMIT);
    qb.push(" ORDER BY ")
        .push(INBOX_SORTS.resolve(params.sort.as_deref()))
        .push(" LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    qb
}

pub(crate) fn update_query(inbox_id: Uuid, patch: &UpdateInboxPayload) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE inbox SET ");

    {
        let mut set = qb.separated(", ");
        if let Some(status) = &patch.status {
            set.push("status = ").push_bind_unseparated(status.clone());
        }
        if let Some(kind) = &patch.kind {
            set.push("type = ").push_bind_unseparated(kind.clone());
        }
        if let Some(service_type) = &patch.service_type {
            set.push("service_type = ").push_bind_unseparated(service_type.clone());
        }
        if let Some(ai_json) = &patch.ai_json {
            set.push("ai_json = ").push_bind_unseparated(ai_json.clone());
        }
        if let Some(score) = patch.urgency_score {
            set.push("urgency_score = ").push_bind_unseparated(score);
        }
        if let Some(level) = patch.urgency_level {
            set.push("urgency_level = ").push_bind_unseparated(level);
        }
        if let Some(customer_id) = patch.customer_id {
            set.push("customer_id = ").push_bind_unseparated(customer_id);
        }
        set.push("updated_at = NOW()");
    }

    qb.push(" WHERE inbox_id = ")
        .push_bind(inbox_id)
        .push(" RETURNING ")
        .push(INBOX_COLUMNS);

    qb
}

#[derive(Clone, Default)]
pub struct InboxRepository;

impl InboxRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        params: &InboxListParams,
    ) -> Result<Vec<InboxMessage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = list_query(params);
        let messages = qb.build_query_as::<InboxMessage>().fetch_all(executor).await?;

        Ok(messages)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        inbox_id: Uuid,
    ) -> Result<Option<InboxMessage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM inbox WHERE inbox_id = $1", INBOX_COLUMNS);
        let message = sqlx::query_as::<_, InboxMessage>(&sql)
            .bind(inbox_id)
            .fetch_optional(executor)
            .await?;

        Ok(message)
    }

    pub async fn find_by_dedupe_key<'e, E>(
        &self,
        executor: E,
        dedupe_key: &str,
    ) -> Result<Option<InboxMessage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM inbox WHERE dedupe_key = $1", INBOX_COLUMNS);
        let message = sqlx::query_as::<_, InboxMessage>(&sql)
            .bind(dedupe_key)
            .fetch_optional(executor)
            .await?;

        Ok(message)
    }

    pub async fn exists<'e, E>(&self, executor: E, inbox_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM inbox WHERE inbox_id = $1)")
            .bind(inbox_id)
            .fetch_one(executor)
            .await?;

        Ok(exists)
    }

    /// Retorna `None` quando o `dedupe_key` já foi ingerido.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        payload: &CreateInboxPayload,
    ) -> Result<Option<InboxMessage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO inbox (
                inbox_id, source, channel, type, name, email, phone, service_type,
                message_raw, ai_json, dedupe_key, received_at, status,
                urgency_score, urgency_level, customer_id, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                COALESCE($12, NOW()), COALESCE($13, 'unread'),
                $14, $15, $16, NOW(), NOW()
            )
            ON CONFLICT (dedupe_key) WHERE dedupe_key IS NOT NULL DO NOTHING
            RETURNING {}
            "#,
            INBOX_COLUMNS
        );

        let message = sqlx::query_as::<_, InboxMessage>(&sql)
            .bind(Uuid::new_v4())
            .bind(&payload.source)
            .bind(&payload.channel)
            .bind(&payload.kind)
            .bind(&payload.name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.service_type)
            .bind(&payload.message_raw)
            .bind(&payload.ai_json)
            .bind(&payload.dedupe_key)
            .bind(payload.received_at)
            .bind(&payload.status)
            .bind(payload.urgency_score)
            .bind(payload.urgency_level)
            .bind(payload.customer_id)
            .fetch_optional(executor)
            .await
            .map_err(map_reference_error)?;

        Ok(message)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        inbox_id: Uuid,
        patch: &UpdateInboxPayload,
    ) -> Result<Option<InboxMessage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = update_query(inbox_id, patch);
        let message = qb
            .build_query_as::<InboxMessage>()
            .fetch_optional(executor)
            .await
            .map_err(map_reference_error)?;

        Ok(message)
    }

    pub async fn delete<'e, E>(&self, executor: E, inbox_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inbox WHERE inbox_id = $1")
            .bind(inbox_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Desvincula as mensagens do cliente (customer_id = NULL).
    pub async fn unlink_customer<'e, E>(&self, executor: E, customer_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE inbox SET customer_id = NULL, updated_at = NOW() WHERE customer_id = $1",
        )
        .bind(customer_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlinked_only_wins_over_customer_filter() {
        let params = InboxListParams {
            customer_id: Some(Uuid::new_v4()),
            unlinked_only: true,
            ..Default::default()
        };
        let qb = list_query(&params);

        assert!(qb.sql().contains("AND customer_id IS NULL"));
        assert!(!qb.sql().contains("customer_id = $"));
    }

    #[test]
    fn customer_filter_applies_when_not_unlinked_only() {
        let params = InboxListParams {
            customer_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let qb = list_query(&params);

        assert!(qb.sql().contains("AND customer_id = $1"));
        assert!(!qb.sql().contains("IS NULL"));
    }

    #[test]
    fn equality_filters_and_default_sort() {
        let params = InboxListParams {
            status: Some("unread".into()),
            kind: Some("lead".into()),
            source: Some("email".into()),
            ..Default::default()
        };
        let qb = list_query(&params);

        assert!(qb.sql().contains(
            "AND status = $1 AND type = $2 AND source = $3 ORDER BY received_at DESC LIMIT $4 OFFSET $5"
        ));
    }

    #[test]
    fn created_at_sort_is_allowed() {
        let params = InboxListParams {
            sort: Some("created_at asc".into()),
            ..Default::default()
        };
        assert!(list_query(&params).sql().contains("ORDER BY created_at ASC"));
    }

    fn from_query(query: &str) -> InboxListParams {
        let uri: axum::http::Uri = format!("/api/inbox?{}", query).parse().unwrap();
        axum::extract::Query::<InboxListParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn type_query_param_maps_to_kind() {
        let params = from_query("type=lead&unlinked_only=true");

        assert_eq!(params.kind.as_deref(), Some("lead"));
        assert!(params.unlinked_only);
    }

    #[test]
    fn blank_filters_add_no_constraint() {
        let params = from_query("customer_id=&status=&type=&source=&channel=&unlinked_only=&limit=");

        assert!(!params.unlinked_only);
        assert_eq!(params.customer_id, None);
        let qb = list_query(&params);
        assert!(qb.sql().contains("WHERE 1=1 ORDER BY received_at DESC LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn null_customer_id_unlinks() {
        let patch: UpdateInboxPayload = serde_json::from_str(r#"{"customer_id": null}"#).unwrap();
        assert_eq!(patch.customer_id, Some(None));

        let qb = update_query(Uuid::nil(), &patch);
        assert!(qb.sql().starts_with("UPDATE inbox SET customer_id = $1, updated_at = NOW()"));
    }
}

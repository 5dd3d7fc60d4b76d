// src/db/lead_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::map_reference_error,
        error::AppError,
        query::{Pagination, SortAllowList, DEFAULT_LIMIT},
    },
    models::lead::{CreateLeadPayload, Lead, LeadListParams, LeadStatus, UpdateLeadPayload},
};

const LEAD_COLUMNS: &str = "lead_id, customer_id, inbox_ref, intent, status, channel, \
     summary, description, urgency, urgency_score, expected_close_date, \
     created_at, updated_at, dedupe_key";

pub const LEAD_SORTS: SortAllowList = SortAllowList {
    default: "updated_at DESC",
    allowed: &[
        ("updated_at desc", "updated_at DESC"),
        ("updated_at asc", "updated_at ASC"),
        ("created_at desc", "created_at DESC"),
        ("created_at asc", "created_at ASC"),
        ("expected_close_date desc", "expected_close_date DESC"),
        ("expected_close_date asc", "expected_close_date ASC"),
    ],
};

pub(crate) fn list_query(params: &LeadListParams) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM leads WHERE 1=1", LEAD_COLUMNS));

    if let Some(status) = params.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(intent) = &params.intent {
        qb.push(" AND intent = ").push_bind(intent.clone());
    }
    if let Some(urgency) = params.urgency {
        qb.push(" AND urgency = ").push_bind(urgency);
    }
    if let Some(customer_id) = params.customer_id {
        qb.push(" AND customer_id = ").push_bind(customer_id);
    }
    if let Some(channel) = &params.channel {
        qb.push(" AND channel = ").push_bind(channel.clone());
    }

    let page = Pagination::clamp(params.limit, params.offset, DEFAULT_LIMIT);
    qb.push(" ORDER BY ")
        .push(LEAD_SORTS.resolve(params.sort.as_deref()))
        .push(" LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    qb
}

pub(crate) fn update_query(lead_id: Uuid, patch: &UpdateLeadPayload) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE leads SET ");

    {
        let mut set = qb.separated(", ");
        if let Some(customer_id) = patch.customer_id {
            set.push("customer_id = ").push_bind_unseparated(customer_id);
        }
        if let Some(inbox_ref) = patch.inbox_ref {
            set.push("inbox_ref = ").push_bind_unseparated(inbox_ref);
        }
        if let Some(intent) = &patch.intent {
            set.push("intent = ").push_bind_unseparated(intent.clone());
        }
        if let Some(status) = patch.status {
            set.push("status = ").push_bind_unseparated(status);
        }
        if let Some(channel) = &patch.channel {
            set.push("channel = ").push_bind_unseparated(channel.clone());
        }
        if let Some(summary) = &patch.summary {
            set.push("summary = ").push_bind_unseparated(summary.clone());
        }
        if let Some(description) = &patch.description {
            set.push("description = ").push_bind_unseparated(description.clone());
        }
        if let Some(urgency) = patch.urgency {
            set.push("urgency = ").push_bind_unseparated(urgency);
        }
        if let Some(score) = patch.urgency_score {
            set.push("urgency_score = ").push_bind_unseparated(score);
        }
        if let Some(date) = patch.expected_close_date {
            set.push("expected_close_date = ").push_bind_unseparated(date);
        }
        set.push("updated_at = NOW()");
    }

    qb.push(" WHERE lead_id = ")
        .push_bind(lead_id)
        .push(" RETURNING ")
        .push(LEAD_COLUMNS);

    qb
}

#[derive(Clone, Default)]
pub struct LeadRepository;

impl LeadRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, params: &LeadListParams) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = list_query(params);
        let leads = qb.build_query_as::<Lead>().fetch_all(executor).await?;

        Ok(leads)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, lead_id: Uuid) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM leads WHERE lead_id = $1", LEAD_COLUMNS);
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(lead_id)
            .fetch_optional(executor)
            .await?;

        Ok(lead)
    }

    pub async fn find_by_dedupe_key<'e, E>(
        &self,
        executor: E,
        dedupe_key: &str,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM leads WHERE dedupe_key = $1", LEAD_COLUMNS);
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(dedupe_key)
            .fetch_optional(executor)
            .await?;

        Ok(lead)
    }

    pub async fn exists<'e, E>(&self, executor: E, lead_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM leads WHERE lead_id = $1)")
            .bind(lead_id)
            .fetch_one(executor)
            .await?;

        Ok(exists)
    }

    /// Retorna `None` quando já existe um lead com o mesmo `dedupe_key`.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        payload: &CreateLeadPayload,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO leads (
                lead_id, customer_id, inbox_ref, intent, status, channel,
                summary, description, urgency, urgency_score, expected_close_date,
                dedupe_key, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW())
            ON CONFLICT (dedupe_key) WHERE dedupe_key IS NOT NULL DO NOTHING
            RETURNING {}
            "#,
            LEAD_COLUMNS
        );

        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(Uuid::new_v4())
            .bind(payload.customer_id)
            .bind(payload.inbox_ref)
            .bind(&payload.intent)
            .bind(payload.status.unwrap_or(LeadStatus::New))
            .bind(&payload.channel)
            .bind(&payload.summary)
            .bind(&payload.description)
            .bind(payload.urgency)
            .bind(payload.urgency_score)
            .bind(payload.expected_close_date)
            .bind(&payload.dedupe_key)
            .fetch_optional(executor)
            .await
            .map_err(map_reference_error)?;

        Ok(lead)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
        patch: &UpdateLeadPayload,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = update_query(lead_id, patch);
        let lead = qb
            .build_query_as::<Lead>()
            .fetch_optional(executor)
            .await
            .map_err(map_reference_error)?;

        Ok(lead)
    }

    pub async fn delete<'e, E>(&self, executor: E, lead_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM leads WHERE lead_id = $1")
            .bind(lead_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_customer<'e, E>(&self, executor: E, customer_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM leads WHERE customer_id = $1")
            .bind(customer_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

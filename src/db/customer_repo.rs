// src/db/customer_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::like_pattern,
        error::AppError,
        query::{Pagination, SortAllowList, DEFAULT_LIMIT},
    },
    models::customer::{
        CreateCustomerPayload, Customer, CustomerOverview, CustomerOverviewParams,
        CustomerThreadEntry, UpdateCustomerPayload,
    },
};

const CUSTOMER_COLUMNS: &str = "customer_id, name, email, phone, created_at, updated_at";

const OVERVIEW_COLUMNS: &str = "customer_id, name, email, phone, latest_inbox_id, latest_activity_at, \
     latest_message, latest_service_type, latest_vehicle_type, \
     unread_messages, total_messages, open_leads";

pub const OVERVIEW_SORTS: SortAllowList = SortAllowList {
    default: "latest_activity_at DESC",
    allowed: &[
        ("latest_activity_at desc", "latest_activity_at DESC"),
        ("latest_activity_at asc", "latest_activity_at ASC"),
        ("name asc", "name ASC"),
        ("name desc", "name DESC"),
    ],
};

pub const THREAD_DEFAULT_LIMIT: i64 = 100;

/// Monta o SELECT da listagem de clientes a partir dos filtros opcionais.
pub(crate) fn overview_query(params: &CustomerOverviewParams) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM customer_overview WHERE 1=1",
        OVERVIEW_COLUMNS
    ));

    if let Some(term) = params.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR phone ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    match params.has_unread {
        Some(true) => { qb.push(" AND unread_messages > 0"); }
        Some(false) => { qb.push(" AND unread_messages = 0"); }
        None => {}
    }

    match params.has_open_leads {
        Some(true) => { qb.push(" AND open_leads > 0"); }
        Some(false) => { qb.push(" AND open_leads = 0"); }
        None => {}
    }

    let page = Pagination::clamp(params.limit, params.offset, DEFAULT_LIMIT);
    qb.push(" ORDER BY ")
        .push(OVERVIEW_SORTS.resolve(params.sort.as_deref()))
        .push(" LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    qb
}

/// UPDATE parcial: uma atribuição por campo presente, mais `updated_at`.
pub(crate) fn update_query(customer_id: Uuid, patch: &UpdateCustomerPayload) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE customers SET ");

    {
        let mut set = qb.separated(", ");
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(email) = &patch.email {
            set.push("email = ").push_bind_unseparated(email.clone());
        }
        if let Some(phone) = &patch.phone {
            set.push("phone = ").push_bind_unseparated(phone.clone());
        }
        set.push("updated_at = NOW()");
    }

    qb.push(" WHERE customer_id = ")
        .push_bind(customer_id)
        .push(" RETURNING ")
        .push(CUSTOMER_COLUMNS);

    qb
}

#[derive(Clone, Default)]
pub struct CustomerRepository;

impl CustomerRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_overview<'e, E>(
        &self,
        executor: E,
        params: &CustomerOverviewParams,
    ) -> Result<Vec<CustomerOverview>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = overview_query(params);
        let rows = qb
            .build_query_as::<CustomerOverview>()
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM customers WHERE customer_id = $1", CUSTOMER_COLUMNS);
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_id)
            .fetch_optional(executor)
            .await?;

        Ok(customer)
    }

    pub async fn exists<'e, E>(&self, executor: E, customer_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM customers WHERE customer_id = $1)",
        )
        .bind(customer_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Id e timestamps são gerados aqui; `created_at` e `updated_at` saem iguais.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &CreateCustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO customers (customer_id, name, email, phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(Uuid::new_v4())
            .bind(&payload.name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .fetch_one(executor)
            .await?;

        Ok(customer)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        patch: &UpdateCustomerPayload,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = update_query(customer_id, patch);
        let customer = qb
            .build_query_as::<Customer>()
            .fetch_optional(executor)
            .await?;

        Ok(customer)
    }

    pub async fn delete<'e, E>(&self, executor: E, customer_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(customer_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Linha do tempo do cliente, mais recente primeiro.
    pub async fn thread<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<CustomerThreadEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, CustomerThreadEntry>(
            r#"
            SELECT customer_id, event_type, occurred_at, title, body,
                   ref_inbox_id, ref_lead_id, status, channel, source
            FROM customer_thread
            WHERE customer_id = $1
            ORDER BY occurred_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(customer_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }
}

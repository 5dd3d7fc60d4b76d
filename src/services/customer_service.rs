// src/services/customer_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, query::Pagination},
    db::{customer_repo::THREAD_DEFAULT_LIMIT, CustomerRepository, InboxRepository, LeadRepository},
    models::customer::{
        CreateCustomerPayload, Customer, CustomerOverview, CustomerOverviewParams,
        CustomerThreadEntry, ThreadParams, UpdateCustomerPayload,
    },
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    lead_repo: LeadRepository,
    inbox_repo: InboxRepository,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository, lead_repo: LeadRepository, inbox_repo: InboxRepository) -> Self {
        Self { repo, lead_repo, inbox_repo }
    }

    pub async fn list_overview<'e, E>(
        &self,
        executor: E,
        params: &CustomerOverviewParams,
    ) -> Result<Vec<CustomerOverview>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_overview(executor, params).await
    }

    pub async fn get_customer<'e, E>(&self, executor: E, customer_id: Uuid) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, customer_id)
            .await?
            .ok_or(AppError::NotFound("Customer"))
    }

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        payload: &CreateCustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = self.repo.create(executor, payload).await?;
        tracing::info!("Cliente {} criado", customer.customer_id);
        Ok(customer)
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        patch: &UpdateCustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        if patch.is_empty() {
            return Err(AppError::NothingToUpdate);
        }

        let mut tx = executor.begin().await?;

        if !self.repo.exists(&mut *tx, customer_id).await? {
            return Err(AppError::NotFound("Customer"));
        }

        let customer = self
            .repo
            .update(&mut *tx, customer_id, patch)
            .await?
            .ok_or(AppError::NotFound("Customer"))?;

        tx.commit().await?;

        Ok(customer)
    }

    /// Remove o cliente em uma única transação: apaga os leads, desvincula
    /// as mensagens da inbox e só então apaga o cliente.
    pub async fn delete_customer<'e, E>(&self, executor: E, customer_id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        if !self.repo.exists(&mut *tx, customer_id).await? {
            return Err(AppError::NotFound("Customer"));
        }

        let removed_leads = self.lead_repo.delete_by_customer(&mut *tx, customer_id).await?;
        let unlinked = self.inbox_repo.unlink_customer(&mut *tx, customer_id).await?;
        self.repo.delete(&mut *tx, customer_id).await?;

        tx.commit().await?;

        tracing::info!(
            "Cliente {} removido ({} leads apagados, {} mensagens desvinculadas)",
            customer_id,
            removed_leads,
            unlinked
        );

        Ok(())
    }

    pub async fn get_thread<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        params: &ThreadParams,
    ) -> Result<Vec<CustomerThreadEntry>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let page = Pagination::clamp(params.limit, params.offset, THREAD_DEFAULT_LIMIT);

        let mut tx = executor.begin().await?;

        if !self.repo.exists(&mut *tx, customer_id).await? {
            return Err(AppError::NotFound("Customer"));
        }

        let entries = self.repo.thread(&mut *tx, customer_id, page).await?;

        tx.commit().await?;

        Ok(entries)
    }
}

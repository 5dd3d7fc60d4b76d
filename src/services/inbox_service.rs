// src/services/inbox_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InboxRepository,
    models::inbox::{CreateInboxPayload, InboxListParams, InboxMessage, UpdateInboxPayload},
};

#[derive(Clone)]
pub struct InboxService {
    repo: InboxRepository,
}

impl InboxService {
    pub fn new(repo: InboxRepository) -> Self {
        Self { repo }
    }

    pub async fn list_messages<'e, E>(
        &self,
        executor: E,
        params: &InboxListParams,
    ) -> Result<Vec<InboxMessage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if params.unlinked_only && params.customer_id.is_some() {
            tracing::debug!("unlinked_only ativo, filtro customer_id ignorado");
        }
        self.repo.list(executor, params).await
    }

    pub async fn get_message<'e, E>(&self, executor: E, inbox_id: Uuid) -> Result<InboxMessage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, inbox_id)
            .await?
            .ok_or(AppError::NotFound("Inbox message"))
    }

    pub async fn ingest_message<'e, E>(
        &self,
        executor: E,
        payload: &CreateInboxPayload,
    ) -> Result<InboxMessage, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let message = match self.repo.insert(&mut *tx, payload).await? {
            Some(message) => message,
            None => {
                let key = payload.dedupe_key.as_deref().unwrap_or_default();
                tracing::info!("Mensagem duplicada ignorada (dedupe_key '{}')", key);
                self.repo
                    .find_by_dedupe_key(&mut *tx, key)
                    .await?
                    .ok_or(AppError::NotFound("Inbox message"))?
            }
        };

        tx.commit().await?;

        Ok(message)
    }

    pub async fn update_message<'e, E>(
        &self,
        executor: E,
        inbox_id: Uuid,
        patch: &UpdateInboxPayload,
    ) -> Result<InboxMessage, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        if patch.is_empty() {
            return Err(AppError::NothingToUpdate);
        }

        let mut tx = executor.begin().await?;

        if !self.repo.exists(&mut *tx, inbox_id).await? {
            return Err(AppError::NotFound("Inbox message"));
        }

        let message = self
            .repo
            .update(&mut *tx, inbox_id, patch)
            .await?
            .ok_or(AppError::NotFound("Inbox message"))?;

        tx.commit().await?;

        Ok(message)
    }

    pub async fn delete_message<'e, E>(&self, executor: E, inbox_id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        if !self.repo.exists(&mut *tx, inbox_id).await? {
            return Err(AppError::NotFound("Inbox message"));
        }

        self.repo.delete(&mut *tx, inbox_id).await?;
        tx.commit().await?;

        Ok(())
    }
}

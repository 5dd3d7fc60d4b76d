// src/services/lead_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadRepository,
    models::lead::{CreateLeadPayload, Lead, LeadListParams, UpdateLeadPayload},
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
}

impl LeadService {
    pub fn new(repo: LeadRepository) -> Self {
        Self { repo }
    }

    pub async fn list_leads<'e, E>(&self, executor: E, params: &LeadListParams) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, params).await
    }

    pub async fn get_lead<'e, E>(&self, executor: E, lead_id: Uuid) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, lead_id)
            .await?
            .ok_or(AppError::NotFound("Lead"))
    }

    /// Ingestão idempotente: um `dedupe_key` repetido devolve o lead já gravado.
    pub async fn create_lead<'e, E>(&self, executor: E, payload: &CreateLeadPayload) -> Result<Lead, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let lead = match self.repo.insert(&mut *tx, payload).await? {
            Some(lead) => {
                tracing::info!("Lead {} criado para o cliente {}", lead.lead_id, lead.customer_id);
                lead
            }
            None => {
                // Só há conflito quando o dedupe_key veio preenchido
                let key = payload.dedupe_key.as_deref().unwrap_or_default();
                let existing = self
                    .repo
                    .find_by_dedupe_key(&mut *tx, key)
                    .await?
                    .ok_or(AppError::NotFound("Lead"))?;
                tracing::info!("Lead duplicado ignorado (dedupe_key '{}')", key);
                existing
            }
        };

        tx.commit().await?;

        Ok(lead)
    }

    pub async fn update_lead<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
        patch: &UpdateLeadPayload,
    ) -> Result<Lead, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        if patch.is_empty() {
            return Err(AppError::NothingToUpdate);
        }

        let mut tx = executor.begin().await?;

        if !self.repo.exists(&mut *tx, lead_id).await? {
            return Err(AppError::NotFound("Lead"));
        }

        let lead = self
            .repo
            .update(&mut *tx, lead_id, patch)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;

        tx.commit().await?;

        Ok(lead)
    }

    pub async fn delete_lead<'e, E>(&self, executor: E, lead_id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        if !self.repo.exists(&mut *tx, lead_id).await? {
            return Err(AppError::NotFound("Lead"));
        }

        self.repo.delete(&mut *tx, lead_id).await?;
        tx.commit().await?;

        Ok(())
    }
}

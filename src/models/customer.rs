// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{patch::present, query::blank_as_none};

// --- REGISTROS ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
pub struct Customer {
    pub customer_id: Uuid,
    #[schema(example = "Maria da Silva")]
    pub name: Option<String>,
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,
    #[schema(example = "+46 70 123 45 67")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha da view `customer_overview`: contato + agregados de inbox e leads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CustomerOverview {
    pub customer_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub latest_inbox_id: Option<Uuid>,
    pub latest_activity_at: Option<DateTime<Utc>>,
    pub latest_message: Option<String>,
    pub latest_service_type: Option<String>,
    pub latest_vehicle_type: Option<String>,
    pub unread_messages: i64,
    pub total_messages: i64,
    pub open_leads: i64,
}

/// Um evento da linha do tempo do cliente (mensagem ou evento de lead).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CustomerThreadEntry {
    pub customer_id: Uuid,
    #[schema(example = "message")]
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub ref_inbox_id: Option<Uuid>,
    pub ref_lead_id: Option<Uuid>,
    pub status: Option<String>,
    pub channel: Option<String>,
    pub source: Option<String>,
}

// --- FILTROS ---

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerOverviewParams {
    /// Busca em nome, e-mail ou telefone
    #[serde(default, deserialize_with = "blank_as_none")]
    pub q: Option<String>,
    /// `latest_activity_at desc|asc` ou `name asc|desc`
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub has_unread: Option<bool>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub has_open_leads: Option<bool>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ThreadParams {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub offset: Option<i64>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,

    pub phone: Option<String>,
}

/// PUT parcial: só os campos presentes no corpo são gravados.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerPayload {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[validate(email(message = "invalid_email"))]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
}

impl UpdateCustomerPayload {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

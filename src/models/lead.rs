// src/models/lead.rs

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::IntoDeserializer, Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{patch::present, query::blank_as_none};

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_status do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "lead_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Quoted,
    Won,
    Lost,
}

// Mapeia o CREATE TYPE urgency_level (usado em leads e inbox)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "urgency_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Normal,
    High,
    Urgent,
}

// Filtros da query string chegam como texto; o vocabulário é o mesmo do serde.
impl FromStr for LeadStatus {
    type Err = serde::de::value::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s.into_deserializer())
    }
}

impl FromStr for Urgency {
    type Err = serde::de::value::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s.into_deserializer())
    }
}

// --- REGISTRO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
pub struct Lead {
    pub lead_id: Uuid,
    pub customer_id: Uuid,
    pub inbox_ref: Option<Uuid>,
    #[schema(example = "service")]
    pub intent: Option<String>,
    pub status: Option<LeadStatus>,
    #[schema(example = "email")]
    pub channel: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub urgency: Option<Urgency>,
    #[schema(example = 5)]
    pub urgency_score: Option<i32>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-06-30")]
    pub expected_close_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub dedupe_key: Option<String>,
}

// --- FILTROS ---

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeadListParams {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<LeadStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub intent: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub urgency: Option<Urgency>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub customer_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub channel: Option<String>,
    /// `updated_at|created_at|expected_close_date` + `asc|desc`
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub offset: Option<i64>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLeadPayload {
    pub customer_id: Uuid,
    pub inbox_ref: Option<Uuid>,
    pub intent: Option<String>,
    pub status: Option<LeadStatus>,
    pub channel: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub urgency: Option<Urgency>,

    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    #[schema(example = 5)]
    pub urgency_score: Option<i32>,

    #[schema(value_type = Option<String>, format = Date, example = "2025-06-30")]
    pub expected_close_date: Option<NaiveDate>,

    pub dedupe_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLeadPayload {
    // Coluna NOT NULL: `null` aqui equivale a ausente.
    #[serde(default)]
    pub customer_id: Option<Uuid>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<Uuid>)]
    pub inbox_ref: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub intent: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<LeadStatus>)]
    pub status: Option<Option<LeadStatus>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub channel: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub summary: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<Urgency>)]
    pub urgency: Option<Option<Urgency>>,

    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    #[schema(value_type = Option<i32>)]
    pub urgency_score: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_close_date: Option<Option<NaiveDate>>,
}

impl UpdateLeadPayload {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.inbox_ref.is_none()
            && self.intent.is_none()
            && self.status.is_none()
            && self.channel.is_none()
            && self.summary.is_none()
            && self.description.is_none()
            && self.urgency.is_none()
            && self.urgency_score.is_none()
            && self.expected_close_date.is_none()
    }
}

// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{CustomerRepository, InboxRepository, LeadRepository},
    services::{auth::AuthService, CustomerService, InboxService, LeadService},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8001";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_token: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let api_token = env::var("API_TOKEN").context("API_TOKEN deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(v) => v.parse().context("DATABASE_MAX_CONNECTIONS inválido")?,
            Err(_) => 5,
        };
        let acquire_timeout = match env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(v.parse().context("DATABASE_ACQUIRE_TIMEOUT_SECS inválido")?),
            Err(_) => Duration::from_secs(3),
        };

        Ok(Self {
            database_url,
            api_token,
            bind_addr,
            max_connections,
            acquire_timeout,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub customer_service: CustomerService,
    pub lead_service: LeadService,
    pub inbox_service: InboxService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, &config.api_token))
    }

    /// Monta o gráfico de dependências em cima de uma pool já criada.
    pub fn with_pool(db_pool: PgPool, api_token: &str) -> Self {
        let customer_repo = CustomerRepository::new();
        let lead_repo = LeadRepository::new();
        let inbox_repo = InboxRepository::new();

        Self {
            db_pool,
            auth_service: AuthService::new(api_token),
            customer_service: CustomerService::new(customer_repo, lead_repo.clone(), inbox_repo.clone()),
            lead_service: LeadService::new(lead_repo),
            inbox_service: InboxService::new(inbox_repo),
        }
    }
}

// src/services/auth.rs

use std::sync::Arc;

use crate::common::error::AppError;

/// Autenticação por token estático: um único segredo compartilhado pelo
/// serviço inteiro, sem sessão nem expiração.
#[derive(Clone)]
pub struct AuthService {
    api_token: Arc<str>,
}

impl AuthService {
    pub fn new(api_token: impl Into<Arc<str>>) -> Self {
        Self { api_token: api_token.into() }
    }

    pub fn verify(&self, credential: Option<&str>) -> Result<(), AppError> {
        match credential {
            None => Err(AppError::MissingToken),
            Some(token) if token == &*self.api_token => Ok(()),
            Some(_) => Err(AppError::InvalidToken),
        }
    }
}

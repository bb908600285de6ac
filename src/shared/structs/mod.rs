use serde::{Deserialize, Serialize};

use crate::shared::USER_AGENT;
use crate::shared::structs::config::Configuration;

pub mod config;
pub mod discord;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Configuration,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Configuration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(AppState {
            config,
            http_client,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DataResponse {
    pub data: String,
}

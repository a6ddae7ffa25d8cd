use crate::app_config::AppConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// An address resolved from a CEP, used to pre-fill registration forms.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "cep")]
    pub postal_code: String,
    #[serde(rename = "logradouro", default)]
    pub street: String,
    #[serde(rename = "complemento", default)]
    pub complement: String,
    #[serde(rename = "bairro", default)]
    pub neighborhood: String,
    #[serde(rename = "localidade")]
    pub city: String,
    #[serde(rename = "uf")]
    pub state: String,
}

#[derive(Debug, Clone)]
pub struct PostalClient {
    client: Client,
    url: String,
}

impl PostalClient {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        PostalClient {
            client,
            url: config.postal().url().trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self))]
    pub async fn lookup(&self, cep: &str) -> Result<PostalAddress, PostalLookupError> {
        let digits = normalize_cep(cep)?;

        info!("📮 Looking up CEP {}...", digits);
        let response = self.client.get(format!("{}/ws/{}/json/", self.url, digits)).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status_code = %status, "⚠️ Looking up CEP {}... failed", digits);
            return Err(PostalLookupError::Status(status));
        }

        let body = response.json::<Value>().await?;
        if is_not_found(&body) {
            info!("📮 Looking up CEP {}... not found", digits);
            return Err(PostalLookupError::NotFound(digits));
        }

        let address = serde_json::from_value::<PostalAddress>(body)?;
        info!("📮 Looking up CEP {}... OK, {}/{}", digits, address.city, address.state);
        Ok(address)
    }
}

/// Keeps only the digits; a CEP must have exactly eight.
pub fn normalize_cep(cep: &str) -> Result<String, PostalLookupError> {
    let digits = cep.chars().filter(char::is_ascii_digit).collect::<String>();
    if digits.len() != 8 {
        return Err(PostalLookupError::InvalidCep(cep.to_string()));
    }
    Ok(digits)
}

// The service signals unknown CEPs with `"erro": true`, and some deployments send the string "true".
fn is_not_found(body: &Value) -> bool {
    match body.get("erro") {
        Some(Value::Bool(erro)) => *erro,
        Some(Value::String(erro)) => erro == "true",
        _ => false,
    }
}

#[derive(Error, Debug)]
pub enum PostalLookupError {
    #[error("'{0}' is not a valid CEP, expected 8 digits")]
    InvalidCep(String),
    #[error("CEP {0} not found")]
    NotFound(String),
    #[error("postal service answered {0}")]
    Status(StatusCode),
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("unexpected postal service response: {0}")]
    Json(#[from] serde_json::Error),
}

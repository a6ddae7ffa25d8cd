use crate::app_config::AppConfig;
use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode, header};
use thiserror::Error;

const CLIENT_INFO: &str = "aqui-guaira-web";

pub fn new_client(config: &AppConfig) -> Result<Client, BackendError> {
    let anon_key = config.backend().anon_key();

    let mut headers = header::HeaderMap::new();
    let mut api_key_value = HeaderValue::from_str(anon_key)?;
    api_key_value.set_sensitive(true);
    headers.insert("apikey", api_key_value);

    let mut authorization_value = HeaderValue::from_str(&format!("Bearer {}", anon_key))?;
    authorization_value.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, authorization_value);
    headers.insert("x-client-info", HeaderValue::from_static(CLIENT_INFO));

    let client = Client::builder().default_headers(headers).build()?;
    Ok(client)
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("backend client set an invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
    #[error("backend answered {status}: {body}")]
    Status { status: StatusCode, body: String },
}

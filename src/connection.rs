use crate::error::{RadiothermError, Result};
use crate::types::ModelInfo;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Low-level HTTP connection to a single thermostat
///
/// The thermostat exposes a plain HTTP/JSON API on port 80. Reads are GETs
/// against a resource path; writes are POSTs of a JSON body against the same
/// path, acknowledged with `{"success": 0}`. The device reports application
/// errors with HTTP 200 and an `error_msg` body, so every response body is
/// checked before it is handed to the caller.
#[derive(Debug)]
pub(crate) struct Connection {
    http: reqwest::Client,
    base_url: String,
}

impl Connection {
    /// Create a connection for the thermostat at the given host (IP or name)
    pub fn new(host: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: format!("http://{}", host),
        })
    }

    /// GET a resource and return the raw JSON value
    pub async fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?.error_for_status()?;
        let value: Value = response.json().await?;
        check_device_error(&value)?;

        Ok(value)
    }

    /// GET a resource and deserialize it into a typed value
    pub async fn get_typed<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.get(path).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST a JSON body to a resource and verify the device acknowledged it
    pub async fn post(&self, path: &str, body: &Value) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {} {}", url, body);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        let value: Value = response.json().await?;
        check_write_ack(&value)
    }

    /// Query the device's self-reported model identity
    ///
    /// This works on any thermostat regardless of variant and is the probe
    /// used for model detection before a concrete variant is constructed.
    pub async fn model(&self) -> Result<ModelInfo> {
        self.get_typed("/tstat/model").await
    }
}

fn check_device_error(value: &Value) -> Result<()> {
    if let Some(detail) = value.get("error_msg").and_then(|v| v.as_str()) {
        return Err(RadiothermError::Api {
            detail: detail.to_string(),
        });
    }
    Ok(())
}

fn check_write_ack(value: &Value) -> Result<()> {
    check_device_error(value)?;

    match value.get("success").and_then(|v| v.as_i64()) {
        Some(0) => Ok(()),
        Some(code) => Err(RadiothermError::Api {
            detail: format!("write failed with code {}", code),
        }),
        None => Err(RadiothermError::InvalidResponse(format!(
            "missing write acknowledgement: {}",
            value
        ))),
    }
}

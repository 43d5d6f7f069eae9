//! Client Module
//!
//! Issues every catalog operation against a running server over HTTP.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PartError, Result};
use crate::model::{FieldUpdate, RobotPart};
use crate::protocol::{
    DeleteRequest, JsonMessage, ListCompatibleRequest, ReadRequest, UpdateRequest, ENDPOINT_ADD,
    ENDPOINT_DELETE, ENDPOINT_LIST_ALL, ENDPOINT_LIST_COMPATIBLE, ENDPOINT_READ, ENDPOINT_UPDATE,
};

/// HTTP client for a partdb server
#[derive(Debug, Clone)]
pub struct PartsClient {
    http: reqwest::Client,
    base_url: String,
}

impl PartsClient {
    /// Client for the server at `base_url` (e.g. `http://127.0.0.1:8080`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PartError::Config(format!("Could not build HTTP client: {}", e)))?;
        Ok(Self::with_http(http, base_url))
    }

    fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add a new part
    pub async fn add(&self, part: &RobotPart) -> Result<()> {
        self.post(ENDPOINT_ADD, part).await?;
        Ok(())
    }

    /// Read the part with the given serial number
    pub async fn read(&self, serial_number: &str) -> Result<RobotPart> {
        let req = ReadRequest {
            serial_number: serial_number.to_string(),
        };
        let response = self.post(ENDPOINT_READ, &req).await?;
        decode(response).await
    }

    /// Change one field of a part
    pub async fn update(&self, serial_number: &str, update: &FieldUpdate) -> Result<()> {
        let req = UpdateRequest::new(serial_number, update);
        self.post(ENDPOINT_UPDATE, &req).await?;
        Ok(())
    }

    pub async fn update_name(&self, serial_number: &str, name: &str) -> Result<()> {
        self.update(serial_number, &FieldUpdate::Name(name.to_string()))
            .await
    }

    pub async fn update_serial_number(&self, serial_number: &str, new_serial: &str) -> Result<()> {
        self.update(serial_number, &FieldUpdate::SerialNumber(new_serial.to_string()))
            .await
    }

    pub async fn update_manufacturer(&self, serial_number: &str, manufacturer: &str) -> Result<()> {
        self.update(
            serial_number,
            &FieldUpdate::Manufacturer(manufacturer.to_string()),
        )
        .await
    }

    pub async fn update_weight(&self, serial_number: &str, weight: i32) -> Result<()> {
        self.update(serial_number, &FieldUpdate::Weight(weight)).await
    }

    pub async fn update_compatibilities(
        &self,
        serial_number: &str,
        compatibilities: Vec<String>,
    ) -> Result<()> {
        self.update(serial_number, &FieldUpdate::Compatibilities(compatibilities))
            .await
    }

    /// Delete a part; unknown serial numbers succeed
    pub async fn delete(&self, serial_number: &str) -> Result<()> {
        let req = DeleteRequest {
            serial_number: serial_number.to_string(),
        };
        self.post(ENDPOINT_DELETE, &req).await?;
        Ok(())
    }

    /// Every part on the server
    pub async fn list_all(&self) -> Result<Vec<RobotPart>> {
        let response = self.send(self.http.get(self.url(ENDPOINT_LIST_ALL))).await?;
        decode(response).await
    }

    /// Up to `number` parts compatible with the given part
    pub async fn list_compatible(&self, serial_number: &str, number: i64) -> Result<Vec<RobotPart>> {
        let req = ListCompatibleRequest {
            serial_number: serial_number.to_string(),
            number,
        };
        let response = self.post(ENDPOINT_LIST_COMPATIBLE, &req).await?;
        decode(response).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Response> {
        self.send(self.http.post(self.url(endpoint)).json(body)).await
    }

    /// Send a request, turning any non-success status into `Remote`
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<JsonMessage>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unexpected response from server.")
                .to_string(),
        };
        tracing::debug!("Server responded {}: {}", status, message);

        Err(PartError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| PartError::Protocol(format!("Malformed response from server: {}", e)))
}

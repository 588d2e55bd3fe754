use std::time::Duration;

use crate::error::{FetchError, Result};
use crate::models::{ApiResponse, Employee};

pub const DEFAULT_EMPLOYEE_API_URL: &str = "https://dummy.restapiexample.com/api/v1/employees";

pub struct EmployeeClient {
    http: reqwest::Client,
    url: String,
}

impl EmployeeClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("employee-worker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the employee list and unwrap the `{status, data, message}` envelope.
    pub async fn fetch_employees(&self) -> Result<Vec<Employee>> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        tracing::debug!(bytes = body.len(), "employee response received");
        decode_response(&body)
    }
}

/// Decode a raw response body. A non-"success" status in the envelope is an error.
pub fn decode_response(body: &[u8]) -> Result<Vec<Employee>> {
    let response: ApiResponse = serde_json::from_slice(body)?;
    if !response.status.eq_ignore_ascii_case("success") {
        return Err(FetchError::Api {
            status: response.status,
            message: response.message,
        });
    }
    Ok(response.data)
}

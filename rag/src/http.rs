use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::from_str;
use std::time::Duration;

use crate::error::{RagError, Result};

/// Blocking JSON client shared by the model backends. Built once; `Client` is
/// reference counted so clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::Http(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn post_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .map_err(|e| send_error(url, e))?;
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        if !status.is_success() {
            return Err(RagError::Http(format!("POST {} failed: {} {}", url, status, text)));
        }
        from_str::<T>(&text)
            .map_err(|e| RagError::Http(format!("POST {} decode failed: {} | {}", url, e, text)))
    }
}

fn send_error(url: &str, err: reqwest::Error) -> RagError {
    if err.is_timeout() {
        RagError::Timeout(url.to_string())
    } else {
        RagError::Http(format!("POST {} failed: {}", url, err))
    }
}

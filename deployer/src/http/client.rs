//! HTTP client implementation

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::config::target::Target;
use crate::errors::DeployerError;
use crate::filesys::file::File;

/// HTTP client for the appliance API
pub struct HttpClient {
    client: Client,
    target: Target,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(target: Target) -> Result<Self, DeployerError> {
        let client = Client::builder()
            .timeout(target.request_timeout)
            .danger_accept_invalid_certs(target.insecure_skip_tls_verify)
            .build()?;

        Ok(Self { client, target })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.target.base(), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(
            &self.target.username,
            Some(self.target.password.expose_secret()),
        )
    }

    /// Send a request, classifying transport failures and error statuses
    async fn send(&self, method: &str, url: &str, request: RequestBuilder) -> Result<Response, DeployerError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                DeployerError::Transient(format!("{} {}: {}", method, url, e))
            } else {
                DeployerError::HttpError(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("HTTP {} failed: {} - {}", method, status, body);
        if status.is_server_error() {
            return Err(DeployerError::Transient(format!("{} {}: {} - {}", method, url, status, body)));
        }
        Err(DeployerError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Make a GET request and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeployerError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.send("GET", &url, self.client.get(&url)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Make a GET request and return the raw body
    pub async fn get_text(&self, path: &str) -> Result<String, DeployerError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.send("GET", &url, self.client.get(&url)).await?;
        let body = response.text().await?;
        Ok(body)
    }

    /// Make a POST request without a body and decode the JSON response
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeployerError> {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self.send("POST", &url, self.client.post(&url)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Make a PUT request with a form-encoded body
    pub async fn put_form<B: Serialize>(&self, path: &str, body: &B) -> Result<(), DeployerError> {
        let url = self.url(path);
        debug!("PUT {}", url);

        self.send("PUT", &url, self.client.put(&url).form(body)).await?;
        Ok(())
    }

    /// Upload a file as a single multipart field, streamed from disk
    pub async fn post_file(&self, path: &str, field: &str, file: &File) -> Result<(), DeployerError> {
        let handle = tokio::fs::File::open(file.path()).await?;
        let length = handle.metadata().await?.len();
        let part = Part::stream_with_length(Body::from(handle), length).file_name(file.file_name());
        self.post_part(path, field, length, part).await
    }

    /// Upload in-memory contents as a single multipart field
    pub async fn post_bytes(
        &self,
        path: &str,
        field: &str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<(), DeployerError> {
        let length = bytes.len() as u64;
        self.post_part(path, field, length, Part::bytes(bytes).file_name(file_name))
            .await
    }

    async fn post_part(&self, path: &str, field: &str, length: u64, part: Part) -> Result<(), DeployerError> {
        let url = self.url(path);
        debug!("POST {} ({} bytes as {})", url, length, field);

        let form = Form::new().part(field.to_string(), part);
        self.send("POST", &url, self.client.post(&url).multipart(form)).await?;
        Ok(())
    }
}

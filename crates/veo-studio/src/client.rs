//! The three remote calls a generation needs, and their HTTP implementation.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use crate::config::Config;
use crate::error::BackendError;
use crate::request::{GenerationRequest, Operation};

/// Remote side of a generation: submit, check status, fetch the result.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Starts a generation and returns its operation handle.
    async fn submit(&self, request: &GenerationRequest) -> Result<Operation, BackendError>;

    /// Re-fetches the status of a previously submitted operation.
    async fn poll(&self, operation: &Operation) -> Result<Operation, BackendError>;

    /// Downloads the bytes at a result URI.
    async fn download(&self, uri: &str) -> Result<Vec<u8>, BackendError>;
}

/// [`VideoBackend`] talking to the Gemini API over HTTPS.
#[derive(Clone, Debug)]
pub struct VeoClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    person_generation: Option<String>,
}

impl VeoClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            person_generation: config.person_generation.clone(),
        }
    }

    fn submit_url(&self) -> Result<Url, BackendError> {
        let url = format!("{}/models/{}:predictLongRunning", self.base_url, self.model);
        self.with_key(&url)
    }

    fn status_url(&self, operation: &Operation) -> Result<Url, BackendError> {
        let url = format!("{}/{}", self.base_url, operation.name.trim_start_matches('/'));
        self.with_key(&url)
    }

    /// Appends the access key as a query parameter, keeping any existing query.
    fn with_key(&self, url: &str) -> Result<Url, BackendError> {
        let mut url = Url::parse(url).map_err(|e| BackendError::Other(format!("invalid URL {url:?}: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(BackendError::status(status))
    }
}

#[async_trait]
impl VideoBackend for VeoClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<Operation, BackendError> {
        let body = request.to_wire(self.person_generation.as_deref());
        let response = self.client.post(self.submit_url()?).json(&body).send().await?;
        let operation: Operation = ensure_success(response)?.json().await?;
        log::info!("Job submitted. Operation name: {}", operation.name);
        Ok(operation)
    }

    async fn poll(&self, operation: &Operation) -> Result<Operation, BackendError> {
        let response = self.client.get(self.status_url(operation)?).send().await?;
        Ok(ensure_success(response)?.json().await?)
    }

    async fn download(&self, uri: &str) -> Result<Vec<u8>, BackendError> {
        let response = self.client.get(self.with_key(uri)?).send().await?;
        let bytes = ensure_success(response)?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> VeoClient {
        VeoClient::new(&Config::new("secret"))
    }

    #[test]
    fn submit_url_targets_model() {
        let url = client().submit_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/veo-2.0-generate-001:predictLongRunning?key=secret"
        );
    }

    #[test]
    fn status_url_uses_operation_name() {
        let operation = Operation {
            name: "models/veo-2.0-generate-001/operations/abc".into(),
            ..Default::default()
        };
        let url = client().status_url(&operation).unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/veo-2.0-generate-001/operations/abc?key=secret"
        );
    }

    #[test]
    fn key_is_appended_to_existing_query() {
        let url = client()
            .with_key("https://generativelanguage.googleapis.com/v1beta/files/x:download?alt=media")
            .unwrap();
        assert_eq!(url.query(), Some("alt=media&key=secret"));

        assert!(client().with_key("not a url").is_err());
    }
}

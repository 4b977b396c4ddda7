use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{AdvisoryModel, AiAdvisoryRequest, AiAdvisoryResponse, AiServiceError};
use crate::config::AiServiceConfig;

/// Hosted text-generation service speaking the advisory JSON contract.
#[derive(Debug, Clone)]
pub struct RemoteAdvisoryModel {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl RemoteAdvisoryModel {
    pub fn from_config(config: &AiServiceConfig) -> Result<Self, AiServiceError> {
        let (Some(endpoint), Some(api_key)) = (config.endpoint.clone(), config.api_key.clone())
        else {
            return Err(AiServiceError::MissingCredential);
        };

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("krishi-advisory/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AiServiceError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl AdvisoryModel for RemoteAdvisoryModel {
    async fn generate(
        &self,
        request: &AiAdvisoryRequest,
    ) -> Result<AiAdvisoryResponse, AiServiceError> {
        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => res
                .json::<AiAdvisoryResponse>()
                .await
                .map_err(|e| AiServiceError::MalformedResponse(e.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AiServiceError::Unauthorized),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(AiServiceError::Http { status, body })
            }
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

fn map_reqwest_error(e: reqwest::Error) -> AiServiceError {
    if e.is_timeout() {
        AiServiceError::Timeout
    } else {
        AiServiceError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn requires_endpoint_and_key() {
        let config = AiServiceConfig {
            endpoint: Some("https://ai.example.test/advisory".to_string()),
            api_key: None,
            timeout: Duration::from_secs(5),
        };
        let err = RemoteAdvisoryModel::from_config(&config).expect_err("missing key rejected");
        assert!(matches!(err, AiServiceError::MissingCredential));
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_transport_error() {
        let config = AiServiceConfig {
            endpoint: Some("http://127.0.0.1:9/advisory".to_string()),
            api_key: Some("test-key".to_string()),
            timeout: Duration::from_secs(2),
        };
        let model = RemoteAdvisoryModel::from_config(&config).expect("client builds");
        let request = AiAdvisoryRequest {
            district: "Sitapur".to_string(),
            crop: "Wheat".to_string(),
            traditional_practices: Vec::new(),
            soil_data: None,
            user_query: None,
        };

        let err = model.generate(&request).await.expect_err("no listener on port 9");
        assert!(matches!(
            err,
            AiServiceError::Transport(_) | AiServiceError::Timeout
        ));
    }
}

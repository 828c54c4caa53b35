//! reqwest-based client for the consultation backend
//!
//! Implements both the [`StepClient`] and [`ConsultationGateway`] ports.

use super::error::{HttpError, Result};
use super::wire::{ConsultationDto, StepResponse, TriageRequest, error_detail};
use async_trait::async_trait;
use consult_application::{ConsultationGateway, GatewayError, StepClient};
use consult_domain::core::text::preview;
use consult_domain::{
    Consultation, ConsultationId, ConsultationRecord, EmergencyGuide, NewConsultation, StepResult,
    TriageAssessment,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Route prefix below the API base URL
const CONSULTATIONS_PATH: &str = "consultation/consultations";

/// Maximum characters of a raw body kept in parse errors
const RAW_BODY_PREVIEW: usize = 500;

/// Connection settings for [`HttpConsultationClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// API root, e.g. `http://localhost:8000/api`
    pub base_url: String,
    /// Per-request timeout; surfaces as a step failure when exceeded
    pub timeout: Duration,
    /// Static bearer token, if the backend requires one
    pub access_token: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout: Duration::from_secs(30),
            access_token: None,
        }
    }
}

/// HTTP adapter for the consultation API
pub struct HttpConsultationClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpConsultationClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HttpError::InvalidBaseUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("panel-consult/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/{}/", self.base_url, CONSULTATIONS_PATH)
        } else {
            format!("{}/{}/{}", self.base_url, CONSULTATIONS_PATH, path)
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a 2xx JSON body.
    ///
    /// Non-2xx responses become [`HttpError::Status`], using the body's
    /// `detail` field when there is one.
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = error_detail(&body).unwrap_or_else(|| {
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });
            return Err(HttpError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|e| HttpError::ParseError {
            error: e.to_string(),
            raw: preview(&body, RAW_BODY_PREVIEW),
        })
    }
}

#[async_trait]
impl StepClient for HttpConsultationClient {
    async fn advance_step(&self, consultation_id: &ConsultationId) -> StepResult {
        let url = self.url(&format!("{}/step", consultation_id));
        debug!(consultation_id = %consultation_id, "POST {}", url);

        match self
            .send_json::<StepResponse>(self.request(Method::POST, &url))
            .await
        {
            Ok(response) => response.into_step_result(),
            Err(e) => {
                warn!(consultation_id = %consultation_id, "Advance step failed: {}", e);
                StepResult::failure(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ConsultationGateway for HttpConsultationClient {
    async fn create_consultation(
        &self,
        request: &NewConsultation,
    ) -> std::result::Result<Consultation, GatewayError> {
        let url = self.url("");
        debug!("POST {}", url);
        let dto: ConsultationDto = self
            .send_json(self.request(Method::POST, &url).json(request))
            .await?;
        Ok(dto.into_consultation()?)
    }

    async fn load_consultation(
        &self,
        consultation_id: &ConsultationId,
    ) -> std::result::Result<ConsultationRecord, GatewayError> {
        let url = self.url(consultation_id.as_str());
        debug!(consultation_id = %consultation_id, "GET {}", url);
        let dto: ConsultationDto = self.send_json(self.request(Method::GET, &url)).await?;
        Ok(dto.into_record()?)
    }

    async fn list_consultations(&self) -> std::result::Result<Vec<Consultation>, GatewayError> {
        let url = self.url("my/all");
        debug!("GET {}", url);
        let dtos: Vec<ConsultationDto> = self.send_json(self.request(Method::GET, &url)).await?;
        dtos.into_iter()
            .map(|dto| dto.into_consultation().map_err(GatewayError::from))
            .collect()
    }

    async fn triage(
        &self,
        initial_problem: &str,
    ) -> std::result::Result<TriageAssessment, GatewayError> {
        let url = self.url("triage");
        debug!("POST {}", url);
        let body = TriageRequest { initial_problem };
        Ok(self
            .send_json(self.request(Method::POST, &url).json(&body))
            .await?)
    }

    async fn emergency_guide(
        &self,
        consultation_id: &ConsultationId,
    ) -> std::result::Result<EmergencyGuide, GatewayError> {
        let url = self.url(&format!("{}/emergency-guide", consultation_id));
        debug!(consultation_id = %consultation_id, "GET {}", url);
        Ok(self.send_json(self.request(Method::GET, &url)).await?)
    }
}

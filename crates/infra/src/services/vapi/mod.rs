mod call_api;

use super::{CallRequest, DispatchError, INotificationDispatcher};
use crate::config::VapiConfig;
use call_api::{CreatePhoneCallRequest, CreatePhoneCallResponse};
use reqwest::{Client, StatusCode};
use tracing::{error, info};

const PROVIDER: &str = "Vapi";

/// Places reminder calls through the Vapi outbound phone call API.
/// https://docs.vapi.ai/api-reference/calls/create
pub struct VapiDispatcher {
    client: Client,
    config: VapiConfig,
}

impl VapiDispatcher {
    pub fn new(config: VapiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn classify_error(e: reqwest::Error) -> DispatchError {
        if e.is_timeout() {
            DispatchError::Timeout(PROVIDER)
        } else {
            DispatchError::Transport {
                provider: PROVIDER,
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait::async_trait]
impl INotificationDispatcher for VapiDispatcher {
    async fn place_call(&self, request: &CallRequest) -> Result<String, DispatchError> {
        if !self.config.is_configured() {
            error!("Vapi API key or phone number ID not configured");
            return Err(DispatchError::NotConfigured(PROVIDER));
        }

        let body = CreatePhoneCallRequest::new(
            &self.config.phone_number_id,
            &request.phone_number,
            &request.title,
            &request.message,
        );

        let res = self
            .client
            .post(&format!("{}/call/phone", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = Self::classify_error(e);
                error!("[Network Error] {}", e);
                e
            })?;

        let status = res.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = res.text().await.unwrap_or_default();
            let e = DispatchError::Rejected {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            };
            error!("{}", e);
            return Err(e);
        }

        let call = res
            .json::<CreatePhoneCallResponse>()
            .await
            .map_err(|e| {
                let e = Self::classify_error(e);
                error!("[Unexpected Response] {}", e);
                e
            })?;
        info!("Call initiated successfully. Call ID: {}", call.id);
        Ok(call.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn config(base_url: String) -> VapiConfig {
        VapiConfig {
            api_key: "secret".into(),
            phone_number_id: "phone-id".into(),
            base_url,
            timeout: Duration::from_millis(500),
        }
    }

    fn call_request() -> CallRequest {
        CallRequest {
            phone_number: "+14155552671".into(),
            message: "Take your medicine".into(),
            title: "Medicine".into(),
        }
    }

    #[tokio::test]
    async fn returns_call_id_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call/phone"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(serde_json::json!({
                "phoneNumberId": "phone-id",
                "customer": { "number": "+14155552671" },
                "assistant": {
                    "firstMessage": "Hello! This is CallMe Reminder. Your reminder: Medicine. Take your medicine. Goodbye!",
                    "maxDurationSeconds": 30
                }
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": "call_123" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = VapiDispatcher::new(config(server.uri()));
        let res = dispatcher.place_call(&call_request()).await;
        assert_eq!(res.unwrap(), "call_123");
    }

    #[tokio::test]
    async fn fails_without_calling_when_not_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config(server.uri());
        config.api_key = String::new();
        let dispatcher = VapiDispatcher::new(config);
        let err = dispatcher.place_call(&call_request()).await.unwrap_err();
        assert!(matches!(err, DispatchError::NotConfigured(_)));
        assert_eq!(err.to_string(), "Vapi not configured");
    }

    #[tokio::test]
    async fn reports_rejected_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call/phone"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid number"))
            .mount(&server)
            .await;

        let dispatcher = VapiDispatcher::new(config(server.uri()));
        let err = dispatcher.place_call(&call_request()).await.unwrap_err();
        assert!(matches!(err, DispatchError::Rejected { status: 400, .. }));
        assert_eq!(err.to_string(), "Vapi API error: 400 - invalid number");
    }

    #[tokio::test]
    async fn reports_timeouts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call/phone"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "id": "call_123" }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let dispatcher = VapiDispatcher::new(config(server.uri()));
        let err = dispatcher.place_call(&call_request()).await.unwrap_err();
        assert!(matches!(err, DispatchError::Timeout(_)));
        assert!(err.to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn reports_transport_errors() {
        // Nothing is listening on this port
        let dispatcher = VapiDispatcher::new(config("http://127.0.0.1:1".into()));
        let err = dispatcher.place_call(&call_request()).await.unwrap_err();
        assert!(matches!(err, DispatchError::Transport { .. }));
        assert!(err.to_string().starts_with("Vapi API exception: "));
    }

    #[tokio::test]
    async fn reports_malformed_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call/phone"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let dispatcher = VapiDispatcher::new(config(server.uri()));
        let err = dispatcher.place_call(&call_request()).await.unwrap_err();
        assert!(matches!(err, DispatchError::Transport { .. }));
    }
}

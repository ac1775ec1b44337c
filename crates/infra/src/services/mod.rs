mod vapi;

use thiserror::Error;
pub use vapi::VapiDispatcher;

/// What the voice provider needs to deliver a `Reminder`
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub phone_number: String,
    pub message: String,
    pub title: String,
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{0} not configured")]
    NotConfigured(&'static str),
    #[error("{provider} API error: {status} - {body}")]
    Rejected {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{0} API timeout")]
    Timeout(&'static str),
    #[error("{provider} API exception: {reason}")]
    Transport {
        provider: &'static str,
        reason: String,
    },
}

/// Places the outbound call for a due `Reminder`.
///
/// A single call to `place_call` is a single delivery attempt. On success the
/// identifier of the call at the provider is returned.
#[async_trait::async_trait]
pub trait INotificationDispatcher: Send + Sync {
    async fn place_call(&self, request: &CallRequest) -> Result<String, DispatchError>;
}

//! HTTP implementation of the chat API
//!
//! Talks to the coaching backend over JSON/HTTP with reqwest. The access
//! token comes from the injected [`ApiConfig`]; this type never reads
//! process-wide state.

use crate::api::{ChatApi, ChatRequest, ChatResponse, ConversationHistory};
use crate::config::ApiConfig;
use crate::error::{FitcoachError, Result};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use url::Url;

const MESSAGE_PATH: &str = "api/chat/message";
const CONVERSATION_PATH: &str = "api/chat/conversation/";

/// Chat API client for the coaching backend
///
/// # Examples
///
/// ```
/// use fitcoach::api::HttpChatApi;
/// use fitcoach::config::ApiConfig;
///
/// let api = HttpChatApi::new(&ApiConfig::default()).unwrap();
/// assert_eq!(api.base_url().as_str(), "http://localhost:8000/");
/// ```
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpChatApi {
    /// Create a client from connection settings
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("fitcoach/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    /// Base URL every endpoint is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn conversation_url(&self, conversation_id: &str) -> Result<Url> {
        let mut url = self.base_url.join(CONVERSATION_PATH)?;
        url.path_segments_mut()
            .map_err(|_| FitcoachError::Api("Base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .push(conversation_id);
        Ok(url)
    }
}

/// Map a non-success status to a typed error, logging the body
async fn status_error(response: reqwest::Response, what: &str) -> FitcoachError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!("{} returned error {}: {}", what, status, body);
    if status == StatusCode::UNAUTHORIZED {
        FitcoachError::Authentication(format!("{} rejected the access token", what))
    } else {
        FitcoachError::Api(format!("{} returned error {}: {}", what, status, body))
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.base_url.join(MESSAGE_PATH)?;

        tracing::debug!(
            "Sending chat turn: {} chars, conversation={:?}, include_history={}",
            request.message.chars().count(),
            request.conversation_id,
            request.include_history
        );

        let response = self
            .authorize(self.client.post(url).json(request))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Chat request failed: {}", e);
                FitcoachError::Api(format!("Chat request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(status_error(response, "Chat endpoint").await.into());
        }

        let reply: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse chat response: {}", e);
            FitcoachError::Api(format!("Failed to parse chat response: {}", e))
        })?;

        tracing::debug!(
            "Chat reply: conversation={}, intent={:?}",
            reply.conversation_id,
            reply.intent
        );

        Ok(reply)
    }

    async fn conversation_history(&self, conversation_id: &str) -> Result<ConversationHistory> {
        let url = self.conversation_url(conversation_id)?;

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("History request failed: {}", e);
                FitcoachError::Api(format!("History request failed: {}", e))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FitcoachError::ConversationNotFound(conversation_id.to_string()).into());
        }
        if !response.status().is_success() {
            return Err(status_error(response, "History endpoint").await.into());
        }

        let history: ConversationHistory = response.json().await.map_err(|e| {
            FitcoachError::Api(format!("Failed to parse conversation history: {}", e))
        })?;

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_with_base(base_url: &str) -> HttpChatApi {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        };
        HttpChatApi::new(&config).unwrap()
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let api = api_with_base("http://localhost:8000/coach");
        assert_eq!(api.base_url().as_str(), "http://localhost:8000/coach/");
    }

    #[test]
    fn test_message_url_respects_base_path() {
        let api = api_with_base("http://localhost:8000/coach");
        let url = api.base_url().join(MESSAGE_PATH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/coach/api/chat/message");
    }

    #[test]
    fn test_conversation_url_escapes_identifier() {
        let api = api_with_base("http://localhost:8000");
        let url = api.conversation_url("a b/c").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/chat/conversation/a%20b%2Fc"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = ApiConfig {
            base_url: "::not a url::".to_string(),
            ..ApiConfig::default()
        };
        assert!(HttpChatApi::new(&config).is_err());
    }
}

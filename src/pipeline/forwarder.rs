//! Result forwarder: posts decisions to the recipient service.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use super::types::DecisionRecord;
use crate::error::ForwardError;

/// Response from the recipient, kept for logging.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub status: reqwest::StatusCode,
    pub body: String,
}

/// HTTP client bound to one approval endpoint.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    url: String,
}

impl Forwarder {
    /// Build a forwarder posting to `url`. `timeout` of `None` never times out.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ForwardError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ForwardError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post one decision and read the whole response body.
    ///
    /// The body is only read once the request went through; a failed send
    /// returns `ForwardError::Send` and nothing else is attempted.
    pub async fn forward(&self, decision: &DecisionRecord) -> Result<Delivery, ForwardError> {
        let body = serde_json::to_vec(decision)?;

        let request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
            .map_err(|source| ForwardError::BuildRequest {
                url: self.url.clone(),
                source,
            })?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| ForwardError::Send {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ForwardError::ReadBody {
            url: self.url.clone(),
            source,
        })?;

        Ok(Delivery { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::Verdict;

    #[tokio::test]
    async fn unreachable_recipient_is_a_send_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let forwarder = Forwarder::new(
            format!("http://127.0.0.1:{port}/approval/"),
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let err = forwarder
            .forward(&DecisionRecord { id: 1, approve: Verdict::Approve })
            .await
            .unwrap_err();

        assert!(matches!(err, ForwardError::Send { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn malformed_url_is_a_build_error() {
        let forwarder = Forwarder::new("http://exa mple/approval/", None).unwrap();
        let err = forwarder
            .forward(&DecisionRecord { id: 1, approve: Verdict::Reject })
            .await
            .unwrap_err();

        assert!(matches!(err, ForwardError::BuildRequest { .. }), "got {err:?}");
    }
}

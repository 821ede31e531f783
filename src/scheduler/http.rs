use crate::domain::Interest;
use crate::scheduler::{ExecutorError, TaskExecutor};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Request timeout applied when the configured one is zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ROUTING_POLICY_PATH: &str = "/policy/routing/def";
const SOURCE_HEADER: &str = "X-Source";
const SOURCE_NAME: &str = "routing-manager";

/// Body POSTed to the monitoring manager on every tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub app_name: String,
    pub service_ip: String,
    pub timestamp: DateTime<Utc>,
    pub request_type: &'static str,
}

impl TaskPayload {
    pub fn health_check(interest: &Interest) -> Self {
        Self {
            app_name: interest.app_name.clone(),
            service_ip: interest.service_ip.clone(),
            timestamp: Utc::now(),
            request_type: "health_check",
        }
    }
}

/// Sends a routing health-check request for the interest to an external service.
pub struct HttpTaskExecutor {
    client: Client,
    service_url: String,
}

impl HttpTaskExecutor {
    /// Creates an executor targeting `service_url` (e.g. `http://monitoring:10999`).
    ///
    /// A zero `timeout` falls back to [`DEFAULT_TIMEOUT`].
    pub fn new(service_url: impl Into<String>, timeout: Duration) -> Result<Self, ExecutorError> {
        let timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ExecutorError::Client)?;

        Ok(Self {
            client,
            service_url: service_url.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.service_url.trim_end_matches('/'),
            ROUTING_POLICY_PATH
        )
    }
}

#[async_trait]
impl TaskExecutor for HttpTaskExecutor {
    #[instrument(skip(self, interest), fields(app_name = %interest.app_name))]
    async fn execute_task(&self, interest: &Interest) -> Result<(), ExecutorError> {
        let payload = TaskPayload::health_check(interest);
        let body = serde_json::to_vec(&payload)?;
        debug!(?payload, "Sending task request");

        let response = self
            .client
            .post(self.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .header(SOURCE_HEADER, SOURCE_NAME)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ExecutorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            service_ip = %interest.service_ip,
            status_code = status.as_u16(),
            %body,
            "Task executed successfully"
        );
        Ok(())
    }
}

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Bound on each outbound call, so one slow collaborator cannot stall
    /// the run indefinitely.
    pub request_timeout: Duration,
    /// Fixed backoff before the transport-level retry.
    pub network_retry_backoff: Duration,
    /// Retries after a transport-level failure. HTTP-status failures are
    /// never retried.
    pub max_network_retries: usize,
    pub max_response_bytes: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            network_retry_backoff: Duration::from_millis(500),
            max_network_retries: 1,
            max_response_bytes: 4 * 1024 * 1024,
        }
    }
}

//! Client for the external app-blocker service.
//!
//! The service is a local HTTP peer that blocks distracting applications for
//! the length of a focus session. It is optional: when it cannot be reached
//! the session carries on unprotected and the user is warned once.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::effects::Notice;
use crate::error::BlockerError;
use crate::storage::BlockerConfig;

/// `GET /status` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerStatus {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub blocked_count: u64,
    #[serde(default)]
    pub remaining_seconds: u64,
}

/// `POST /start` and `POST /stop` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerReply {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[async_trait]
pub trait AppBlocker: Send + Sync {
    async fn health(&self) -> Result<(), BlockerError>;

    async fn start(&self, minutes: u32) -> Result<BlockerReply, BlockerError>;

    async fn stop(&self) -> Result<BlockerReply, BlockerError>;

    async fn status(&self) -> Result<BlockerStatus, BlockerError>;
}

pub struct HttpAppBlocker {
    base_url: Url,
    http_client: Client,
}

impl HttpAppBlocker {
    pub fn new(config: &BlockerConfig) -> Result<Self, BlockerError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BlockerError::Unavailable(format!("invalid base url: {e}")))?;
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BlockerError> {
        self.base_url
            .join(path)
            .map_err(|e| BlockerError::Unavailable(format!("invalid endpoint {path}: {e}")))
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, BlockerError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(BlockerError::Http {
                status: status.as_u16(),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| BlockerError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AppBlocker for HttpAppBlocker {
    async fn health(&self) -> Result<(), BlockerError> {
        let resp = self.http_client.get(self.endpoint("health")?).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(BlockerError::Http {
                status: resp.status().as_u16(),
            })
        }
    }

    async fn start(&self, minutes: u32) -> Result<BlockerReply, BlockerError> {
        let resp = self
            .http_client
            .post(self.endpoint("start")?)
            .json(&serde_json::json!({ "duration": minutes }))
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn stop(&self) -> Result<BlockerReply, BlockerError> {
        let resp = self.http_client.post(self.endpoint("stop")?).send().await?;
        Self::read_json(resp).await
    }

    async fn status(&self) -> Result<BlockerStatus, BlockerError> {
        let resp = self.http_client.get(self.endpoint("status")?).send().await?;
        Self::read_json(resp).await
    }
}

/// Work for the blocker, produced by state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockerCommand {
    Start { minutes: u32 },
    Stop,
}

/// How a command went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOutcome {
    pub command: BlockerCommand,
    /// The service acknowledged the command.
    pub applied: bool,
    pub notice: Option<Notice>,
}

/// Applies blocker commands, degrading quietly when the service is absent.
pub struct BlockerBridge<B: AppBlocker> {
    blocker: B,
    engaged: bool,
}

impl<B: AppBlocker> BlockerBridge<B> {
    pub fn new(blocker: B) -> Self {
        Self {
            blocker,
            engaged: false,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn blocker(&self) -> &B {
        &self.blocker
    }

    pub async fn apply(&mut self, command: BlockerCommand) -> BridgeOutcome {
        match command {
            BlockerCommand::Start { minutes } => {
                let result = match self.blocker.health().await {
                    Ok(()) => self.blocker.start(minutes).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(reply) if reply.success => {
                        tracing::info!(minutes, "app blocking engaged");
                        self.engaged = true;
                        BridgeOutcome {
                            command,
                            applied: true,
                            notice: Some(Notice::success("Distracting apps are blocked")),
                        }
                    }
                    Ok(reply) => {
                        tracing::warn!(message = %reply.message, "app blocker refused to start");
                        self.degraded(command, &reply.message)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "app blocker unavailable");
                        self.degraded(command, &e.to_string())
                    }
                }
            }
            BlockerCommand::Stop => {
                if !self.engaged {
                    return BridgeOutcome {
                        command,
                        applied: false,
                        notice: None,
                    };
                }
                self.engaged = false;
                match self.blocker.stop().await {
                    Ok(reply) if reply.success => {
                        tracing::info!("app blocking released");
                        BridgeOutcome {
                            command,
                            applied: true,
                            notice: None,
                        }
                    }
                    Ok(reply) => {
                        tracing::warn!(message = %reply.message, "app blocker refused to stop");
                        BridgeOutcome {
                            command,
                            applied: false,
                            notice: None,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "app blocker unavailable on stop");
                        BridgeOutcome {
                            command,
                            applied: false,
                            notice: None,
                        }
                    }
                }
            }
        }
    }

    fn degraded(&mut self, command: BlockerCommand, reason: &str) -> BridgeOutcome {
        self.engaged = false;
        BridgeOutcome {
            command,
            applied: false,
            notice: Some(Notice::warning(format!(
                "App blocker unavailable ({reason}). Focusing without app blocking."
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Offline;

    #[async_trait]
    impl AppBlocker for Offline {
        async fn health(&self) -> Result<(), BlockerError> {
            Err(BlockerError::Unavailable("connection refused".into()))
        }
        async fn start(&self, _minutes: u32) -> Result<BlockerReply, BlockerError> {
            Err(BlockerError::Unavailable("connection refused".into()))
        }
        async fn stop(&self) -> Result<BlockerReply, BlockerError> {
            Err(BlockerError::Unavailable("connection refused".into()))
        }
        async fn status(&self) -> Result<BlockerStatus, BlockerError> {
            Err(BlockerError::Unavailable("connection refused".into()))
        }
    }

    #[derive(Default)]
    struct Counting {
        starts: AtomicUsize,
        stops: AtomicUsize,
    }

    #[async_trait]
    impl AppBlocker for Counting {
        async fn health(&self) -> Result<(), BlockerError> {
            Ok(())
        }
        async fn start(&self, _minutes: u32) -> Result<BlockerReply, BlockerError> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(BlockerReply {
                success: true,
                message: String::new(),
            })
        }
        async fn stop(&self) -> Result<BlockerReply, BlockerError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(BlockerReply {
                success: true,
                message: String::new(),
            })
        }
        async fn status(&self) -> Result<BlockerStatus, BlockerError> {
            Ok(BlockerStatus::default())
        }
    }

    #[tokio::test]
    async fn offline_blocker_warns_once_and_stop_is_silent() {
        let mut bridge = BlockerBridge::new(Offline);
        let started = bridge.apply(BlockerCommand::Start { minutes: 25 }).await;
        assert!(!started.applied);
        assert!(started.notice.is_some());

        let stopped = bridge.apply(BlockerCommand::Stop).await;
        assert!(!stopped.applied);
        assert!(stopped.notice.is_none());
    }

    #[tokio::test]
    async fn stop_is_only_sent_after_a_successful_start() {
        let mut bridge = BlockerBridge::new(Counting::default());
        bridge.apply(BlockerCommand::Stop).await;
        assert_eq!(bridge.blocker().stops.load(Ordering::SeqCst), 0);

        assert!(bridge.apply(BlockerCommand::Start { minutes: 5 }).await.applied);
        assert!(bridge.is_engaged());
        assert!(bridge.apply(BlockerCommand::Stop).await.applied);
        assert_eq!(bridge.blocker().starts.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.blocker().stops.load(Ordering::SeqCst), 1);
        assert!(!bridge.is_engaged());
    }
}

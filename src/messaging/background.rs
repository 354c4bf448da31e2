//! Background worker that owns the configuration and the model client.
//!
//! Requests arrive on an mpsc channel; each one is handled on its own task
//! and answered through the oneshot sender it carries.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::protocol::{Envelope, Request, Response};
use crate::ai::AccessibilityAi;
use crate::contrast::{audit_elements, parse_color, ContrastCheck, ElementSample};
use crate::storage::ExtensionConfig;

/// Pending requests the channel buffers before senders wait.
const CHANNEL_CAPACITY: usize = 32;

/// Messaging errors.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("Background worker is not running")]
    ChannelClosed,

    #[error("Background worker dropped the request without replying")]
    NoReply,
}

/// Sending side of the background channel.
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: mpsc::Sender<Envelope>,
}

impl MessageBus {
    /// Send a request and wait for its reply.
    pub async fn send(&self, request: Request) -> Result<Response, MessagingError> {
        let (reply, rx) = oneshot::channel();
        let id = Uuid::new_v4();

        tracing::debug!("Sending {} ({})", request.kind(), id);

        self.tx
            .send(Envelope { id, request, reply })
            .await
            .map_err(|_| MessagingError::ChannelClosed)?;

        rx.await.map_err(|_| MessagingError::NoReply)
    }
}

/// Handles requests against the configuration and an optional model client.
pub struct Background<A> {
    config: ExtensionConfig,
    settings_path: PathBuf,
    ai: Option<A>,
}

impl<A: AccessibilityAi + 'static> Background<A> {
    /// Create a worker. `ai` is `None` when no API key is configured.
    pub fn new(config: ExtensionConfig, settings_path: PathBuf, ai: Option<A>) -> Self {
        Self {
            config,
            settings_path,
            ai,
        }
    }

    /// Start the dispatch loop and return the bus that feeds it.
    ///
    /// The loop ends when every [`MessageBus`] clone has been dropped.
    pub fn spawn(self) -> MessageBus {
        let (tx, mut rx) = mpsc::channel::<Envelope>(CHANNEL_CAPACITY);
        let worker = Arc::new(self);

        tokio::spawn(async move {
            while let Some(envelope) = rx.recv().await {
                let worker = worker.clone();
                tokio::spawn(async move {
                    let Envelope { id, request, reply } = envelope;
                    let kind = request.kind();
                    let response = worker.handle(request).await;
                    if reply.send(response).is_err() {
                        tracing::debug!("Requester for {} ({}) went away", kind, id);
                    }
                });
            }
            tracing::debug!("Background channel closed");
        });

        MessageBus { tx }
    }

    /// Handle a single request.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::CheckContrast {
                foreground,
                background,
            } => self.check_contrast(&foreground, &background),
            Request::AuditPage {
                elements,
                min_ratio,
            } => {
                let min = min_ratio.unwrap_or(self.config.contrast.min_contrast);
                Response::Audit {
                    report: audit_elements(&elements, min),
                }
            }
            Request::AnalyzeContrast {
                elements,
                min_contrast,
            } => self.analyze_contrast(elements, min_contrast).await,
            Request::SimplifyContent { content, level } => {
                let Some(ai) = &self.ai else {
                    return not_configured();
                };
                let level = level.unwrap_or(self.config.simplify.level);
                match ai.simplify_content(&content, level).await {
                    Ok(text) => Response::Simplified { text },
                    Err(e) => {
                        tracing::error!("Content simplification failed: {}", e);
                        Response::Error {
                            message: e.to_string(),
                        }
                    }
                }
            }
            Request::AnalyzeReadability { content } => {
                let Some(ai) = &self.ai else {
                    return not_configured();
                };
                match ai.analyze_readability(&content).await {
                    Ok(feedback) => Response::Readability { feedback },
                    Err(e) => {
                        tracing::error!("Readability analysis failed: {}", e);
                        Response::Error {
                            message: e.to_string(),
                        }
                    }
                }
            }
            Request::GenerateAltText { images } => {
                let missing: Vec<_> = images.into_iter().filter(|i| i.missing_alt()).collect();
                if missing.is_empty() {
                    return Response::AltText {
                        suggestions: Vec::new(),
                    };
                }
                let Some(ai) = &self.ai else {
                    return not_configured();
                };
                match ai.generate_alt_text(&missing).await {
                    Ok(suggestions) => Response::AltText { suggestions },
                    Err(e) => {
                        tracing::error!("Alt text generation failed: {}", e);
                        Response::Error {
                            message: e.to_string(),
                        }
                    }
                }
            }
            Request::ActivateFeature { feature } => {
                if feature.requires_ai() && !self.config.has_api_key() {
                    tracing::info!("{} needs an API key", feature);
                    Response::ShowApiKeyPrompt { feature }
                } else {
                    Response::FeatureActivated { feature }
                }
            }
            Request::OpenSettings => Response::Settings {
                path: self.settings_path.display().to_string(),
            },
        }
    }

    fn check_contrast(&self, foreground: &str, background: &str) -> Response {
        match (parse_color(foreground), parse_color(background)) {
            (Ok(fg), Ok(bg)) => Response::Contrast {
                check: ContrastCheck::new(fg, bg),
            },
            (Err(e), _) | (_, Err(e)) => Response::Error {
                message: e.to_string(),
            },
        }
    }

    async fn analyze_contrast(
        &self,
        elements: Vec<ElementSample>,
        min_contrast: Option<f64>,
    ) -> Response {
        let Some(ai) = &self.ai else {
            tracing::error!("AI service not initialized");
            return Response::ContrastAnalysis { result: None };
        };

        let min = min_contrast.unwrap_or(self.config.contrast.min_contrast);
        let result = match ai.analyze_contrast(&elements, min).await {
            Ok(result) => {
                tracing::info!(
                    "Contrast analysis complete: score {:.2}, {} issues",
                    result.analysis.overall_score,
                    result.analysis.issues.len()
                );
                Some(result)
            }
            Err(e) => {
                tracing::error!("Contrast analysis failed: {}", e);
                None
            }
        };

        Response::ContrastAnalysis { result }
    }
}

fn not_configured() -> Response {
    Response::Error {
        message: crate::ai::AiError::NotConfigured.to_string(),
    }
}

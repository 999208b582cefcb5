//! Sequential image generation for one batch of recipes.
//!
//! The batch is an explicit queue processed one item at a time. Each item goes
//! `pending -> loading -> success | error | error_quota`:
//!
//! - success stores the image, then waits [`IMAGE_COOLDOWN`] before the next
//!   request
//! - quota exhaustion marks the current and all queued items `error_quota`
//!   and stops the batch
//! - a rejected API key (or losing connectivity) marks the current and all
//!   queued items `error` and stops the batch
//! - any other failure marks only the current item `error`
//!
//! Images already generated and all recipe text are left intact when a batch
//! stops early.

use std::collections::VecDeque;
use std::time::Duration;

use crate::client::{AiError, CocktailDetails, ImageUpdate};
use crate::gateway::AiGateway;
use crate::tracker::{RecipeCollection, StatusTracker};

/// Pause after a successful image before requesting the next one.
pub const IMAGE_COOLDOWN: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
struct QueuedImage {
    id: String,
    details: CocktailDetails,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Ids whose image was generated
    pub succeeded: Vec<String>,
    /// Ids marked `error` or `error_quota`
    pub failed: Vec<String>,
    /// Error that stopped the batch early
    pub halted_by: Option<AiError>,
    /// Most recent per-item error that did not stop the batch
    pub last_error: Option<AiError>,
}

impl BatchReport {
    pub fn halted(&self) -> bool {
        self.halted_by.is_some()
    }

    /// The error to surface to the user, if any.
    pub fn surfaced_error(&self) -> Option<&AiError> {
        self.halted_by.as_ref().or(self.last_error.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct ImageBatch {
    queue: VecDeque<QueuedImage>,
    cooldown: Duration,
}

impl ImageBatch {
    /// Queues every recipe in `collection` whose image is pending or loading.
    pub fn from_collection(collection: &RecipeCollection) -> Self {
        let queue = collection
            .iter()
            .filter(|r| r.image_status().is_unfinished())
            .map(|r| QueuedImage {
                id: r.id().to_string(),
                details: r.details.clone(),
            })
            .collect();
        Self {
            queue,
            cooldown: IMAGE_COOLDOWN,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Runs the queue to completion, recording status changes in `tracker`.
    pub async fn run<T>(mut self, gateway: &AiGateway, tracker: &mut T) -> BatchReport
    where
        T: StatusTracker + ?Sized,
    {
        let mut report = BatchReport::default();
        let total = self.queue.len();

        for item in self.queue.iter() {
            tracker.apply(&item.id, ImageUpdate::Pending);
        }

        while let Some(item) = self.queue.pop_front() {
            tracker.apply(&item.id, ImageUpdate::Loading);

            match gateway.generate_image(&item.details).await {
                Ok(image) => {
                    tracing::info!(
                        "Image ready for \"{}\" ({}/{})",
                        item.details.cocktail_name,
                        total - self.queue.len(),
                        total
                    );
                    tracker.apply(&item.id, ImageUpdate::Ready(image));
                    report.succeeded.push(item.id);
                    if !self.queue.is_empty() && !self.cooldown.is_zero() {
                        tokio::time::sleep(self.cooldown).await;
                    }
                }
                Err(error @ AiError::QuotaExceeded) => {
                    tracing::warn!("Image quota exhausted; stopping batch with {} images left", self.queue.len());
                    self.halt(item, true, tracker, &mut report);
                    report.halted_by = Some(error);
                    break;
                }
                Err(error @ (AiError::InvalidCredential | AiError::OfflineUnavailable)) => {
                    tracing::error!("Stopping image batch: {}", error);
                    self.halt(item, false, tracker, &mut report);
                    report.halted_by = Some(error);
                    break;
                }
                Err(error) => {
                    tracing::error!(
                        "Failed to generate image for \"{}\": {}",
                        item.details.cocktail_name,
                        error
                    );
                    tracker.apply(&item.id, ImageUpdate::Failed);
                    report.failed.push(item.id);
                    report.last_error = Some(error);
                }
            }
        }

        report
    }

    fn halt<T>(&mut self, current: QueuedImage, quota_exhausted: bool, tracker: &mut T, report: &mut BatchReport)
    where
        T: StatusTracker + ?Sized,
    {
        // Queued items are still pending and the current one is loading
        let settled = tracker.fail_unfinished(quota_exhausted);
        tracing::debug!("Settled {} unfinished images", settled);
        report.failed.push(current.id);
        report.failed.extend(self.queue.drain(..).map(|remaining| remaining.id));
    }
}

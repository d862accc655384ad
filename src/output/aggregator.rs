//! Detection aggregation
//!
//! Folds detection batches from every page into one application list and a
//! metadata snapshot.

use crate::detector::{CategoryCatalog, Detection, DetectionBatch};
use crate::output::types::{CategoryRef, CrawlResult, DetectedApplication, DEFAULT_ICON};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;

/// Accumulates detector results across pages
///
/// The first detection of an application name wins; later detections of the
/// same name are dropped, not merged. Metadata is replaced wholesale by each
/// batch.
#[derive(Debug)]
pub struct ResultAggregator {
    catalog: Arc<CategoryCatalog>,
    state: Mutex<CrawlResult>,
}

impl ResultAggregator {
    pub fn new(catalog: Arc<CategoryCatalog>) -> Self {
        Self {
            catalog,
            state: Mutex::new(CrawlResult::default()),
        }
    }

    /// Merges one detector batch
    pub fn on_detected(&self, batch: DetectionBatch) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        state.meta = batch.meta;

        for detection in batch.applications {
            if state.applications.iter().any(|app| app.name == detection.name) {
                tracing::trace!(source = "driver", "Already detected {}", detection.name);
                continue;
            }

            let app = self.resolve(detection);
            tracing::debug!(
                source = "driver",
                "Detected {} (confidence {})",
                app.name,
                app.confidence
            );
            state.applications.push(app);
        }
    }

    /// Receives batches until every sender is gone
    pub async fn consume(&self, mut receiver: UnboundedReceiver<DetectionBatch>) {
        while let Some(batch) = receiver.recv().await {
            self.on_detected(batch);
        }
    }

    /// Returns the aggregated result so far
    pub fn snapshot(&self) -> CrawlResult {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn resolve(&self, detection: Detection) -> DetectedApplication {
        let categories = detection
            .categories
            .iter()
            .filter_map(|&id| match self.catalog.name(id) {
                Some(name) => Some(CategoryRef {
                    id,
                    name: name.to_string(),
                }),
                None => {
                    tracing::warn!(
                        source = "driver",
                        "Unknown category {} for {}",
                        id,
                        detection.name
                    );
                    None
                }
            })
            .collect();

        DetectedApplication {
            confidence: detection.confidence.to_string(),
            version: detection.version.filter(|v| !v.is_empty()),
            icon: detection
                .icon
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_ICON.to_string()),
            website: detection.website,
            categories,
            name: detection.name,
        }
    }
}

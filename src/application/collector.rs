//! Record collector task
//!
//! The collector is the single owner of the growing record sequence. Crawl
//! workers only hold the sending half of the channel; the sequence is handed
//! over to the caller when every sender has been dropped.

use crate::domain::{CrawlEvent, ProductRecord};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default channel buffer between crawler and collector
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Everything the collector gathered during one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Records in the order they were sent
    pub records: Vec<ProductRecord>,
    pub pages_visited: usize,
    pub failed_pages: Vec<String>,
}

pub struct RecordCollector {
    receiver: mpsc::Receiver<CrawlEvent>,
}

/// Create a bounded crawl event channel and its collector
pub fn record_channel(capacity: usize) -> (mpsc::Sender<CrawlEvent>, RecordCollector) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (sender, RecordCollector { receiver })
}

impl RecordCollector {
    /// Drain events until all senders are gone
    pub async fn run(mut self) -> CollectionSummary {
        let mut summary = CollectionSummary::default();

        while let Some(event) = self.receiver.recv().await {
            match event {
                CrawlEvent::Record(record) => {
                    debug!("Collected '{}'", record.name);
                    summary.records.push(record);
                }
                CrawlEvent::PageVisited { .. } => summary.pages_visited += 1,
                CrawlEvent::PageFailed { url, reason } => {
                    warn!("Page failed: {} ({})", url, reason);
                    summary.failed_pages.push(url);
                }
            }
        }

        info!(
            "Collected {} records from {} pages ({} failed)",
            summary.records.len(),
            summary.pages_visited,
            summary.failed_pages.len()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collects_in_send_order() {
        let (sender, collector) = record_channel(4);
        let handle = tokio::spawn(collector.run());

        for name in ["first", "second", "third"] {
            sender
                .send(CrawlEvent::Record(ProductRecord::new(name, "", "")))
                .await
                .unwrap();
        }
        sender
            .send(CrawlEvent::PageVisited { url: "https://shop.test/a".into() })
            .await
            .unwrap();
        sender
            .send(CrawlEvent::PageFailed {
                url: "https://shop.test/b".into(),
                reason: "HTTP 500".into(),
            })
            .await
            .unwrap();
        drop(sender);

        let summary = handle.await.unwrap();
        let names: Vec<&str> = summary.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(summary.pages_visited, 1);
        assert_eq!(summary.failed_pages, vec!["https://shop.test/b".to_string()]);
    }

    #[tokio::test]
    async fn test_many_senders_feed_one_collector() {
        let (sender, collector) = record_channel(2);
        let handle = tokio::spawn(collector.run());

        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let sender = sender.clone();
                tokio::spawn(async move {
                    for i in 0..10 {
                        let name = format!("w{worker}-{i}");
                        sender
                            .send(CrawlEvent::Record(ProductRecord::new(name, "", "")))
                            .await
                            .unwrap();
                    }
                })
            })
            .collect();
        drop(sender);

        for worker in workers {
            worker.await.unwrap();
        }
        let summary = handle.await.unwrap();
        assert_eq!(summary.records.len(), 40);
    }

    #[tokio::test]
    async fn test_no_events_yields_empty_summary() {
        let (sender, collector) = record_channel(1);
        drop(sender);
        assert_eq!(collector.run().await, CollectionSummary::default());
    }
}

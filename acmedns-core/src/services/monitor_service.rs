//! Polling monitors that wait for a zone edit to show up at the
//! authoritative nameserver.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::CoreError;
use crate::services::ServiceContext;
use crate::types::{CnameRecord, MonitorOptions};

/// Granularity of [`MonitorObserver::waiting`] notifications.
const TICK: Duration = Duration::from_secs(1);

/// How a monitor run ended.
#[derive(Debug)]
pub enum MonitorOutcome {
    /// The wanted record showed up on poll number `polls`.
    Satisfied { polls: u32 },
    /// A query failed, or the deadline passed.
    Failed(CoreError),
}

impl MonitorOutcome {
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }
}

/// Progress callbacks for interactive front ends.
pub trait MonitorObserver: Send + Sync {
    /// The CNAME target changed between two polls.
    fn target_changed(&self, _target: &str) {}

    /// A matching record was found.
    fn record_found(&self, _data: &str) {}

    /// Time left until the next poll, reported every second.
    fn waiting(&self, _remaining: Duration) {}
}

/// Observer that ignores all progress.
pub struct NoopObserver;

impl MonitorObserver for NoopObserver {}

/// Change monitor service
pub struct MonitorService {
    ctx: Arc<ServiceContext>,
    options: MonitorOptions,
}

impl MonitorService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let options = ctx.config.monitor;
        Self { ctx, options }
    }

    #[must_use]
    pub fn with_options(mut self, options: MonitorOptions) -> Self {
        self.options = options;
        self
    }

    /// Poll until `_acme-challenge.<domain>` points at `expected`.
    ///
    /// An absent CNAME keeps the monitor waiting; any other lookup error
    /// fails it.
    pub async fn wait_for_cname(
        &self,
        domain: &str,
        expected: &str,
        observer: &dyn MonitorObserver,
    ) -> MonitorOutcome {
        let poll = async {
            let mut last_seen: Option<String> = None;
            let mut polls = 0;
            loop {
                polls += 1;
                let record = match self.ctx.dns.get_cname(domain).await {
                    Ok(record) => record,
                    Err(e) if e.is_not_found() => CnameRecord::default(),
                    Err(e) => return MonitorOutcome::Failed(e.into()),
                };

                if last_seen.as_deref().is_some_and(|seen| seen != record.target) {
                    log::info!(
                        "Detected a change in CNAME record. New CNAME target: {}",
                        record.target
                    );
                    observer.target_changed(&record.target);
                }
                if record.correct_target(expected) {
                    observer.record_found(&record.target);
                    return MonitorOutcome::Satisfied { polls };
                }
                last_seen = Some(record.target);

                self.pause(observer).await;
            }
        };
        self.bounded("CNAME", domain, poll).await
    }

    /// Poll until `domain` has at least one CAA record with an issuer.
    pub async fn wait_for_caa(&self, domain: &str, observer: &dyn MonitorObserver) -> MonitorOutcome {
        let poll = async {
            let mut polls = 0;
            loop {
                polls += 1;
                let records = match self.ctx.dns.get_caa(domain).await {
                    Ok(records) => records,
                    Err(e) if e.is_not_found() => Vec::new(),
                    Err(e) => return MonitorOutcome::Failed(e.into()),
                };

                if let Some(record) = records.iter().find(|r| r.is_set()) {
                    log::info!("CAA record data: {}", record.data);
                    observer.record_found(&record.data);
                    return MonitorOutcome::Satisfied { polls };
                }

                self.pause(observer).await;
            }
        };
        self.bounded("CAA", domain, poll).await
    }

    /// Sleep for one interval, reporting the countdown.
    async fn pause(&self, observer: &dyn MonitorObserver) {
        let mut remaining = self.options.interval;
        while !remaining.is_zero() {
            observer.waiting(remaining);
            let step = remaining.min(TICK);
            tokio::time::sleep(step).await;
            remaining -= step;
        }
    }

    /// Apply the configured deadline to a polling loop.
    async fn bounded(
        &self,
        record: &str,
        domain: &str,
        poll: impl Future<Output = MonitorOutcome>,
    ) -> MonitorOutcome {
        let Some(deadline) = self.options.deadline else {
            return poll.await;
        };
        let started = Instant::now();
        match tokio::time::timeout(deadline, poll).await {
            Ok(outcome) => outcome,
            Err(_) => {
                log::debug!("Gave up waiting for {record} record of {domain}");
                MonitorOutcome::Failed(CoreError::MonitorDeadlineExceeded {
                    record: record.to_string(),
                    domain: domain.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                })
            }
        }
    }
}

//! Installation job poller
//!
//! Turns a triggered installation into a blocking call: the job status is
//! queried until it is terminal, with a capped exponential delay between
//! queries. Transient query failures are retried a bounded number of times in
//! a row. An overall deadline bounds the wait; running out of time is reported
//! as [`DeployerError::PollTimeout`] because the job may still be running.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::appliance::Appliance;
use crate::errors::DeployerError;
use crate::models::installation::{JobReport, JobStatus};
use crate::utils::{calc_exp_backoff, CooldownOptions};

/// Poller options
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay after the first non-terminal status
    pub interval: Duration,

    /// Upper bound on the delay between queries
    pub max_interval: Duration,

    /// Overall time to wait for a terminal status
    pub timeout: Duration,

    /// Consecutive transient query failures tolerated
    pub max_query_retries: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(60),
            timeout: Duration::from_secs(4 * 60 * 60),
            max_query_retries: 5,
        }
    }
}

impl Options {
    fn cooldown(&self) -> CooldownOptions {
        CooldownOptions {
            base_delay: self.interval,
            max_delay: self.max_interval.max(self.interval),
            multiplier: 2.0,
        }
    }
}

/// A triggered installation job, as last observed
#[derive(Debug, Clone)]
pub struct InstallationJob {
    pub id: u64,
    pub last: Option<JobReport>,
    pub polls: u32,
}

impl InstallationJob {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            last: None,
            polls: 0,
        }
    }

    /// Latest observed status
    pub fn status(&self) -> Option<JobStatus> {
        self.last.as_ref().map(|r| r.status)
    }

    fn observe(&mut self, report: JobReport) {
        if self.status() != Some(report.status) {
            info!("Installation {} is {}", self.id, report.status);
        }
        self.polls += 1;
        self.last = Some(report);
    }
}

/// Wait for an installation job to reach a terminal status
///
/// Returns the job once it has succeeded. A failed job becomes
/// [`DeployerError::Installation`] carrying the appliance's reason.
pub async fn wait_for_result<S, F>(
    options: &Options,
    appliance: &dyn Appliance,
    job_id: u64,
    sleep_fn: S,
) -> Result<InstallationJob, DeployerError>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let started = Instant::now();
    let cooldown = options.cooldown();
    let mut job = InstallationJob::new(job_id);
    let mut query_failures: u32 = 0;
    let mut attempt: u32 = 0;

    loop {
        match appliance.installation_status(job.id).await {
            Ok(report) => {
                query_failures = 0;
                debug!("Installation {} poll #{}: {}", job.id, job.polls + 1, report.status);
                job.observe(report);

                match job.status() {
                    Some(JobStatus::Succeeded) => return Ok(job),
                    Some(JobStatus::Failed) => {
                        let reason = job
                            .last
                            .as_ref()
                            .and_then(|r| r.reason.clone())
                            .unwrap_or_else(|| "no reason reported".to_string());
                        error!("Installation {} failed: {}", job.id, reason);
                        return Err(DeployerError::Installation { id: job.id, reason });
                    }
                    _ => {}
                }
            }
            Err(e) if e.is_transient() => {
                query_failures += 1;
                if query_failures > options.max_query_retries {
                    error!(
                        "Lost track of installation {} after {} failed status queries: {}",
                        job.id, query_failures, e
                    );
                    return Err(e);
                }
                warn!(
                    "Status query for installation {} failed ({}/{}), retrying: {}",
                    job.id, query_failures, options.max_query_retries, e
                );
            }
            Err(e) => return Err(e),
        }

        let waited = started.elapsed();
        if waited >= options.timeout {
            error!("Installation {} still not finished after {:?}", job.id, waited);
            return Err(DeployerError::PollTimeout { id: job.id, waited });
        }

        let delay = calc_exp_backoff(&cooldown, attempt).min(options.timeout - waited);
        attempt = attempt.saturating_add(1);
        sleep_fn(delay).await;
    }
}

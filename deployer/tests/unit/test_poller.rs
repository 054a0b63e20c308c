//! Installation job poller tests

mod common;

use std::time::Duration;

use common::{MockAppliance, StatusStep};
use opsdeploy::deploy::poller::{wait_for_result, Options};
use opsdeploy::errors::DeployerError;
use opsdeploy::models::installation::{JobReport, JobStatus};

fn options() -> Options {
    Options {
        interval: Duration::from_secs(1),
        max_interval: Duration::from_secs(8),
        timeout: Duration::from_secs(60),
        max_query_retries: 2,
    }
}

#[tokio::test(start_paused = true)]
async fn test_succeeds_after_queued_and_running() {
    let appliance = MockAppliance::default().with_statuses(&[
        JobStatus::Queued,
        JobStatus::Running,
        JobStatus::Succeeded,
    ]);

    let job = wait_for_result(&options(), &appliance, 42, tokio::time::sleep)
        .await
        .unwrap();

    assert_eq!(job.id, 42);
    assert_eq!(job.status(), Some(JobStatus::Succeeded));
    assert_eq!(job.polls, 3);
    assert_eq!(appliance.status_queries(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_carries_reason() {
    let appliance = MockAppliance::default()
        .with_statuses(&[JobStatus::Running])
        .then(StatusStep::Report(JobReport::failed("unreachable VM")));

    let err = wait_for_result(&options(), &appliance, 42, tokio::time::sleep)
        .await
        .unwrap_err();

    match err {
        DeployerError::Installation { id, reason } => {
            assert_eq!(id, 42);
            assert_eq!(reason, "unreachable VM");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_failed_without_reason() {
    let appliance = MockAppliance::default().with_statuses(&[JobStatus::Failed]);

    let err = wait_for_result(&options(), &appliance, 42, tokio::time::sleep)
        .await
        .unwrap_err();
    assert!(matches!(err, DeployerError::Installation { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_times_out_while_running() {
    // No scripted statuses: every query reports running
    let appliance = MockAppliance::default();

    let started = tokio::time::Instant::now();
    let err = wait_for_result(&options(), &appliance, 42, tokio::time::sleep)
        .await
        .unwrap_err();

    match err {
        DeployerError::PollTimeout { id, waited } => {
            assert_eq!(id, 42);
            assert!(waited >= Duration::from_secs(60));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // The last sleep is clamped to the deadline
    assert!(started.elapsed() < Duration::from_secs(60) + Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let appliance = MockAppliance::default()
        .with_statuses(&[JobStatus::Running])
        .then(StatusStep::Unreachable)
        .then(StatusStep::Unreachable)
        .then(StatusStep::Report(JobReport::new(JobStatus::Succeeded)));

    let job = wait_for_result(&options(), &appliance, 42, tokio::time::sleep)
        .await
        .unwrap();
    assert_eq!(job.status(), Some(JobStatus::Succeeded));
    assert_eq!(appliance.status_queries(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_retry_budget_is_bounded() {
    let appliance = MockAppliance::default()
        .then(StatusStep::Unreachable)
        .then(StatusStep::Unreachable)
        .then(StatusStep::Unreachable);

    let err = wait_for_result(&options(), &appliance, 42, tokio::time::sleep)
        .await
        .unwrap_err();
    assert!(err.is_transient());
    assert_eq!(appliance.status_queries(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_missing_job_is_fatal_immediately() {
    let appliance = MockAppliance::default().then(StatusStep::Missing);

    let err = wait_for_result(&options(), &appliance, 42, tokio::time::sleep)
        .await
        .unwrap_err();
    assert!(matches!(err, DeployerError::Installation { .. }));
    assert_eq!(appliance.status_queries(), 1);
}

#[tokio::test]
async fn test_delays_back_off_up_to_the_cap() {
    use std::sync::Mutex;

    let appliance = MockAppliance::default().with_statuses(&[
        JobStatus::Queued,
        JobStatus::Running,
        JobStatus::Running,
        JobStatus::Running,
        JobStatus::Running,
        JobStatus::Running,
        JobStatus::Succeeded,
    ]);
    let delays = Mutex::new(Vec::new());

    wait_for_result(&options(), &appliance, 42, |d| {
        delays.lock().unwrap().push(d);
        std::future::ready(())
    })
    .await
    .unwrap();

    let secs: Vec<u64> = delays.into_inner().unwrap().iter().map(Duration::as_secs).collect();
    assert_eq!(secs, [1, 2, 4, 8, 8, 8]);
}

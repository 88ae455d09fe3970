//! SetupTaskRunner - timeout 付きの setup task を実行し、結果を報告する
//!
//! task 本体と締め切りタイマーを競争させます。タイマーが先なら
//! `SetupTaskTimeout` を報告しますが、本体はキャンセルしません（キャンセル手段が
//! ないため）。本体はプロセス終了まで動き続けることがあり、その結果は捨てられます。

use tokio::task::JoinHandle;
use tracing::Instrument;

use super::collector::OutcomeSink;
use super::launcher::join_failure;
use super::units::SetupTask;
use crate::domain::{Outcome, UnitError, UnitKind};

pub fn run_setup_task(task: SetupTask, sink: OutcomeSink) -> JoinHandle<()> {
    let SetupTask {
        name,
        timeout,
        action,
    } = task;
    let span = tracing::info_span!("setup_task", unit = %name, timeout_secs = timeout.as_secs());

    tokio::spawn(
        async move {
            tracing::info!("starting setup task");
            let work = tokio::spawn(async move { action.run(timeout).await }.in_current_span());

            // Dropping `work` on timeout detaches it; it keeps running.
            let result = tokio::select! {
                joined = work => match joined {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(err)) if err.is_deadline() => {
                        tracing::debug!(reason = %err, "action stopped at its own deadline");
                        Err(UnitError::SetupTaskTimeout {
                            unit: name.clone(),
                            timeout,
                        })
                    }
                    Ok(Err(err)) => Err(UnitError::SetupTask {
                        unit: name.clone(),
                        reason: err.to_string(),
                    }),
                    Err(err) => Err(join_failure(name.clone(), err)),
                },
                _ = tokio::time::sleep(timeout) => Err(UnitError::SetupTaskTimeout {
                    unit: name.clone(),
                    timeout,
                }),
            };

            let outcome = match result {
                Ok(()) => {
                    tracing::info!("setup task succeeded");
                    Outcome::success(name, UnitKind::SetupTask)
                }
                Err(error) => {
                    tracing::error!(error = %error, "setup task failed");
                    Outcome::failure(UnitKind::SetupTask, error)
                }
            };
            sink.submit(outcome).await;
        }
        .instrument(span),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::collector::OutcomeCollector;
    use crate::ports::{SetupAction, SetupError};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct Sleepy {
        work: Duration,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl SetupAction for Sleepy {
        async fn run(&self, _timeout: Duration) -> Result<(), SetupError> {
            tokio::time::sleep(self.work).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl SetupAction for Broken {
        async fn run(&self, _timeout: Duration) -> Result<(), SetupError> {
            Err(SetupError::Failed("no manifests".to_string()))
        }
    }

    /// Gives up at its own deadline, just before the runner's timer.
    struct SelfTimed;

    #[async_trait]
    impl SetupAction for SelfTimed {
        async fn run(&self, timeout: Duration) -> Result<(), SetupError> {
            tokio::time::sleep(timeout / 2).await;
            Err(SetupError::DeadlineExceeded(
                "pods not running before deadline: kube-dns".to_string(),
            ))
        }
    }

    struct Panicky;

    #[async_trait]
    impl SetupAction for Panicky {
        async fn run(&self, _timeout: Duration) -> Result<(), SetupError> {
            panic!("boom");
        }
    }

    fn sleepy(work: Duration) -> (Arc<Sleepy>, Arc<AtomicBool>) {
        let finished = Arc::new(AtomicBool::new(false));
        let action = Arc::new(Sleepy {
            work,
            finished: finished.clone(),
        });
        (action, finished)
    }

    #[tokio::test(start_paused = true)]
    async fn success_is_submitted_as_success() {
        let mut collector = OutcomeCollector::with_capacity(1);
        let (action, _) = sleepy(Duration::from_secs(1));
        let handle = run_setup_task(
            SetupTask::new("create-assets", Duration::from_secs(60), action),
            collector.sink(),
        );
        handle.await.unwrap();

        // The success is only recorded; `first` keeps waiting.
        let waited = tokio::time::timeout(Duration::from_secs(60), collector.first()).await;
        assert!(waited.is_err());
        assert_eq!(collector.completed().len(), 1);
        assert_eq!(collector.completed()[0].unit().as_str(), "create-assets");
    }

    #[tokio::test]
    async fn failure_is_classified_as_setup_task_error() {
        let mut collector = OutcomeCollector::with_capacity(1);
        run_setup_task(
            SetupTask::new("create-assets", Duration::from_secs(60), Arc::new(Broken)),
            collector.sink(),
        );

        let outcome = collector.first().await;
        assert_eq!(
            outcome.error(),
            Some(&UnitError::SetupTask {
                unit: "create-assets".into(),
                reason: "no manifests".to_string(),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_wins_and_work_keeps_running() {
        let mut collector = OutcomeCollector::with_capacity(1);
        let (action, finished) = sleepy(Duration::from_secs(30));
        let timeout = Duration::from_secs(5);
        let started = tokio::time::Instant::now();

        run_setup_task(
            SetupTask::new("wait-for-pods", timeout, action),
            collector.sink(),
        );

        let outcome = collector.first().await;
        assert!(outcome.error().is_some_and(UnitError::is_timeout));
        assert!(started.elapsed() >= timeout);
        assert!(started.elapsed() < Duration::from_secs(30));
        assert!(!finished.load(Ordering::SeqCst));

        // Not cancelled: the detached work still completes later.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn own_deadline_is_reported_as_timeout() {
        let mut collector = OutcomeCollector::with_capacity(1);
        let timeout = Duration::from_secs(10);
        let started = tokio::time::Instant::now();

        run_setup_task(
            SetupTask::new("wait-for-pods", timeout, Arc::new(SelfTimed)),
            collector.sink(),
        );

        let outcome = collector.first().await;
        assert_eq!(
            outcome.error(),
            Some(&UnitError::SetupTaskTimeout {
                unit: "wait-for-pods".into(),
                timeout,
            })
        );
        assert!(started.elapsed() < timeout);
    }

    #[tokio::test]
    async fn panicking_action_is_reported_as_panic() {
        let mut collector = OutcomeCollector::with_capacity(1);
        run_setup_task(
            SetupTask::new("create-assets", Duration::from_secs(60), Arc::new(Panicky)),
            collector.sink(),
        );

        let outcome = collector.first().await;
        assert_eq!(
            outcome.error(),
            Some(&UnitError::Panicked {
                unit: "create-assets".into(),
                detail: "boom".to_string(),
            })
        );
        assert_eq!(outcome.kind(), UnitKind::SetupTask);
    }
}

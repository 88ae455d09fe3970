//! OutcomeCollector - 全 unit の Outcome を受け取る唯一の合流点
//!
//! # 方針
//! - 成功の Outcome は記録するだけで `first()` を満たさない
//! - 失敗の Outcome が届いた時点で `first()` が返る
//! - 全 unit が成功して去っても `first()` は返らない（正常運転は終わらない）
//!
//! channel の容量は unit 数に合わせてあるので、各 unit が一度だけ submit する限り
//! submitter が待たされることはありません。

use tokio::sync::mpsc;

use crate::domain::Outcome;

/// Receiving side. Owned by the orchestrator.
pub struct OutcomeCollector {
    tx: mpsc::Sender<Outcome>,
    rx: mpsc::Receiver<Outcome>,
    completed: Vec<Outcome>,
}

/// Sending side handed to every unit.
#[derive(Clone)]
pub struct OutcomeSink {
    tx: mpsc::Sender<Outcome>,
}

impl OutcomeCollector {
    /// `capacity` should be the number of units that will report.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx,
            completed: Vec::new(),
        }
    }

    pub fn sink(&self) -> OutcomeSink {
        OutcomeSink {
            tx: self.tx.clone(),
        }
    }

    /// Wait for the next error outcome.
    ///
    /// Success outcomes received meanwhile are kept in `completed()`.
    /// Each error outcome is returned by exactly one call.
    pub async fn first(&mut self) -> Outcome {
        loop {
            // The collector keeps its own sender, so the channel never closes.
            let Some(outcome) = self.rx.recv().await else {
                return std::future::pending().await;
            };

            if outcome.is_error() {
                return outcome;
            }

            tracing::info!(
                unit = %outcome.unit(),
                kind = %outcome.kind(),
                "unit completed successfully"
            );
            self.completed.push(outcome);
        }
    }

    pub fn completed(&self) -> &[Outcome] {
        &self.completed
    }
}

impl OutcomeSink {
    /// Hand an outcome over to the collector.
    ///
    /// If the collector is already gone the outcome is dropped.
    pub async fn submit(&self, outcome: Outcome) {
        if let Err(mpsc::error::SendError(outcome)) = self.tx.send(outcome).await {
            tracing::debug!(unit = %outcome.unit(), "collector closed, outcome dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UnitError, UnitKind, UnitName};
    use std::collections::HashSet;
    use std::time::Duration;

    fn failed(name: &str) -> Outcome {
        Outcome::failure(
            UnitKind::Component,
            UnitError::ComponentExit {
                unit: UnitName::new(name),
                reason: "exit status: 1".to_string(),
            },
        )
    }

    fn succeeded(name: &str) -> Outcome {
        Outcome::success(UnitName::new(name), UnitKind::SetupTask)
    }

    #[tokio::test]
    async fn error_satisfies_first() {
        let mut collector = OutcomeCollector::with_capacity(1);
        collector.sink().submit(failed("kube-scheduler")).await;

        let outcome = collector.first().await;
        assert!(outcome.is_error());
        assert_eq!(outcome.unit().as_str(), "kube-scheduler");
    }

    #[tokio::test(start_paused = true)]
    async fn success_alone_never_satisfies_first() {
        let mut collector = OutcomeCollector::with_capacity(2);
        let sink = collector.sink();
        sink.submit(succeeded("create-assets")).await;
        sink.submit(succeeded("wait-for-pods")).await;
        drop(sink);

        let result = tokio::time::timeout(Duration::from_secs(3600), collector.first()).await;
        assert!(result.is_err());
        assert_eq!(collector.completed().len(), 2);
    }

    #[tokio::test]
    async fn success_before_error_is_recorded_not_returned() {
        let mut collector = OutcomeCollector::with_capacity(2);
        let sink = collector.sink();
        sink.submit(succeeded("create-assets")).await;
        sink.submit(failed("kube-apiserver")).await;

        let outcome = collector.first().await;
        assert_eq!(outcome.unit().as_str(), "kube-apiserver");
        assert_eq!(collector.completed().len(), 1);
        assert_eq!(collector.completed()[0].unit().as_str(), "create-assets");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submits_are_neither_lost_nor_duplicated() {
        const N: usize = 16;
        let mut collector = OutcomeCollector::with_capacity(N);

        let mut handles = Vec::with_capacity(N);
        for i in 0..N {
            let sink = collector.sink();
            handles.push(tokio::spawn(async move {
                sink.submit(failed(&format!("unit-{i}"))).await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let mut seen = HashSet::new();
        for _ in 0..N {
            let outcome = collector.first().await;
            assert!(seen.insert(outcome.unit().clone()), "delivered twice");
        }
        assert_eq!(seen.len(), N);

        let extra = tokio::time::timeout(Duration::from_millis(50), collector.first()).await;
        assert!(extra.is_err());
    }

    #[tokio::test]
    async fn submit_after_collector_dropped_is_a_no_op() {
        let collector = OutcomeCollector::with_capacity(1);
        let sink = collector.sink();
        drop(collector);

        sink.submit(failed("kube-apiserver")).await;
    }
}

//! ComponentLauncher - component を独立した task で起動し、終了を報告する
//!
//! # 保証
//! - 1 unit につき `submit` はちょうど 1 回
//! - panic は握りつぶさず `UnitError::Panicked` として報告
//!
//! component 本体は内側の task で動かし、外側の task がその `JoinHandle` を待ちます。
//! こうすると panic も `JoinError` として外側で受け取れます。

use std::any::Any;

use tokio::task::{JoinError, JoinHandle};
use tracing::Instrument;

use super::collector::OutcomeSink;
use super::units::ComponentUnit;
use crate::domain::{Outcome, UnitError, UnitKind, UnitName};

pub fn launch_component(unit: ComponentUnit, sink: OutcomeSink) -> JoinHandle<()> {
    let ComponentUnit { name, component } = unit;
    let span = tracing::info_span!("component", unit = %name);

    tokio::spawn(
        async move {
            tracing::info!("starting component");
            let running = tokio::spawn(async move { component.run().await }.in_current_span());

            let error = match running.await {
                Ok(Ok(())) => UnitError::ComponentExit {
                    unit: name,
                    reason: "exited without error".to_string(),
                },
                Ok(Err(err)) => UnitError::ComponentExit {
                    unit: name,
                    reason: err.to_string(),
                },
                Err(err) => join_failure(name, err),
            };

            tracing::error!(error = %error, "component stopped");
            sink.submit(Outcome::failure(UnitKind::Component, error)).await;
        }
        .instrument(span),
    )
}

/// Turn a failed join of a unit's task into its error.
pub(crate) fn join_failure(unit: UnitName, err: JoinError) -> UnitError {
    let detail = if err.is_panic() {
        panic_message(err.into_panic())
    } else {
        "task was cancelled".to_string()
    };
    UnitError::Panicked { unit, detail }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

//! Kubectl - kubectl 呼び出しの薄いラッパー
//!
//! asset の投入と pod の待機の両方で使います。どちらも API server が上がるまでは
//! 失敗し続けるのが普通なので、終了コードはエラーにせずに呼び出し側へ返します。

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use tokio::process::Command;
use tokio::time::Instant;

use crate::ports::SetupError;

/// Base interval between polls against the API server.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
    server: String,
}

/// Captured result of one kubectl invocation.
#[derive(Debug, Clone)]
pub struct KubectlOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl Kubectl {
    pub fn new(binary: impl Into<PathBuf>, server: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            server: server.into(),
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Run kubectl against the configured server.
    ///
    /// Only a failure to start kubectl is an error.
    pub async fn run(&self, args: &[&str]) -> Result<KubectlOutput, SetupError> {
        let output = Command::new(&self.binary)
            .arg(format!("--server={}", self.server))
            .args(args)
            .output()
            .await
            .map_err(|source| SetupError::Command {
                command: format!("{} {}", self.binary.display(), args.join(" ")),
                source,
            })?;

        Ok(KubectlOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Spread polls a little so both setup tasks do not hit the API server in lockstep.
pub(crate) fn jittered(base: Duration) -> Duration {
    let factor: f64 = rand::thread_rng().gen_range(0.0..0.2);
    base + base.mul_f64(factor)
}

/// Polling deadline for `timeout`. `None` when it is too far away to represent.
pub(crate) fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

pub(crate) fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrepresentable_deadline_never_expires() {
        let deadline = deadline_after(Duration::MAX);
        assert!(deadline.is_none());
        assert!(!expired(deadline));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_expires_after_timeout() {
        let deadline = deadline_after(Duration::from_secs(5));
        assert!(!expired(deadline));
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(expired(deadline));
    }

    #[test]
    fn jitter_stays_within_twenty_percent() {
        let base = Duration::from_secs(5);
        for _ in 0..100 {
            let d = jittered(base);
            assert!(d >= base);
            assert!(d <= base.mul_f64(1.2));
        }
    }

    #[tokio::test]
    async fn missing_kubectl_is_a_command_error() {
        let kubectl = Kubectl::new("/nonexistent/kubectl", "http://127.0.0.1:8081");
        let err = kubectl.run(&["version"]).await.unwrap_err();
        assert!(matches!(err, SetupError::Command { .. }));
        assert!(err.to_string().contains("/nonexistent/kubectl version"));
    }
}

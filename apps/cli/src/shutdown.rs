use gauge_app::RunFlag;
use tokio::task::JoinHandle;

/// Clears `flag` on SIGINT or SIGTERM (Ctrl+C elsewhere).
///
/// Handlers are registered before this returns, so a signal that arrives
/// before the task is first polled is still caught.
pub fn install(flag: RunFlag) -> JoinHandle<()> {
    let signals = Signals::register();
    tokio::spawn(async move {
        signals.recv().await;
        tracing::info!("shutdown requested");
        flag.stop();
    })
}

#[cfg(unix)]
enum Signals {
    Unix {
        sigint: tokio::signal::unix::Signal,
        sigterm: tokio::signal::unix::Signal,
    },
    CtrlC,
}

#[cfg(unix)]
impl Signals {
    fn register() -> Self {
        use tokio::signal::unix::{SignalKind, signal};

        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(sigint), Ok(sigterm)) => Self::Unix { sigint, sigterm },
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!("signal handlers unavailable, using ctrl-c: {}", err);
                Self::CtrlC
            }
        }
    }

    async fn recv(self) {
        match self {
            Self::Unix {
                mut sigint,
                mut sigterm,
            } => {
                tokio::select! {
                    _ = sigint.recv() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Self::CtrlC => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn register() -> Self {
        Self
    }

    async fn recv(self) {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::process::Command;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn sigterm_before_first_poll_stops_flag() {
        let flag = RunFlag::new();
        let handle = install(flag.clone());
        // The spawned task has not run yet on this single-threaded runtime.
        let status = Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .expect("send SIGTERM");
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), flag.stopped())
            .await
            .expect("flag cleared by SIGTERM");
        assert!(!flag.is_running());
        handle.await.expect("signal task");
    }
}

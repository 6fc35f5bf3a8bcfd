use tokio::task::JoinHandle;
use crate::error::{Error, Result};
use tracing::{error, info};

/// Owns the process's background loops, today only the price refresh loop.
///
/// The refresh loop never returns on its own, so a finished handle means the
/// loop died and the cache stops being refreshed. `main` polls
/// [`TaskSupervisor::check_health`] next to the HTTP server and shuts the
/// process down on the first failure.
///
/// ```rust,ignore
/// let mut supervisor = TaskSupervisor::new();
/// supervisor.spawn("price_refresh", scheduler.clone().run());
/// supervisor.check_health().await?;
/// ```
#[derive(Default)]
pub struct TaskSupervisor {
    loops: Vec<(&'static str, JoinHandle<()>)>,
}

impl TaskSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        info!(task = name, "Starting background loop");
        self.loops.push((name, tokio::spawn(future)));
    }

    /// Fails with the first loop that has stopped, whether it returned or
    /// panicked. A reported loop is forgotten.
    pub async fn check_health(&mut self) -> Result<()> {
        let Some(idx) = self.loops.iter().position(|(_, handle)| handle.is_finished()) else {
            return Ok(());
        };

        let (name, handle) = self.loops.swap_remove(idx);
        let reason = match handle.await {
            Ok(()) => "returned".to_string(),
            Err(e) if e.is_panic() => "panicked".to_string(),
            Err(e) => e.to_string(),
        };
        error!(task = name, %reason, "Background loop stopped");
        Err(Error::TaskFailed(format!("{} {}", name, reason)))
    }

    pub fn shutdown_all(&mut self) {
        for (name, handle) in self.loops.drain(..) {
            handle.abort();
            info!(task = name, "Aborted background loop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn stopped_loop_is_reported_once() {
        let mut supervisor = TaskSupervisor::new();
        supervisor.spawn("short", async {});
        supervisor.spawn("price_refresh", std::future::pending());

        tokio::time::sleep(Duration::from_millis(50)).await;

        match supervisor.check_health().await {
            Err(Error::TaskFailed(msg)) => assert_eq!(msg, "short returned"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(supervisor.check_health().await.is_ok());
        supervisor.shutdown_all();
    }

    #[tokio::test]
    async fn panicking_loop_is_named() {
        let mut supervisor = TaskSupervisor::new();
        supervisor.spawn("price_refresh", async { panic!("boom") });

        tokio::time::sleep(Duration::from_millis(50)).await;

        match supervisor.check_health().await {
            Err(Error::TaskFailed(msg)) => assert_eq!(msg, "price_refresh panicked"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn aborted_loops_are_not_reported() {
        let mut supervisor = TaskSupervisor::new();
        supervisor.spawn("price_refresh", std::future::pending());
        supervisor.shutdown_all();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(supervisor.check_health().await.is_ok());
    }
}

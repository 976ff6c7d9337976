//! Ctrl+C and tick-limit shutdown for the watch command

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels the monitor on Ctrl+C or when asked to stop
#[derive(Clone)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Also cancel when Ctrl+C arrives; spawns a listener task
    pub fn with_ctrl_c() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();

        tokio::spawn(async move {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => match signal {
                    Ok(()) => {
                        info!("Received Ctrl+C, stopping monitor");
                        token.cancel();
                    }
                    Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
                },
                _ = token.cancelled() => {}
            }
        });

        controller
    }

    /// Token for a task that should stop with this controller
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_reaches_children() {
        let controller = ShutdownController::new();
        let child = controller.child_token();

        assert!(!controller.is_cancelled());
        controller.shutdown();

        assert!(controller.is_cancelled());
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_child_cancel_leaves_parent_running() {
        let controller = ShutdownController::with_ctrl_c();
        let first = controller.child_token();
        let second = controller.child_token();

        first.cancel();
        assert!(!second.is_cancelled());
        assert!(!controller.is_cancelled());

        controller.shutdown();
        assert!(second.is_cancelled());
    }
}

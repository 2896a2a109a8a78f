use std::sync::Arc;

use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{AvatarResolver, AvatarResult};

/// Avatar that starts as the stock fallback and may be superseded once
/// the provider answers.
///
/// Dropping the handle aborts the pending lookup, so a consumer that went
/// away never receives an update.
pub struct LiveAvatar {
    receiver: watch::Receiver<AvatarResult>,
    task: JoinHandle<()>,
}

impl LiveAvatar {
    pub(super) fn spawn(resolver: Arc<AvatarResolver>, user_id: String) -> Self {
        let fallback = resolver.fallback(&user_id);
        let (sender, receiver) = watch::channel(fallback.clone());

        let task = tokio::spawn(async move {
            match resolver.lookup(&user_id).await {
                Ok(live) if live != fallback => {
                    // No receiver left means the consumer is gone.
                    if sender.send(live).is_err() {
                        debug!("Avatar consumer for {user_id} dropped");
                    }
                }
                Ok(_) => debug!("Live avatar for {user_id} equals fallback"),
                Err(e) => debug!("Keeping fallback avatar for {user_id}: {e}"),
            }
        });

        Self { receiver, task }
    }

    /// Latest known avatar, available without waiting.
    pub fn current(&self) -> AvatarResult {
        self.receiver.borrow().clone()
    }

    /// Waits for the live result.
    ///
    /// Returns `None` once the lookup finished without replacing the
    /// fallback.
    pub async fn changed(&mut self) -> Option<AvatarResult> {
        self.receiver.changed().await.ok()?;
        Some(self.current())
    }

    pub fn is_settled(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for LiveAvatar {
    fn drop(&mut self) {
        self.task.abort();
    }
}

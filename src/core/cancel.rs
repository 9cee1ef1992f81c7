use tokio::sync::watch;

/// Session-wide stop flag observed by the answer tasks.
///
/// Dropping the signal counts as cancellation too, so a listener never
/// outlives the session that spawned it.
#[derive(Debug)]
pub struct CancelSignal {
    tx: watch::Sender<bool>,
}

#[derive(Debug)]
pub struct CancelListener {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> CancelListener {
        CancelListener {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelListener {
    /// Resolves once the session is cancelled or its signal is gone.
    pub async fn cancelled(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

//! Shutdown signal released explicitly by the test.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::process::{ShutdownError, ShutdownSignal};

pub struct ManualShutdown {
    receiver: Mutex<Receiver<()>>,
}

impl ManualShutdown {
    /// The signal plus the sender that releases it.
    #[must_use]
    pub fn new() -> (Self, Sender<()>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                receiver: Mutex::new(receiver),
            },
            sender,
        )
    }
}

impl ShutdownSignal for ManualShutdown {
    fn wait(&self) -> Result<(), ShutdownError> {
        // A dropped sender also releases the daemon.
        let _ = self.receiver.lock().expect("shutdown mutex").recv();
        Ok(())
    }
}

use log::info;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{EscError, Result};

const SLICE: Duration = Duration::from_millis(20);

/// Blocking wait used for ESC timing.
pub trait Delay {
    fn sleep(&mut self, duration: Duration) -> Result<()>;
}

/// Sleeps in short slices and bails out once the interrupt flag is raised.
#[derive(Clone)]
pub struct InterruptibleDelay {
    interrupted: Arc<AtomicBool>,
}

impl InterruptibleDelay {
    pub fn new(interrupted: Arc<AtomicBool>) -> Self {
        InterruptibleDelay { interrupted }
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

impl Delay for InterruptibleDelay {
    fn sleep(&mut self, duration: Duration) -> Result<()> {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_interrupted() {
                return Err(EscError::Interrupted);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep(SLICE.min(deadline - now));
        }
    }
}

/// Installs a SIGINT/SIGTERM handler that raises the returned flag.
pub fn install_interrupt_handler() -> std::result::Result<Arc<AtomicBool>, ctrlc::Error> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        info!("interrupt received");
        flag.store(true, Ordering::SeqCst);
    })?;
    Ok(interrupted)
}

//! Ctrl-C handling for g.
//!
//! An [Interrupt] is a shared stop flag. `main` hooks it to SIGINT and SIGTERM, the
//! collector checks it before every directory and the layouts between sections. Once
//! set, the pass winds down, flushes what it already rendered and exits with
//! [crate::app::EXIT_INTERRUPTED]. A second signal terminates right away.

use signal_hook::consts::{SIGINT, SIGTERM};

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Interrupt::default()
    }

    /// Registers the flag for SIGINT and SIGTERM.
    pub fn install(&self) -> io::Result<()> {
        for signal in [SIGINT, SIGTERM] {
            // only armed once the flag is set, so the first signal is handled gracefully
            #[cfg(unix)]
            signal_hook::flag::register_conditional_shutdown(
                signal,
                crate::app::EXIT_INTERRUPTED.into(),
                Arc::clone(&self.flag),
            )?;
            signal_hook::flag::register(signal, Arc::clone(&self.flag))?;
        }
        Ok(())
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// ============================================================
// Layer 6 — Runtime Session
// ============================================================
// The job acquires one session at the top and releases it at the
// end. The session owns the compute device every Burn call runs
// on.
//
// Release happens exactly once:
//   - explicitly through `stop()` on the success path, or
//   - through Drop when an error unwinds the job early.

use std::time::{Duration, Instant};

use crate::ml::trainer::ComputeDevice;

pub struct Session {
    app_name: String,
    device:   ComputeDevice,
    started:  Instant,
    active:   bool,
}

/// What `stop()` reports back
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub app_name: String,
    pub uptime:   Duration,
}

impl Session {
    pub fn start(app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        let device   = ComputeDevice::default();
        tracing::info!("Session '{}' started on {:?}", app_name, device);
        Self { app_name, device, started: Instant::now(), active: true }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn device(&self) -> &ComputeDevice {
        &self.device
    }

    pub fn stop(mut self) -> SessionSummary {
        self.release();
        SessionSummary { app_name: self.app_name.clone(), uptime: self.started.elapsed() }
    }

    fn release(&mut self) {
        if self.active {
            self.active = false;
            tracing::info!(
                "Session '{}' stopped after {:.1?}",
                self.app_name,
                self.started.elapsed()
            );
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reports_name() {
        let session = Session::start("test-job");
        assert_eq!(session.app_name(), "test-job");
        let summary = session.stop();
        assert_eq!(summary.app_name, "test-job");
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut session = Session::start("twice");
        session.release();
        assert!(!session.active);
        session.release();
        assert!(!session.active);
        // Drop runs release a third time without effect
    }
}

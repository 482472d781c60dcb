//! Downstream delivery of accepted reports.

use multilane_types::{LaneId, ReportContext};
use parking_lot::Mutex;

/// Receives reports the router has accepted.
///
/// Calls happen after the router has released its own locks, so an
/// implementation may call back into the router.
pub trait ReportHandler: Send + Sync {
    /// Deliver an accepted report.
    ///
    /// `sequence_number` is set for signed submissions and `None` for
    /// unsigned ones.
    fn handle_report(
        &self,
        lane: LaneId,
        context: &ReportContext,
        report: &[u8],
        sequence_number: Option<u64>,
    );

    /// Called once per lane touched by a committed rotation.
    fn after_config_set(&self, _lane: LaneId) {}
}

/// Handler that drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl ReportHandler for NoopHandler {
    fn handle_report(&self, _: LaneId, _: &ReportContext, _: &[u8], _: Option<u64>) {}
}

/// A report as seen by [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredReport {
    pub lane: LaneId,
    pub context: ReportContext,
    pub report: Vec<u8>,
    pub sequence_number: Option<u64>,
}

/// Handler that keeps everything it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    reports: Mutex<Vec<DeliveredReport>>,
    configured: Mutex<Vec<LaneId>>,
}

impl RecordingHandler {
    /// Create a handler with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports delivered so far.
    pub fn reports(&self) -> Vec<DeliveredReport> {
        self.reports.lock().clone()
    }

    /// Lanes passed to `after_config_set`, in call order.
    pub fn configured_lanes(&self) -> Vec<LaneId> {
        self.configured.lock().clone()
    }
}

impl ReportHandler for RecordingHandler {
    fn handle_report(
        &self,
        lane: LaneId,
        context: &ReportContext,
        report: &[u8],
        sequence_number: Option<u64>,
    ) {
        self.reports.lock().push(DeliveredReport {
            lane,
            context: *context,
            report: report.to_vec(),
            sequence_number,
        });
    }

    fn after_config_set(&self, lane: LaneId) {
        self.configured.lock().push(lane);
    }
}

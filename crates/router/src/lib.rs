//! Multi-lane report transmission.
//!
//! [`TransmissionRouter`] is the public entry point of the engine. It owns the
//! per-lane configuration, keeps the active-lane selector and admits reports
//! on one of two paths:
//!
//! - **signed**: exactly `f + 1` distinct signer signatures over the report
//!   digest; the report is forwarded with a per-configuration sequence number
//! - **unsigned**: the caller must be a transmitter of a lane that does not
//!   verify signatures
//!
//! Every submission first passes the [`ReplayGuard`] fork check. Accepted
//! reports go to a [`ReportHandler`]; mutating operations return the
//! [`Notification`](multilane_types::Notification)s they produced.

mod config;
mod error;
mod handler;
mod ownership;
mod replay;
mod router;

pub use config::{PlanError, RotationPlan, RouterConfig};
pub use error::{RotationError, TransmitError};
pub use handler::{DeliveredReport, NoopHandler, RecordingHandler, ReportHandler};
pub use ownership::{Ownership, OwnershipError};
pub use replay::{ChainContext, ForkedChain, LocalChain, ReplayGuard};
pub use router::{TransmissionRouter, TYPE_AND_VERSION};

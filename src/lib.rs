//! # quic-recovery: QUIC Loss Detection and RTT Estimation
//!
//! The recovery core of a QUIC transport endpoint (RFC 9002): given local
//! *packet-sent* notifications and peer *ACK frames*, it decides which
//! outstanding packets are lost, arms a probe/retransmission timer, and
//! maintains the smoothed RTT and probe-timeout period.
//!
//! ## Architecture
//!
//! ```text
//! quic-recovery/
//! ├── types      - Packet numbers, spaces, levels, key phases, Instant
//! ├── error      - Connection-level error types
//! ├── clock      - Monotonic clock sources (system + manual)
//! ├── frames     - Pre-parsed ACK frame model
//! ├── config     - Recovery tuning knobs (serde)
//! ├── timer      - Recurring-tick scheduler (tokio + manual)
//! └── recovery   - LossDetector, RttMeasure, ACK expansion, sent tables
//! ```
//!
//! ## Design
//!
//! - **No wire-format work**: ACK frames arrive pre-parsed; packet
//!   descriptors arrive pre-built. The core is a pure in-memory state
//!   machine plus one timer.
//! - **Single mutex, atomic reads**: every operation runs under one
//!   per-connection mutex; outstanding counters and RTT estimates are
//!   atomics other tasks read without it.
//! - **Collaborators behind traits**: congestion control, frame
//!   regeneration, probe sending, and key availability are injected
//!   ([`recovery::traits`]), so the core is testable with recording mocks
//!   and reusable across endpoint implementations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let rtt = Arc::new(RttMeasure::new(&config));
//! let detector = LossDetector::new(
//!     &config, context, congestion, Arc::clone(&rtt),
//!     pinger, padder, scheduler, clock,
//! );
//!
//! detector.on_packet_sent(packet_info, true);
//! detector.handle_frame(EncryptionLevel::OneRtt, &Frame::Ack(ack))?;
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod frames;
pub mod recovery;
pub mod timer;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RecoveryConfig;
pub use error::{Error, Result};
pub use frames::{AckBlock, AckFrame, EcnCounts, Frame, FrameId};
pub use recovery::{
    CallbackEvent, CongestionController, ConnectionInfo, FrameGenerator, FrameRecord, KeyInfo,
    LossDetector, PacketInfo, Padder, Pinger, RecoveryContext, RttMeasure,
};
pub use timer::{ManualScheduler, Scheduler, TickHandle, TokioScheduler};
pub use types::{
    ConnectionId, Direction, EncryptionLevel, Instant, KeyPhase, PacketNumber, PacketNumberSpace,
    PacketType,
};

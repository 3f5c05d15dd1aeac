//! # Loss Detection and RTT Estimation (RFC 9002)
//!
//! The recovery subsystem behind reliable delivery: it decides which
//! outstanding packets are lost, when the probe/retransmission timer fires,
//! and what the current smoothed RTT and probe timeout are.
//!
//! Two tightly coupled pieces:
//!
//! 1. [`LossDetector`]: tracks in-flight packets per packet number space,
//!    interprets ACKs, drives the loss-detection timer, and triggers
//!    retransmission / PTO probes.
//! 2. [`RttMeasure`]: smoothed RTT, RTT variance, minimum RTT, and the
//!    PTO / crypto-retransmit durations derived from them.
//!
//! Congestion control, frame generation, probe sending, and key state stay
//! outside, behind the traits in [`traits`]: the detector reports events to
//! them and never owns their state.

pub mod ack_ranges;
pub mod detector;
pub mod rtt;
pub mod sent_packets;
pub mod traits;

pub use ack_ranges::{expand_ack_frame, PacketNumberRange};
pub use detector::LossDetector;
pub use rtt::RttMeasure;
pub use sent_packets::{FrameRecord, PacketInfo, SentPacketTable};
pub use traits::{
    CallbackEvent, CongestionController, ConnectionInfo, FrameGenerator, KeyInfo, Padder, Pinger,
    RecoveryContext,
};

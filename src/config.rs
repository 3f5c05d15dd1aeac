//! Recovery configuration.
//!
//! Loss-detection and RTT tuning knobs, deserializable from the embedding
//! server's configuration file. All defaults follow RFC 9002 Appendix A.

use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Loss-detection and RTT-estimation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Reorder tolerance in packets: a tracked packet is declared lost once
    /// a packet sent this many packet numbers after it is acknowledged.
    ///
    /// **Default:** `3` (RFC 9002 Section 6.1.1)
    pub packet_threshold: u32,

    /// Multiplier applied to `max(latest_rtt, smoothed_rtt)` to form the
    /// time-threshold loss delay.
    ///
    /// **Default:** `1.125` (9/8 per RFC 9002 Section 6.1.2)
    pub time_threshold: f64,

    /// Floor for derived timeouts, in milliseconds.
    ///
    /// **Default:** `1`
    pub granularity_ms: u64,

    /// RTT assumed before the first sample is observed, in milliseconds.
    ///
    /// **Default:** `333` (RFC 9002 Section 6.2.2)
    pub initial_rtt_ms: u64,

    /// Peer-advertised bound on intentional ACK delay, in milliseconds.
    /// Updated from the peer's transport parameters once known.
    ///
    /// **Default:** `25`
    pub max_ack_delay_ms: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            packet_threshold: 3,
            time_threshold: 9.0 / 8.0,
            granularity_ms: 1,
            initial_rtt_ms: 333,
            max_ack_delay_ms: 25,
        }
    }
}

impl RecoveryConfig {
    pub fn granularity(&self) -> Duration {
        Duration::from_millis(self.granularity_ms)
    }

    pub fn initial_rtt(&self) -> Duration {
        Duration::from_millis(self.initial_rtt_ms)
    }

    pub fn max_ack_delay(&self) -> Duration {
        Duration::from_millis(self.max_ack_delay_ms)
    }

    /// Validate recovery configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.time_threshold <= 0.0 || !self.time_threshold.is_finite() {
            errors.push(format!(
                "time_threshold must be a positive finite number, got {}",
                self.time_threshold
            ));
        }

        if self.initial_rtt_ms == 0 {
            errors.push("initial_rtt_ms must be greater than zero".to_string());
        }

        if self.granularity_ms == 0 {
            errors.push("granularity_ms must be greater than zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

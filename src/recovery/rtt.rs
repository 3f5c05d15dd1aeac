//! # RTT Estimation (RFC 9002 Section 5)
//!
//! Maintains latest/smoothed/minimum RTT and RTT variance, and derives the
//! probe-timeout and handshake-retransmit periods from them.

use crate::config::RecoveryConfig;
use core::time::Duration;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// RTT estimator shared between the loss detector and the rest of the
/// connection.
///
/// Samples are stored as integer nanoseconds in atomic cells so that other
/// tasks (congestion controller, stream senders, metrics) can read current
/// estimates without taking the loss-detection mutex. Writers (`update_rtt`,
/// the count setters, `reset`, `init`) are only ever called with that mutex
/// held, which serializes the read-modify-write sequences.
///
/// A zero `smoothed_rtt` means "no sample observed yet".
#[derive(Debug)]
pub struct RttMeasure {
    latest_rtt: AtomicU64,
    smoothed_rtt: AtomicU64,
    rttvar: AtomicU64,
    min_rtt: AtomicU64,
    max_ack_delay: AtomicU64,
    k_granularity: AtomicU64,
    k_initial_rtt: AtomicU64,
    crypto_count: AtomicU32,
    pto_count: AtomicU32,
}

impl RttMeasure {
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            latest_rtt: AtomicU64::new(0),
            smoothed_rtt: AtomicU64::new(0),
            rttvar: AtomicU64::new(0),
            min_rtt: AtomicU64::new(0),
            max_ack_delay: AtomicU64::new(config.max_ack_delay().as_nanos() as u64),
            k_granularity: AtomicU64::new(config.granularity().as_nanos() as u64),
            k_initial_rtt: AtomicU64::new(config.initial_rtt().as_nanos() as u64),
            crypto_count: AtomicU32::new(0),
            pto_count: AtomicU32::new(0),
        }
    }

    /// Re-apply timeout constants from a config.
    pub fn init(&self, config: &RecoveryConfig) {
        self.k_granularity
            .store(config.granularity().as_nanos() as u64, Ordering::Relaxed);
        self.k_initial_rtt
            .store(config.initial_rtt().as_nanos() as u64, Ordering::Relaxed);
    }

    /// Fold a new RTT sample into the estimates (RFC 9002 Section 5.3,
    /// smoothing per RFC 6298).
    ///
    /// `ack_delay` is the peer's ACK Delay already scaled by its
    /// ack_delay_exponent.
    pub fn update_rtt(&self, latest_rtt: Duration, ack_delay: Duration) {
        let latest = latest_rtt.as_nanos() as u64;
        self.latest_rtt.store(latest, Ordering::Relaxed);

        let smoothed = self.smoothed_rtt.load(Ordering::Relaxed);
        if smoothed == 0 {
            // First sample.
            self.min_rtt.store(0, Ordering::Relaxed);
            self.smoothed_rtt.store(latest, Ordering::Relaxed);
            self.rttvar.store(latest / 2, Ordering::Relaxed);
            return;
        }

        // min_rtt ignores ack delay.
        let min_rtt = self.min_rtt.load(Ordering::Relaxed).min(latest);
        self.min_rtt.store(min_rtt, Ordering::Relaxed);

        // Limit ack_delay by max_ack_delay, then adjust only if plausible.
        let ack_delay =
            (ack_delay.as_nanos() as u64).min(self.max_ack_delay.load(Ordering::Relaxed));
        let mut adjusted_rtt = latest;
        if adjusted_rtt > min_rtt + ack_delay {
            adjusted_rtt -= ack_delay;
        }

        let rttvar = self.rttvar.load(Ordering::Relaxed);
        let deviation = smoothed.abs_diff(adjusted_rtt);
        self.rttvar.store(
            (3.0 / 4.0 * rttvar as f64 + 1.0 / 4.0 * deviation as f64) as u64,
            Ordering::Relaxed,
        );
        self.smoothed_rtt.store(
            (7.0 / 8.0 * smoothed as f64 + 1.0 / 8.0 * adjusted_rtt as f64) as u64,
            Ordering::Relaxed,
        );
    }

    /// Probe timeout with exponential backoff applied
    /// (RFC 9002 Section 6.2.1).
    pub fn current_pto_period(&self) -> Duration {
        let base = self.smoothed_rtt() + 4 * self.rttvar() + self.max_ack_delay();
        let backoff = 2u32.saturating_pow(self.pto_count());
        base.max(self.granularity()) * backoff
    }

    /// Crypto retransmission timeout with exponential backoff applied.
    ///
    /// Before any sample, twice the configured initial RTT stands in for
    /// twice the smoothed RTT.
    pub fn handshake_retransmit_timeout(&self) -> Duration {
        let smoothed = self.smoothed_rtt();
        let base = if smoothed.is_zero() {
            2 * self.initial_rtt()
        } else {
            2 * smoothed
        };
        let backoff = 2u32.saturating_pow(self.crypto_count());
        base.max(self.granularity()) * backoff
    }

    /// Persistent-congestion window: `threshold` PTO periods without
    /// backoff (RFC 9002 Section 7.6.1).
    pub fn congestion_period(&self, threshold: u32) -> Duration {
        (self.smoothed_rtt() + (4 * self.rttvar()).max(self.granularity())) * threshold
    }

    pub fn latest_rtt(&self) -> Duration {
        Duration::from_nanos(self.latest_rtt.load(Ordering::Relaxed))
    }

    pub fn smoothed_rtt(&self) -> Duration {
        Duration::from_nanos(self.smoothed_rtt.load(Ordering::Relaxed))
    }

    pub fn rttvar(&self) -> Duration {
        Duration::from_nanos(self.rttvar.load(Ordering::Relaxed))
    }

    pub fn min_rtt(&self) -> Duration {
        Duration::from_nanos(self.min_rtt.load(Ordering::Relaxed))
    }

    pub fn max_ack_delay(&self) -> Duration {
        Duration::from_nanos(self.max_ack_delay.load(Ordering::Relaxed))
    }

    /// Update the peer-advertised max_ack_delay from transport parameters.
    pub fn set_max_ack_delay(&self, delay: Duration) {
        self.max_ack_delay
            .store(delay.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn granularity(&self) -> Duration {
        Duration::from_nanos(self.k_granularity.load(Ordering::Relaxed))
    }

    fn initial_rtt(&self) -> Duration {
        Duration::from_nanos(self.k_initial_rtt.load(Ordering::Relaxed))
    }

    pub fn crypto_count(&self) -> u32 {
        self.crypto_count.load(Ordering::Relaxed)
    }

    pub fn set_crypto_count(&self, count: u32) {
        self.crypto_count.store(count, Ordering::Relaxed);
    }

    pub fn pto_count(&self) -> u32 {
        self.pto_count.load(Ordering::Relaxed)
    }

    pub fn set_pto_count(&self, count: u32) {
        self.pto_count.store(count, Ordering::Relaxed);
    }

    /// Discard all samples and backoff counts.
    pub fn reset(&self) {
        self.latest_rtt.store(0, Ordering::Relaxed);
        self.smoothed_rtt.store(0, Ordering::Relaxed);
        self.rttvar.store(0, Ordering::Relaxed);
        self.min_rtt.store(0, Ordering::Relaxed);
        self.crypto_count.store(0, Ordering::Relaxed);
        self.pto_count.store(0, Ordering::Relaxed);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

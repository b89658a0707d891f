//! # Evidence Metrics
//!
//! Prometheus counters for evidence intake and punishment.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-18-evidence = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `evidence_submitted_total` - Counter of accepted submissions
//! - `evidence_rejected_total` - Counter of rejected submissions (by reason)
//! - `evidence_ignored_total` - Counter of evidence dropped without punishment (by reason)
//! - `evidence_equivocations_punished_total` - Counter of validators slashed, jailed and tombstoned
//! - `evidence_begin_block_reports_total` - Counter of consensus reports received (by type)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total accepted submissions
    pub static ref EVIDENCE_SUBMITTED: IntCounter = register_int_counter!(
        "evidence_submitted_total",
        "Total number of evidence submissions accepted"
    )
    .expect("Failed to create EVIDENCE_SUBMITTED metric");

    /// Total rejected submissions, labeled by reason
    pub static ref EVIDENCE_REJECTED: IntCounterVec = register_int_counter_vec!(
        "evidence_rejected_total",
        "Total number of evidence submissions rejected",
        &["reason"]
    )
    .expect("Failed to create EVIDENCE_REJECTED metric");

    /// Total evidence dropped without punishment, labeled by reason
    pub static ref EVIDENCE_IGNORED: IntCounterVec = register_int_counter_vec!(
        "evidence_ignored_total",
        "Total number of evidence records ignored by the equivocation handler",
        &["reason"]
    )
    .expect("Failed to create EVIDENCE_IGNORED metric");

    /// Total validators punished for equivocation
    pub static ref EQUIVOCATIONS_PUNISHED: IntCounter = register_int_counter!(
        "evidence_equivocations_punished_total",
        "Total number of validators slashed, jailed and tombstoned for equivocation"
    )
    .expect("Failed to create EQUIVOCATIONS_PUNISHED metric");

    /// Total consensus misbehavior reports, labeled by type
    pub static ref BEGIN_BLOCK_REPORTS: IntCounterVec = register_int_counter_vec!(
        "evidence_begin_block_reports_total",
        "Total number of misbehavior reports received at begin-block",
        &["type"]
    )
    .expect("Failed to create BEGIN_BLOCK_REPORTS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record an accepted submission
#[cfg(feature = "metrics")]
pub fn record_evidence_submitted() {
    EVIDENCE_SUBMITTED.inc();
}

/// Record a rejected submission with reason
#[cfg(feature = "metrics")]
pub fn record_evidence_rejected(reason: &str) {
    EVIDENCE_REJECTED.with_label_values(&[reason]).inc();
}

/// Record evidence dropped by the handler with reason
#[cfg(feature = "metrics")]
pub fn record_evidence_ignored(reason: &str) {
    EVIDENCE_IGNORED.with_label_values(&[reason]).inc();
}

/// Record a punished equivocation
#[cfg(feature = "metrics")]
pub fn record_equivocation_punished() {
    EQUIVOCATIONS_PUNISHED.inc();
}

/// Record a begin-block report by type
#[cfg(feature = "metrics")]
pub fn record_begin_block_report(report_type: &str) {
    BEGIN_BLOCK_REPORTS.with_label_values(&[report_type]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_evidence_submitted() {}

#[cfg(not(feature = "metrics"))]
pub fn record_evidence_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_evidence_ignored(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_equivocation_punished() {}

#[cfg(not(feature = "metrics"))]
pub fn record_begin_block_report(_report_type: &str) {}

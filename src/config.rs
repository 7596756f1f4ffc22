/// Engine constants.

/// Quantity tolerance applied when the credit does not state one
/// (UCP 600 Art. 30(b) analogue).
pub const DEFAULT_QUANTITY_TOLERANCE_PCT: f64 = 5.0;

/// Minimum insurance coverage as a percentage of the reference amount
/// (UCP 600 Art. 28(f)(ii) analogue).
pub const MIN_INSURANCE_COVERAGE_PCT: f64 = 110.0;

/// Packing-list net-weight reconciliation tolerance, absolute.
pub const PACKING_WEIGHT_TOLERANCE_KG: f64 = 1.0;

/// Ullage volume reconciliation tolerance, relative to the printed total.
pub const ULLAGE_VOLUME_TOLERANCE_PCT: f64 = 0.1;

/// Invoice total reconciliation tolerance: the larger of $1 absolute and
/// 0.01% of the printed total.
pub const INVOICE_TOTAL_TOLERANCE_ABS: f64 = 1.0;
pub const INVOICE_TOTAL_TOLERANCE_PCT: f64 = 0.01;

/// Supporting certificates may be dated at most this many days after the
/// bill of lading.
pub const MAX_CERT_DAYS_AFTER_BL: i64 = 1;

/// Bounded concurrency for extraction collaborator calls.
pub const MAX_CONCURRENT_EXTRACTIONS: usize = 5;

/// Bounded concurrency for goods-comparator calls.
pub const MAX_CONCURRENT_COMPARISONS: usize = 3;

/// Per-call timeout for the goods comparator. Seconds, not minutes: the
/// validation stage is pure computation plus short-lived network calls.
pub const COMPARATOR_TIMEOUT_SECS: u64 = 20;

//! Shared primitive types used across the reconciliation engine.

/// A certificate sequence number. At most 10 decimal digits.
pub type Seq = u64;

/// A count of certificates. One certificate = one MWh.
/// Signed: a row whose end precedes its start carries a negative volume.
pub type Volume = i64;

/// The company recorded as owning a certificate range.
pub type Holder = String;

/// Grouping key: `station_period_certType`.
pub type CohortKey = String;

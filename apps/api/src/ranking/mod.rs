// Candidate ranking: skill normalization, match scoring and per-job aggregation.
// Everything except the handlers is pure and works on in-memory snapshots.

pub mod aggregator;
pub mod handlers;
pub mod normalizer;
pub mod scorer;

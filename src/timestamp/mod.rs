//! Timestamp marker parsing and cross-chunk reconciliation.

pub mod parser;
pub mod reconciler;

pub use parser::{Marker, MarkerEvent, scan_markers};
pub use reconciler::{ReconciledChunk, ReconciliationState, Reconciler};

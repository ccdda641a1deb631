//! Command processors
//!
//! One module per command kind. Each processor owns the full pass for its
//! command: intake validation, matching, residual disposal, and report
//! assembly.

pub mod cancel;
pub mod multi;
pub mod single;

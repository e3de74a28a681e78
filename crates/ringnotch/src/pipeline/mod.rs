//! Detection pipeline glue.
//!
//! filter → binarize → extract → radius band → membership → variance gate.
//! Algorithmic stages live in `crate::filter` and `crate::signal`; this layer
//! owns call order and the pairing of per-candidate decisions.

mod preprocess;
mod result;
mod run;

pub use result::{CandidateRecord, DetectionResult};

pub(crate) use run::run;

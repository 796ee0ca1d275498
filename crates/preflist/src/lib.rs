//! Core engine for the MHTCET preference-list generator.
//!
//! The pipeline is load -> filter -> score -> rank: the cutoff dataset is
//! re-read per request, narrowed by the caller's criteria and rank window,
//! annotated with an admission-probability heuristic, and returned as an
//! ordered preference list with a histogram summary. HTTP and CLI surfaces
//! live in the `preflist-api` service crate.

pub mod config;
pub mod error;
pub mod predictor;
pub mod telemetry;

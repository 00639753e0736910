//! kubeoptic
//!
//! Terminal dashboard for browsing a cluster's contexts, namespaces and
//! workloads, and for tailing and searching a workload's live log stream.
//!
//! Pure Core / Impure Shell:
//! - [`state`] and [`model`] hold all UI state and its transitions, no I/O
//! - [`bus`] carries messages in and runs deferred commands off the update thread
//! - [`source`] talks to the cluster (`kubectl`, or the in-memory demo cluster)
//! - [`view`] owns the terminal and renders state

pub mod bus;
pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;

//! Qprof activation core
//!
//! Computes which rules are active inside a hierarchy of quality profiles
//! and, for every active rule, the effective severity and parameter values
//! after applying the cascading override model:
//!
//! - **ContextBuilder** assembles an immutable snapshot of everything one
//!   (rule, profile) resolution needs.
//! - **resolver** computes the local activation result: effective severity,
//!   effective parameters, inheritance classification.
//! - **PropagationEngine** walks the child subtree breadth-first and
//!   re-resolves every descendant against its own, already-finalized parent.
//! - **RuleActivator** is the entry point: `activate` / `deactivate` return
//!   the complete `ChangeSet` for one request, applied all-or-nothing.
//!
//! The algorithms here are pure and CPU-bound; all I/O lives behind the
//! `qprof-registry` traits. Concurrent requests touching the same rule in
//! overlapping subtrees must be serialized by the caller.

#![deny(unsafe_code)]

pub mod context;
pub mod error;
pub mod projection;
pub mod propagation;
pub mod resolver;
pub mod service;

// Re-exports
pub use context::{ActivationContext, ContextBuilder};
pub use error::{ActivationError, Result};
pub use projection::{profile_view, ActiveRuleView};
pub use propagation::{PropagationEngine, DEFAULT_MAX_DEPTH};
pub use resolver::{resolve, ActivationRequest, ResolvedActivation};
pub use service::RuleActivator;

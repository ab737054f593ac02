//! Golden Path domain types
//!
//! A Golden Path is the ideal, ordered flow through one business workflow
//! (a property listing, a financing request, a pet customer lifecycle).
//! Each step is gated by boolean **preconditions** and finished by boolean
//! **completion criteria**, both read from a [`FlagContext`] derived from
//! live domain state.
//!
//! # Key Concepts
//!
//! - **FlagContext**: a snapshot of named boolean facts about one workflow
//!   instance. A missing flag is `false`.
//! - **GoldenPathDefinition**: the static, declarative description of a
//!   workflow, registered once at startup.
//! - **Step**: one route, action, message wait, or system step with its
//!   preconditions, completion criteria, contract references, and
//!   fail-state handlers.
//! - **ContractRef**: a cross-zone data dependency. Every hand-off is routed
//!   through the Zone 1 hub.
//! - **StepEvaluation**: the derived, never-persisted verdict for one step.

#![deny(unsafe_code)]

mod context;
mod contract;
mod definition;
mod errors;
mod evaluation;
mod step;

pub use context::*;
pub use contract::*;
pub use definition::*;
pub use errors::*;
pub use evaluation::*;
pub use step::*;

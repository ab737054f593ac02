//! Golden Path Evaluation Engine
//!
//! The engine decides, it never acts. Given a definition and a freshly
//! resolved flag context it computes per-step verdicts, route and action
//! guard decisions, and the next actionable step. Actual state transitions
//! happen elsewhere and show up on the next resolver read.
//!
//! # Architecture
//!
//! - [`DefinitionRegistry`]: validated, immutable definitions keyed by module code
//! - [`GoldenPathEvaluator`]: pure, synchronous evaluation
//! - [`ContextCache`]: time-based read-through cache of resolved contexts
//! - [`RouteGuard`]: render/redirect and allow/block adapter for the UI layer
//! - [`GoldenPathHook`]: reactive, identity-scoped snapshots on a watch channel
//!
//! # Example
//!
//! ```rust
//! use golden_path_engine::GoldenPathEvaluator;
//! use golden_path_types::{FlagContext, GoldenPathDefinition, RouteDecision, Step};
//!
//! let def = GoldenPathDefinition::new("MOD-04")
//!     .with_step(Step::route("portfolio", "/portal/immobilien/portfolio"))
//!     .unwrap()
//!     .with_step(
//!         Step::route("dossier", "/portal/immobilien/:id")
//!             .requires("property_exists", "Property must exist"),
//!     )
//!     .unwrap();
//!
//! let evaluator = GoldenPathEvaluator::default();
//! let decision = evaluator.can_enter_route(&def, "/portal/immobilien/:id", &FlagContext::new());
//!
//! assert_eq!(
//!     decision,
//!     RouteDecision::Redirect {
//!         target: "/portal/immobilien/portfolio".into(),
//!         reason: "Property must exist".into(),
//!     }
//! );
//! ```

#![deny(unsafe_code)]

pub mod cache;
pub mod config;
pub mod definition_registry;
pub mod evaluator;
pub mod guard;
pub mod hook;

pub use cache::{CacheKey, ContextCache};
pub use config::EngineConfig;
pub use definition_registry::DefinitionRegistry;
pub use evaluator::GoldenPathEvaluator;
pub use guard::{ActionOutcome, GuardOutcome, GuardRequest, RouteGuard, AUTHENTICATED_FLAG};
pub use hook::{GoldenPathHook, GoldenPathSnapshot, SnapshotReceiver, StepStatus};

//! Golden Path Consistency Validator
//!
//! A startup-time linter for registered definitions. It reads the
//! definitions, the static route manifest, and the ledger-event whitelist,
//! and reports diagnostics. It has no runtime effect: it never halts the
//! process and never touches a definition.
//!
//! # Checks
//!
//! 1. **Route existence**: every step route is in the manifest (error)
//! 2. **Guard registration**: routed definitions have a guard binding (warning)
//! 3. **Ledger whitelist**: declared ledger events are whitelisted (error)
//! 4. **Contract direction**: contracts route through the hub (error) and
//!    declare correlation keys (warning)
//! 5. **Fail-state completeness**: cross-zone and message-wait steps declare
//!    `on_timeout` and `on_error`, with whitelisted ledger events (error)

#![deny(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod manifest;
pub mod validator;

pub use config::ValidatorConfig;
pub use diagnostics::{Check, Diagnostic, Severity, ValidationReport};
pub use manifest::{
    join_route, normalize_route, GuardBinding, ManifestError, ManifestResult, ModuleRoutes,
    RouteManifest,
};
pub use validator::{run_startup_audit, ConsistencyValidator, ALLOWED_DIRECTIONS};

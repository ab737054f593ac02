//! Context Resolver Registry for Golden Paths
//!
//! A resolver turns `(tenant, entity)` into the complete [`FlagMap`] of one
//! module by reading the domain store. Resolvers are read-only and total:
//! an ordinary absence of data, or a failed lookup, becomes a `false` flag,
//! never an error.
//!
//! # Architecture
//!
//! - [`ContextResolver`]: the async per-module flag computation
//! - [`ResolverRegistry`]: module code → resolver, built at startup and
//!   injected into guard adapters
//! - [`DomainStore`]: the read-only port resolvers query
//! - [`FlagSet`]: default-false flag folding for resolver implementations
//!
//! [`FlagMap`]: golden_path_types::FlagMap

#![deny(unsafe_code)]

pub mod flags;
pub mod memory;
pub mod registry;
pub mod resolver;
pub mod store;

pub use flags::{all_equal, FlagSet};
pub use memory::InMemoryDomainStore;
pub use registry::{Resolution, ResolutionDiagnostic, ResolverRegistry};
pub use resolver::{resolver_fn, ContextResolver, FnResolver};
pub use store::{Condition, DomainStore, RecordFilter, StoreError, StoreResult};

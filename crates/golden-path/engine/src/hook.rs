//! Reactive Golden Path view for one workflow instance
//!
//! A [`GoldenPathHook`] tracks the identity currently on screen, re-resolves
//! its context through the [`ContextCache`](crate::ContextCache), and
//! publishes a [`GoldenPathSnapshot`] on a watch channel.
//!
//! Changing the identity bumps a generation counter. A refresh that started
//! under an older generation is discarded when it settles, so a slow
//! resolution for the previous entity never overwrites the current one.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use golden_path_resolvers::ResolutionDiagnostic;
use golden_path_types::{
    FlagContext, GoldenPathDefinition, ModuleCode, StepEvaluation, StepId, StepType,
};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::evaluator::GoldenPathEvaluator;
use crate::guard::{GuardRequest, RouteGuard};

// ── Snapshot ─────────────────────────────────────────────────────────

/// Owned verdict for one step
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepStatus {
    pub step_id: StepId,
    pub label: String,
    pub step_type: StepType,
    pub can_enter: bool,
    pub is_complete: bool,
    /// Keys of unmet preconditions
    pub failed_preconditions: Vec<String>,
    /// Keys of unmet completion criteria
    pub failed_completions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
}

impl From<&StepEvaluation<'_>> for StepStatus {
    fn from(evaluation: &StepEvaluation<'_>) -> Self {
        Self {
            step_id: evaluation.step.id.clone(),
            label: evaluation.step.label.clone(),
            step_type: evaluation.step.step_type,
            can_enter: evaluation.can_enter,
            is_complete: evaluation.is_complete,
            failed_preconditions: evaluation
                .failed_preconditions
                .iter()
                .map(|p| p.key.clone())
                .collect(),
            failed_completions: evaluation
                .failed_completions
                .iter()
                .map(|c| c.key.clone())
                .collect(),
            blocked_reason: (!evaluation.can_enter).then(|| evaluation.blocked_reason()),
        }
    }
}

/// Everything a view needs about one workflow instance
#[derive(Clone, Debug, Serialize)]
pub struct GoldenPathSnapshot {
    pub module_code: ModuleCode,
    pub steps: Vec<StepStatus>,
    pub next_step: Option<StepId>,
    pub is_completed: bool,
    pub context: FlagContext,
    /// Set when the context came from a module without a resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<ResolutionDiagnostic>,
    pub generation: u64,
    pub resolved_at: DateTime<Utc>,
}

impl GoldenPathSnapshot {
    pub fn evaluate(
        evaluator: &GoldenPathEvaluator,
        def: &GoldenPathDefinition,
        context: FlagContext,
    ) -> Self {
        let steps = evaluator
            .evaluate_golden_path(def, &context)
            .iter()
            .map(StepStatus::from)
            .collect();

        Self {
            module_code: def.module_code.clone(),
            steps,
            next_step: evaluator.next_step(def, &context).map(|s| s.id.clone()),
            is_completed: evaluator.is_completed(def, &context),
            context,
            diagnostic: None,
            generation: 0,
            resolved_at: Utc::now(),
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: Option<ResolutionDiagnostic>) -> Self {
        self.diagnostic = diagnostic;
        self
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn step(&self, id: &str) -> Option<&StepStatus> {
        self.steps.iter().find(|s| s.step_id.as_str() == id)
    }
}

// ── Hook ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Identity {
    generation: u64,
    request: GuardRequest,
}

/// Handle on the latest published snapshot
pub type SnapshotReceiver = watch::Receiver<Option<Arc<GoldenPathSnapshot>>>;

/// Reactive, identity-scoped Golden Path view
#[derive(Debug)]
pub struct GoldenPathHook {
    guard: RouteGuard,
    identity: watch::Sender<Identity>,
    snapshots: watch::Sender<Option<Arc<GoldenPathSnapshot>>>,
}

impl GoldenPathHook {
    pub fn new(guard: RouteGuard, request: GuardRequest) -> Self {
        let (identity, _) = watch::channel(Identity {
            generation: 0,
            request,
        });
        let (snapshots, _) = watch::channel(None);
        Self {
            guard,
            identity,
            snapshots,
        }
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.subscribe()
    }

    /// Latest published snapshot
    pub fn current(&self) -> Option<Arc<GoldenPathSnapshot>> {
        self.snapshots.borrow().clone()
    }

    pub fn generation(&self) -> u64 {
        self.identity.borrow().generation
    }

    pub fn request(&self) -> GuardRequest {
        self.identity.borrow().request.clone()
    }

    /// Switch to another workflow instance. In-flight refreshes become stale.
    pub fn set_identity(&self, request: GuardRequest) -> u64 {
        let mut generation = 0;
        self.identity.send_modify(|identity| {
            identity.generation += 1;
            identity.request = request;
            generation = identity.generation;
        });
        self.snapshots.send_replace(None);
        tracing::debug!(generation, "Golden path identity changed");
        generation
    }

    /// Re-resolve and publish. Returns `None` when the module has no
    /// definition or the identity changed while resolving.
    pub async fn refresh(&self) -> Option<Arc<GoldenPathSnapshot>> {
        let Identity {
            generation,
            request,
        } = self.identity.borrow().clone();

        let Some(def) = self.guard.definitions().find(&request.module_code) else {
            tracing::warn!(module_code = %request.module_code, "No golden path registered");
            return None;
        };

        let resolution = self.guard.resolve(&request).await;
        let snapshot = Arc::new(
            GoldenPathSnapshot::evaluate(self.guard.evaluator(), &def, resolution.context)
                .with_diagnostic(resolution.diagnostic)
                .with_generation(generation),
        );

        // Held across the publish so set_identity cannot interleave.
        let identity = self.identity.borrow();
        if identity.generation != generation {
            tracing::debug!(
                module_code = %request.module_code,
                stale = generation,
                current = identity.generation,
                "Discarding stale golden path snapshot"
            );
            return None;
        }
        self.snapshots.send_replace(Some(snapshot.clone()));
        drop(identity);

        Some(snapshot)
    }

    /// Drop the cached context of the current identity and refresh
    pub async fn invalidate(&self) -> Option<Arc<GoldenPathSnapshot>> {
        self.guard.cache().invalidate(&self.request().cache_key());
        self.refresh().await
    }

    /// Refresh on a fixed schedule until the returned handle is aborted
    pub fn spawn_polling(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.refresh().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ContextCache;
    use crate::definition_registry::DefinitionRegistry;
    use golden_path_resolvers::{resolver_fn, ResolverRegistry};
    use golden_path_types::{FlagMap, Step, SuccessState};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn definitions() -> Arc<DefinitionRegistry> {
        let mut registry = DefinitionRegistry::new();
        registry
            .register(
                GoldenPathDefinition::new("MOD-04")
                    .with_step(
                        Step::action("create_property")
                            .at_route("/portal/immobilien/portfolio")
                            .completes_when("property_exists", "Property created"),
                    )
                    .unwrap()
                    .with_step(
                        Step::route("edit_dossier", "/portal/immobilien/:id")
                            .requires("property_exists", "Property must exist"),
                    )
                    .unwrap()
                    .with_success_state(SuccessState::new(["property_exists"])),
            )
            .unwrap();
        Arc::new(registry)
    }

    fn make_guard(resolvers: ResolverRegistry) -> RouteGuard {
        RouteGuard::new(
            definitions(),
            ContextCache::new(Arc::new(resolvers), Duration::from_secs(30)),
            GoldenPathEvaluator::default(),
        )
    }

    fn by_entity() -> ResolverRegistry {
        let mut resolvers = ResolverRegistry::new();
        resolvers
            .register(
                "MOD-04",
                resolver_fn(|_, entity| async move {
                    let mut flags = FlagMap::new();
                    flags.insert("property_exists".into(), entity.is_some());
                    flags
                }),
            )
            .unwrap();
        resolvers
    }

    #[tokio::test]
    async fn test_refresh_publishes_snapshot() {
        let hook = GoldenPathHook::new(make_guard(by_entity()), GuardRequest::new("MOD-04"));
        let mut rx = hook.subscribe();

        let snapshot = hook.refresh().await.unwrap();
        assert_eq!(snapshot.next_step, Some(StepId::new("create_property")));
        assert!(!snapshot.is_completed);
        assert_eq!(
            snapshot.step("edit_dossier").unwrap().blocked_reason.as_deref(),
            Some("Property must exist")
        );

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_some());
    }

    #[tokio::test]
    async fn test_snapshot_reports_missing_resolver() {
        let hook = GoldenPathHook::new(
            make_guard(ResolverRegistry::new()),
            GuardRequest::new("MOD-04").with_entity("p-1"),
        );

        let snapshot = hook.refresh().await.unwrap();
        assert_eq!(
            snapshot.diagnostic,
            Some(ResolutionDiagnostic::ResolverMissing {
                module_code: ModuleCode::new("MOD-04")
            })
        );
        assert!(!snapshot.step("edit_dossier").unwrap().can_enter);

        let hook = GoldenPathHook::new(make_guard(by_entity()), GuardRequest::new("MOD-04"));
        assert!(hook.refresh().await.unwrap().diagnostic.is_none());
    }

    #[tokio::test]
    async fn test_identity_change_resets_snapshot() {
        let hook = GoldenPathHook::new(make_guard(by_entity()), GuardRequest::new("MOD-04"));
        hook.refresh().await.unwrap();

        let generation = hook.set_identity(GuardRequest::new("MOD-04").with_entity("p-1"));
        assert_eq!(generation, 1);
        assert!(hook.current().is_none());

        let snapshot = hook.refresh().await.unwrap();
        assert_eq!(snapshot.generation, 1);
        assert!(snapshot.is_completed);
        assert_eq!(snapshot.next_step, Some(StepId::new("edit_dossier")));
    }

    #[tokio::test]
    async fn test_stale_refresh_is_discarded() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());

        let mut resolvers = ResolverRegistry::new();
        let (s, r) = (started.clone(), release.clone());
        resolvers
            .register(
                "MOD-04",
                resolver_fn(move |_, _| {
                    let (started, release) = (s.clone(), r.clone());
                    async move {
                        started.notify_one();
                        release.notified().await;
                        FlagMap::new()
                    }
                }),
            )
            .unwrap();

        let hook = Arc::new(GoldenPathHook::new(
            make_guard(resolvers),
            GuardRequest::new("MOD-04").with_entity("p-1"),
        ));

        let pending = {
            let hook = hook.clone();
            tokio::spawn(async move { hook.refresh().await })
        };

        started.notified().await;
        hook.set_identity(GuardRequest::new("MOD-04").with_entity("p-2"));
        release.notify_one();

        assert!(pending.await.unwrap().is_none());
        assert!(hook.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_refreshes_after_staleness() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut resolvers = ResolverRegistry::new();
        let counter = calls.clone();
        resolvers
            .register(
                "MOD-04",
                resolver_fn(move |_, _| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        FlagMap::new()
                    }
                }),
            )
            .unwrap();

        let hook = Arc::new(GoldenPathHook::new(
            make_guard(resolvers),
            GuardRequest::new("MOD-04"),
        ));
        let mut rx = hook.subscribe();
        let handle = hook.clone().spawn_polling(Duration::from_secs(10));

        rx.changed().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Ticks inside the 30s window reuse the cached context
        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        handle.abort();
    }
}

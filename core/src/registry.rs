//! Planner registry
//!
//! Planners are loaded once per process from a `PlannerDiscovery` source and
//! kept, initialized, for the lifetime of the registry. Loading is
//! best-effort: a planner that fails to build or initialize is logged and
//! left out, and the rest still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::request::MotionPlanRequest;
use crate::traits::{DiscoveryError, Planner, PlannerDiscovery, PlannerError};
use crate::trajectory::KinematicModel;

/// Factory that builds one planner instance
pub type PlannerFactory = Box<dyn Fn() -> Result<Box<dyn Planner>, PlannerError> + Send + Sync>;

/// Discovery source backed by an explicit list of factories
#[derive(Default)]
pub struct StaticDiscovery {
    factories: BTreeMap<String, PlannerFactory>,
}

impl StaticDiscovery {
    /// Create an empty discovery source
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a planner under `id`
    pub fn register<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Planner>, PlannerError> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Box::new(factory));
        self
    }

    /// Number of declared planners
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if nothing is declared
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl PlannerDiscovery for StaticDiscovery {
    fn declared_planners(&self) -> Result<Vec<String>, DiscoveryError> {
        Ok(self.factories.keys().cloned().collect())
    }

    fn create_instance(&self, id: &str) -> Result<Box<dyn Planner>, DiscoveryError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| DiscoveryError::NotDeclared(id.to_string()))?;

        factory().map_err(|e| DiscoveryError::Instantiation {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Debug for StaticDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticDiscovery")
            .field("planners", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An initialized planner owned by the registry
pub struct PlannerHandle {
    id: String,
    planner: Box<dyn Planner>,
}

impl PlannerHandle {
    /// Wrap an initialized planner
    pub fn new(id: impl Into<String>, planner: Box<dyn Planner>) -> Self {
        Self {
            id: id.into(),
            planner,
        }
    }

    /// Registry id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The planner itself
    pub fn planner(&self) -> &dyn Planner {
        self.planner.as_ref()
    }

    /// Planner description
    pub fn description(&self) -> &str {
        self.planner.description()
    }

    /// Capability probe
    pub fn can_service(&self, request: &MotionPlanRequest) -> bool {
        self.planner.can_service_request(request)
    }

    /// Declared algorithm ids
    pub fn algorithms(&self) -> Vec<String> {
        self.planner.planning_algorithms()
    }
}

impl std::fmt::Debug for PlannerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerHandle")
            .field("id", &self.id)
            .field("description", &self.planner.description())
            .finish()
    }
}

/// A planner id and the algorithm ids it declares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerInterfaceDescription {
    /// Registry id
    pub name: String,

    /// Declared algorithm ids
    pub planner_ids: Vec<String>,
}

/// Initialized planners keyed by id, iterated in id order
#[derive(Debug, Default)]
pub struct PlannerRegistry {
    planners: BTreeMap<String, PlannerHandle>,
}

impl PlannerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate and initialize every planner the discovery source declares
    ///
    /// Returns an empty registry only when discovery itself fails.
    pub fn load_all(discovery: &dyn PlannerDiscovery, model: &KinematicModel) -> Self {
        let mut registry = Self::new();

        let declared = match discovery.declared_planners() {
            Ok(declared) => declared,
            Err(e) => {
                tracing::error!(error = %e, "Unable to enumerate planner implementations");
                return registry;
            }
        };

        for id in declared {
            tracing::info!(planner = %id, "Attempting to load and configure planner");

            let mut planner = match discovery.create_instance(&id) {
                Ok(planner) => planner,
                Err(e) => {
                    tracing::error!(planner = %id, error = %e, "Exception while loading planner");
                    continue;
                }
            };

            if let Err(e) = planner.init(model) {
                tracing::error!(planner = %id, error = %e, "Planner failed to initialize");
                continue;
            }

            registry.insert(id, planner);
        }

        if registry.is_empty() {
            tracing::error!("No planning plugins have been loaded. Nothing to do for the benchmarking service.");
        } else {
            tracing::info!(
                planners = ?registry.ids().collect::<Vec<_>>(),
                "Available planner instances"
            );
        }

        registry
    }

    /// Add an already initialized planner, replacing any planner with the same id
    pub fn insert(&mut self, id: impl Into<String>, planner: Box<dyn Planner>) {
        let id = id.into();
        self.planners.insert(id.clone(), PlannerHandle::new(id, planner));
    }

    /// Look up a planner by id
    pub fn get(&self, id: &str) -> Option<&PlannerHandle> {
        self.planners.get(id)
    }

    /// Check whether a planner is loaded
    pub fn contains(&self, id: &str) -> bool {
        self.planners.contains_key(id)
    }

    /// Loaded planner ids, in order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.planners.keys().map(String::as_str)
    }

    /// Loaded planners, in id order
    pub fn iter(&self) -> impl Iterator<Item = &PlannerHandle> {
        self.planners.values()
    }

    /// Number of loaded planners
    pub fn len(&self) -> usize {
        self.planners.len()
    }

    /// Check if no planner is loaded
    pub fn is_empty(&self) -> bool {
        self.planners.is_empty()
    }

    /// Planner ids with their declared algorithm ids
    pub fn query(&self) -> Vec<PlannerInterfaceDescription> {
        self.planners
            .values()
            .map(|handle| PlannerInterfaceDescription {
                name: handle.id().to_string(),
                planner_ids: handle.algorithms(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PlanningScene;
    use crate::trajectory::DetailedPlan;

    struct StubPlanner {
        algorithms: Vec<String>,
        fail_init: bool,
    }

    impl StubPlanner {
        fn boxed(algorithms: &[&str]) -> Box<dyn Planner> {
            Box::new(Self {
                algorithms: algorithms.iter().map(|s| s.to_string()).collect(),
                fail_init: false,
            })
        }
    }

    impl Planner for StubPlanner {
        fn init(&mut self, _model: &KinematicModel) -> Result<(), PlannerError> {
            if self.fail_init {
                Err(PlannerError::Init("no such group".into()))
            } else {
                Ok(())
            }
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn planning_algorithms(&self) -> Vec<String> {
            self.algorithms.clone()
        }

        fn can_service_request(&self, _request: &MotionPlanRequest) -> bool {
            true
        }

        fn solve(
            &self,
            _scene: &dyn PlanningScene,
            _request: &MotionPlanRequest,
        ) -> Result<DetailedPlan, PlannerError> {
            Err(PlannerError::NoSolution)
        }
    }

    struct BrokenDiscovery;

    impl PlannerDiscovery for BrokenDiscovery {
        fn declared_planners(&self) -> Result<Vec<String>, DiscoveryError> {
            Err(DiscoveryError::Unavailable("no plugin path".into()))
        }

        fn create_instance(&self, id: &str) -> Result<Box<dyn Planner>, DiscoveryError> {
            Err(DiscoveryError::NotDeclared(id.into()))
        }
    }

    fn model() -> KinematicModel {
        KinematicModel::new("robot", vec!["j1".into(), "j2".into()])
    }

    #[test]
    fn test_load_all_skips_failing_factory() {
        let discovery = StaticDiscovery::new()
            .register("good", || Ok(StubPlanner::boxed(&["RRT", "PRM"])))
            .register("bad", || Err(PlannerError::Internal("boom".into())));

        let registry = PlannerRegistry::load_all(&discovery, &model());

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("good"));
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn test_load_all_skips_failing_init() {
        let discovery = StaticDiscovery::new()
            .register("good", || Ok(StubPlanner::boxed(&["RRT"])))
            .register("uninitializable", || {
                Ok(Box::new(StubPlanner {
                    algorithms: vec![],
                    fail_init: true,
                }) as Box<dyn Planner>)
            });

        let registry = PlannerRegistry::load_all(&discovery, &model());
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["good"]);
    }

    #[test]
    fn test_load_all_unavailable_discovery_is_empty() {
        let registry = PlannerRegistry::load_all(&BrokenDiscovery, &model());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_query_lists_algorithms_in_id_order() {
        let discovery = StaticDiscovery::new()
            .register("zeta", || Ok(StubPlanner::boxed(&["z"])))
            .register("alpha", || Ok(StubPlanner::boxed(&["x", "y"])));

        let registry = PlannerRegistry::load_all(&discovery, &model());
        let described = registry.query();

        assert_eq!(described.len(), 2);
        assert_eq!(described[0].name, "alpha");
        assert_eq!(described[0].planner_ids, vec!["x", "y"]);
        assert_eq!(described[1].name, "zeta");
    }

    #[test]
    fn test_create_undeclared_instance() {
        let discovery = StaticDiscovery::new();
        assert!(matches!(
            discovery.create_instance("missing"),
            Err(DiscoveryError::NotDeclared(_))
        ));
    }
}

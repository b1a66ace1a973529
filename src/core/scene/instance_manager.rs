//=========================================================================
// Instance Manager
//=========================================================================
//
// Keyed registry of constructible instances with one current instance.
//
// Architecture:
//   InstanceManager<K, T>
//     ├─ factories: HashMap<K, Factory<T>>
//     ├─ order: Vec<K>                (registration order)
//     ├─ current: Option<(K, T)>
//     └─ swap: Steady | Pending(K) | Swapped(K, T)
//
// Flow:
//   request_change(k) ─► Pending(k)
//   apply_pending()   ─► stage_pending()  Pending ─► Swapped (construct, disable)
//                     ─► commit_swapped() Swapped ─► Steady  (init, enable, replace)
//
// The current instance only changes inside `apply_pending`, so callers
// decide where the safe point sits in their frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::entity::{short_type_name, Lifecycle};
use crate::core::error::{EngineError, EngineResult};
use crate::core::globals::GlobalContext;

//=== Instance Key Trait ==================================================

/// Marker trait for instance tags.
///
/// Implemented by identifier types such as [`SceneId`](super::SceneId).
pub trait InstanceKey: Clone + Eq + Hash + Debug + Send + 'static {}

//=== SwapPhase ===========================================================

/// Observable stage of the swap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPhase {
    /// No change requested.
    Steady,

    /// A change was requested and waits for the next safe point.
    Pending,

    /// The replacement exists but is not initialized yet.
    Swapped,
}

enum SwapState<K, T> {
    Steady,
    Pending(K),
    Swapped(K, T),
}

type Factory<T> = Box<dyn Fn() -> T + Send>;

//=== InstanceManager =====================================================

/// Registry of `T` factories keyed by `K`, plus the current instance.
///
/// # Example
///
/// ```
/// use hearth_engine::prelude::*;
///
/// let mut globals = GlobalContext::new();
/// let mut levels: InstanceManager<SceneId, Scene> = InstanceManager::new();
///
/// assert!(levels.register("intro".into(), || Scene::new("intro")));
/// levels.request_change("intro".into()).unwrap();
/// assert!(levels.current().is_none());
///
/// levels.apply_pending(&mut globals).unwrap();
/// assert_eq!(levels.current_key(), Some(&SceneId::from("intro")));
/// ```
pub struct InstanceManager<K: InstanceKey, T: Lifecycle> {
    factories: HashMap<K, Factory<T>>,
    order: Vec<K>,
    current: Option<(K, T)>,
    swap: SwapState<K, T>,
}

impl<K: InstanceKey, T: Lifecycle> InstanceManager<K, T> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty manager with no current instance.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            order: Vec::new(),
            current: None,
            swap: SwapState::Steady,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a factory under `key`.
    ///
    /// Returns `false` and keeps the first factory if `key` is taken.
    pub fn register<F>(&mut self, key: K, factory: F) -> bool
    where
        F: Fn() -> T + Send + 'static,
    {
        if self.factories.contains_key(&key) {
            warn!(
                "{} {:?} is already registered, keeping the first factory",
                Self::kind(),
                key
            );
            return false;
        }

        debug!("Registered {} {:?}", Self::kind(), key);
        self.factories.insert(key.clone(), Box::new(factory));
        self.order.push(key);
        true
    }

    /// Removes the factory for `key`. The current instance is unaffected.
    ///
    /// A pending request for `key` is cancelled.
    pub fn unregister(&mut self, key: &K) -> bool {
        if self.factories.remove(key).is_none() {
            return false;
        }
        self.order.retain(|k| k != key);

        if matches!(&self.swap, SwapState::Pending(pending) if pending == key) {
            warn!("Cancelled pending change to unregistered {} {:?}", Self::kind(), key);
            self.swap = SwapState::Steady;
        }
        true
    }

    pub fn is_registered(&self, key: &K) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys in registration order.
    pub fn registered_keys(&self) -> &[K] {
        &self.order
    }

    //--- Requests ---------------------------------------------------------

    /// Marks `key` as the instance to switch to at the next safe point.
    ///
    /// Later requests before the safe point replace earlier ones. Asking
    /// for the current key keeps the current instance and cancels any
    /// pending change.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownInstance`] if nothing is registered under `key`.
    pub fn request_change(&mut self, key: K) -> EngineResult<()> {
        if !self.factories.contains_key(&key) {
            return Err(EngineError::UnknownInstance(format!("{:?}", key)));
        }

        if self.current_key() == Some(&key) {
            match &self.swap {
                SwapState::Steady => {
                    debug!("{} {:?} is already current, ignoring request", Self::kind(), key);
                    return Ok(());
                }
                SwapState::Pending(previous) => {
                    debug!(
                        "{} {:?} requested again, cancelling pending {:?}",
                        Self::kind(),
                        key,
                        previous
                    );
                    self.swap = SwapState::Steady;
                    return Ok(());
                }
                SwapState::Swapped(..) => {}
            }
        }

        if let Some(previous) = self.pending_key() {
            debug!("Request for {:?} replaces pending {:?}", key, previous);
        }
        self.swap = SwapState::Pending(key);
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref().map(|(_, instance)| instance)
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.current.as_mut().map(|(_, instance)| instance)
    }

    pub fn current_key(&self) -> Option<&K> {
        self.current.as_ref().map(|(key, _)| key)
    }

    /// Key waiting for (or going through) the next swap.
    pub fn pending_key(&self) -> Option<&K> {
        match &self.swap {
            SwapState::Steady => None,
            SwapState::Pending(key) | SwapState::Swapped(key, _) => Some(key),
        }
    }

    pub fn swap_phase(&self) -> SwapPhase {
        match self.swap {
            SwapState::Steady => SwapPhase::Steady,
            SwapState::Pending(_) => SwapPhase::Pending,
            SwapState::Swapped(..) => SwapPhase::Swapped,
        }
    }

    /// `true` while a swap is in progress.
    pub fn is_halted(&self) -> bool {
        self.swap_phase() != SwapPhase::Steady
    }

    //--- Safe Point -------------------------------------------------------

    /// `Pending → Swapped`: constructs the replacement, disabled.
    ///
    /// Returns `Ok(false)` when nothing is pending.
    pub fn stage_pending(&mut self) -> EngineResult<bool> {
        let key = match std::mem::replace(&mut self.swap, SwapState::Steady) {
            SwapState::Pending(key) => key,
            other => {
                self.swap = other;
                return Ok(false);
            }
        };

        let factory = self
            .factories
            .get(&key)
            .ok_or_else(|| EngineError::UnknownInstance(format!("{:?}", key)))?;
        let mut instance = factory();
        instance.set_enabled(false);

        debug!("Constructed {} {:?}", Self::kind(), key);
        self.swap = SwapState::Swapped(key, instance);
        Ok(true)
    }

    /// `Swapped → Steady`: initializes and enables the staged instance,
    /// then makes it current.
    ///
    /// Returns the retired instance. On an initialize error the staged
    /// instance is discarded, the manager returns to `Steady`, and the
    /// previous instance stays current.
    pub fn commit_swapped(&mut self, globals: &mut GlobalContext) -> EngineResult<Option<T>> {
        let (key, mut instance) = match std::mem::replace(&mut self.swap, SwapState::Steady) {
            SwapState::Swapped(key, instance) => (key, instance),
            other => {
                self.swap = other;
                return Ok(None);
            }
        };

        instance.initialize(globals)?;
        instance.set_enabled(true);

        let retired = self.current.replace((key, instance));
        if let Some(key) = self.current_key() {
            debug!("{} {:?} is now current", Self::kind(), key);
        }
        Ok(retired.map(|(_, instance)| instance))
    }

    /// Runs the whole safe point: stage then commit.
    ///
    /// Returns the retired instance, if any, so the caller controls when
    /// it is dropped.
    pub fn apply_pending(&mut self, globals: &mut GlobalContext) -> EngineResult<Option<T>> {
        if !self.stage_pending()? {
            return Ok(None);
        }
        self.commit_swapped(globals)
    }

    //--- Internal Helpers -------------------------------------------------

    fn kind() -> &'static str {
        short_type_name(std::any::type_name::<T>())
    }
}

impl<K: InstanceKey, T: Lifecycle> Default for InstanceManager<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::RenderContext;

    impl InstanceKey for &'static str {}

    /// Minimal lifecycle node tracking its own flags.
    #[derive(Default)]
    struct Node {
        enabled: bool,
        initialized: bool,
        fail_init: bool,
    }

    impl Lifecycle for Node {
        fn initialize(&mut self, _globals: &mut GlobalContext) -> EngineResult<()> {
            if self.fail_init {
                return Err(EngineError::NotInitialized("node".to_string()));
            }
            self.initialized = true;
            Ok(())
        }

        fn update_physics(&mut self, _g: &mut GlobalContext, _dt: f32) -> EngineResult<()> {
            Ok(())
        }

        fn update_state(&mut self, _g: &mut GlobalContext, _dt: f32) -> EngineResult<()> {
            Ok(())
        }

        fn render(
            &mut self,
            _g: &mut GlobalContext,
            _t: Option<&RenderContext>,
            _dt: f32,
        ) -> EngineResult<()> {
            Ok(())
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn is_initialized(&self) -> bool {
            self.initialized
        }
    }

    fn manager() -> InstanceManager<&'static str, Node> {
        let mut manager = InstanceManager::new();
        manager.register("a", Node::default);
        manager.register("b", Node::default);
        manager
    }

    #[test]
    fn current_changes_only_at_the_safe_point() {
        let mut globals = GlobalContext::new();
        let mut manager = manager();

        manager.request_change("a").unwrap();
        assert!(manager.current().is_none());
        assert_eq!(manager.swap_phase(), SwapPhase::Pending);
        assert!(manager.is_halted());

        assert!(manager.apply_pending(&mut globals).unwrap().is_none());
        assert_eq!(manager.current_key(), Some(&"a"));
        assert_eq!(manager.swap_phase(), SwapPhase::Steady);

        manager.request_change("b").unwrap();
        assert_eq!(manager.current_key(), Some(&"a"));
        assert_eq!(manager.pending_key(), Some(&"b"));

        let retired = manager.apply_pending(&mut globals).unwrap();
        assert!(retired.is_some_and(|node| node.initialized));
        let current = manager.current().unwrap();
        assert!(current.is_initialized() && current.is_enabled());
    }

    #[test]
    fn staged_instance_is_disabled_until_committed() {
        let mut globals = GlobalContext::new();
        let mut manager = manager();
        manager.request_change("a").unwrap();

        assert!(manager.stage_pending().unwrap());
        assert_eq!(manager.swap_phase(), SwapPhase::Swapped);
        assert!(manager.current().is_none());

        manager.commit_swapped(&mut globals).unwrap();
        assert!(manager.current().is_some_and(Node::is_enabled));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let mut manager = manager();
        let err = manager.request_change("missing").unwrap_err();
        assert!(matches!(err, EngineError::UnknownInstance(_)));
        assert_eq!(manager.swap_phase(), SwapPhase::Steady);
    }

    #[test]
    fn duplicate_registration_keeps_the_first() {
        let mut manager = manager();
        assert!(!manager.register("a", || Node {
            fail_init: true,
            ..Node::default()
        }));
        assert_eq!(manager.registered_keys(), ["a", "b"]);

        let mut globals = GlobalContext::new();
        manager.request_change("a").unwrap();
        assert!(manager.apply_pending(&mut globals).is_ok());
    }

    #[test]
    fn last_request_before_the_safe_point_wins() {
        let mut globals = GlobalContext::new();
        let mut manager = manager();
        manager.request_change("a").unwrap();
        manager.request_change("b").unwrap();

        manager.apply_pending(&mut globals).unwrap();
        assert_eq!(manager.current_key(), Some(&"b"));
    }

    #[test]
    fn requesting_the_current_key_is_a_no_op() {
        let mut globals = GlobalContext::new();
        let mut manager = manager();
        manager.request_change("a").unwrap();
        manager.apply_pending(&mut globals).unwrap();

        manager.request_change("a").unwrap();
        assert_eq!(manager.swap_phase(), SwapPhase::Steady);
    }

    #[test]
    fn requesting_the_current_key_cancels_a_pending_change() {
        let mut globals = GlobalContext::new();
        let mut manager = manager();
        manager.request_change("a").unwrap();
        manager.apply_pending(&mut globals).unwrap();
        manager.current_mut().unwrap().enabled = false;

        manager.request_change("b").unwrap();
        manager.request_change("a").unwrap();
        assert_eq!(manager.swap_phase(), SwapPhase::Steady);
        assert!(!manager.is_halted());

        assert!(manager.apply_pending(&mut globals).unwrap().is_none());
        assert_eq!(manager.current_key(), Some(&"a"));
        // Same instance, not a rebuilt one
        assert!(!manager.current().unwrap().enabled);
    }

    #[test]
    fn failed_initialize_keeps_the_previous_instance() {
        let mut globals = GlobalContext::new();
        let mut manager = manager();
        manager.register("broken", || Node {
            fail_init: true,
            ..Node::default()
        });
        manager.request_change("a").unwrap();
        manager.apply_pending(&mut globals).unwrap();

        manager.request_change("broken").unwrap();
        assert!(manager.apply_pending(&mut globals).is_err());
        assert_eq!(manager.current_key(), Some(&"a"));
        assert_eq!(manager.swap_phase(), SwapPhase::Steady);
    }

    #[test]
    fn unregister_cancels_a_pending_change() {
        let mut manager = manager();
        manager.request_change("b").unwrap();

        assert!(manager.unregister(&"b"));
        assert!(!manager.is_registered(&"b"));
        assert_eq!(manager.swap_phase(), SwapPhase::Steady);
        assert!(!manager.unregister(&"b"));
    }
}

//! Identity allocation and the weak identity → node registry
//!
//! The identity counter is process-wide so identities never repeat, even
//! across threads. Node handles are `Rc` based and stay on the thread that
//! created them, so the lookup table itself is per thread.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{instrument, trace, warn};

use crate::domain::identity::Identity;
use crate::domain::node::NodeState;

pub(crate) type SharedState = Rc<RefCell<NodeState>>;
pub(crate) type WeakState = Weak<RefCell<NodeState>>;

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Restored identities above this are not honoured, so the counter can never
/// run out.
pub(crate) const MAX_RESTORED_IDENTITY: u64 = u64::MAX >> 1;

/// Registry size below which dead entries are never swept.
const MIN_SWEEP_LEN: usize = 64;

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

/// Non-owning table of live nodes keyed by identity.
struct Registry {
    nodes: BTreeMap<Identity, WeakState>,
    /// Size at which the next sweep of dead entries runs.
    sweep_at: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            sweep_at: MIN_SWEEP_LEN,
        }
    }
}

impl Registry {
    fn is_vacant(&self, identity: Identity) -> bool {
        self.nodes
            .get(&identity)
            .map_or(true, |weak| weak.strong_count() == 0)
    }

    fn insert(&mut self, identity: Identity, state: &SharedState) {
        self.nodes.insert(identity, Rc::downgrade(state));
        if self.nodes.len() >= self.sweep_at {
            self.sweep();
        }
    }

    /// Drops entries `release` could not remove; runs when the table doubles.
    fn sweep(&mut self) {
        let before = self.nodes.len();
        self.nodes.retain(|_, weak| weak.strong_count() > 0);
        self.sweep_at = (self.nodes.len() * 2).max(MIN_SWEEP_LEN);
        trace!(before, after = self.nodes.len(), "swept registry");
    }
}

/// Creates node state under a fresh identity and registers it.
///
/// When `restored` is given (deserialization) that identity is reused and the
/// counter is moved past it. A restored node only takes the registry slot if
/// no live node holds that identity already. Restored identities above
/// [`MAX_RESTORED_IDENTITY`] are replaced by a fresh one.
#[instrument(level = "trace", skip(build))]
pub(crate) fn allocate(
    restored: Option<Identity>,
    build: impl FnOnce(Identity) -> NodeState,
) -> SharedState {
    let identity = match restored {
        Some(identity) if identity.get() <= MAX_RESTORED_IDENTITY => {
            NEXT_IDENTITY.fetch_max(identity.get() + 1, Ordering::SeqCst);
            identity
        }
        Some(identity) => {
            let fresh = Identity::new(NEXT_IDENTITY.fetch_add(1, Ordering::SeqCst));
            warn!(%identity, %fresh, "restored identity out of range, allocated a fresh one");
            fresh
        }
        None => Identity::new(NEXT_IDENTITY.fetch_add(1, Ordering::SeqCst)),
    };
    let state = Rc::new(RefCell::new(build(identity)));
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        if registry.is_vacant(identity) {
            registry.insert(identity, &state);
            trace!(%identity, "registered node");
        } else {
            trace!(%identity, "identity held by a live node, not registered");
        }
    });
    state
}

pub(crate) fn lookup(identity: Identity) -> Option<SharedState> {
    REGISTRY.with(|registry| {
        registry
            .borrow()
            .nodes
            .get(&identity)
            .and_then(Weak::upgrade)
    })
}

/// Live registered nodes ordered by identity.
pub(crate) fn live() -> Vec<SharedState> {
    REGISTRY.with(|registry| {
        registry
            .borrow()
            .nodes
            .values()
            .filter_map(Weak::upgrade)
            .collect()
    })
}

/// Drops the registry entry of a node that is being destroyed.
///
/// Called from `NodeState::drop`; entries still pointing to a live node
/// (a restored copy sharing the identity) are left alone.
pub(crate) fn release(identity: Identity) {
    let _ = REGISTRY.try_with(|registry| {
        if let Ok(mut registry) = registry.try_borrow_mut() {
            if registry.is_vacant(identity) {
                registry.nodes.remove(&identity);
            }
        }
    });
}

/// Number of live registered nodes on this thread.
pub fn live_count() -> usize {
    REGISTRY.with(|registry| {
        registry
            .borrow()
            .nodes
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    })
}

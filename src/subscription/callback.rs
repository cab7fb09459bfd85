// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for stove updates.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StoveStatus;
use crate::types::{ActiveState, PowerLevel, TargetTemperature};

/// Unique identifier for a subscription.
///
/// IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// A change applied to the stove or observed from it.
#[derive(Debug, Clone, PartialEq)]
pub enum StoveUpdate {
    /// An activation change was applied.
    Active(ActiveState),
    /// A new target temperature was applied.
    TargetTemperature(TargetTemperature),
    /// A new power level was applied.
    TargetPower(PowerLevel),
    /// A fresh status was stored in the cache.
    Status(StoveStatus),
}

type UpdateCallback = Arc<dyn Fn(&StoveUpdate) + Send + Sync>;

/// Registry of update callbacks.
///
/// Callbacks run synchronously on the task that applied the change, after
/// every internal lock has been released, in no particular order.
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::subscription::{CallbackRegistry, StoveUpdate};
/// use pellet_stove_lib::types::ActiveState;
///
/// let registry = CallbackRegistry::new();
/// let id = registry.on_update(|update| println!("{update:?}"));
/// registry.dispatch(&StoveUpdate::Active(ActiveState::Active));
/// assert!(registry.unsubscribe(id));
/// ```
pub struct CallbackRegistry {
    next_id: AtomicU64,
    callbacks: RwLock<HashMap<SubscriptionId, UpdateCallback>>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for every update.
    pub fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StoveUpdate) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Removes a callback. Returns false if the ID was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.write().remove(&id).is_some()
    }

    /// Removes every callback.
    pub fn clear(&self) {
        self.callbacks.write().clear();
    }

    /// Calls every registered callback with `update`.
    pub fn dispatch(&self, update: &StoveUpdate) {
        // Snapshot so callbacks may (un)subscribe.
        let callbacks: Vec<UpdateCallback> = self.callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(update);
        }
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Returns true if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId(42).to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_dispatches_to_all() {
        let registry = CallbackRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let count = Arc::clone(&count);
            registry.on_update(move |update| {
                assert_eq!(update, &StoveUpdate::TargetPower(PowerLevel::clamped(2)));
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.dispatch(&StoveUpdate::TargetPower(PowerLevel::clamped(2)));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn registry_unsubscribe() {
        let registry = CallbackRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let id = registry.on_update(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.dispatch(&StoveUpdate::Active(ActiveState::Active));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();
        let a = registry.on_update(|_| {});
        let b = registry.on_update(|_| {});
        assert_ne!(a, b);
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let weak = Arc::downgrade(&registry);
        registry.on_update(move |_| {
            if let Some(registry) = weak.upgrade() {
                registry.clear();
            }
        });
        registry.dispatch(&StoveUpdate::Active(ActiveState::Inactive));
        assert!(registry.is_empty());
    }
}

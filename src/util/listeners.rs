//! Callback registry with scoped subscriptions.
//!
//! DESIGN
//! ======
//! Registering a listener hands back a [`Subscription`] guard. The listener
//! stays registered exactly as long as the guard lives, so a consumer that
//! mounts once and drops on teardown can never leak or double-register.
//!
//! Listeners are invoked from a snapshot taken outside the lock, which lets a
//! listener subscribe or unsubscribe re-entrantly without deadlocking.

#[cfg(test)]
#[path = "listeners_test.rs"]
mod listeners_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// A shared callback receiving a borrowed event payload.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Slots<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

fn lock<T>(slots: &Mutex<Slots<T>>) -> MutexGuard<'_, Slots<T>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered set of listeners for events of type `T`.
pub struct Listeners<T> {
    slots: Arc<Mutex<Slots<T>>>,
}

impl<T: 'static> Listeners<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Arc::new(Mutex::new(Slots { next_id: 0, entries: Vec::new() })) }
    }

    /// Register `listener` until the returned guard is dropped.
    pub fn add(&self, listener: Listener<T>) -> Subscription {
        let id = {
            let mut slots = lock(&self.slots);
            let id = slots.next_id;
            slots.next_id += 1;
            slots.entries.push((id, listener));
            id
        };

        let weak: Weak<Mutex<Slots<T>>> = Arc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = weak.upgrade() {
                lock(&slots).entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Invoke every registered listener, in registration order.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = lock(&self.slots)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.slots).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that keeps a listener registered. Dropping it unregisters.
#[must_use = "dropping a Subscription immediately unregisters its listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// Unregister now. Equivalent to dropping the guard.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.release.is_some()).finish()
    }
}

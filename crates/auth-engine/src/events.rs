//! Auth change event stream.
//!
//! The provider-facing client emits an event whenever the session changes.
//! Consumers register callbacks and receive events synchronously, in
//! registration order. A [`Subscription`] handle deregisters its callback
//! on `unsubscribe()` or on drop, after which no further callbacks fire.

use crate::Session;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tracing::debug;

/// Kinds of auth state change the provider reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    /// A session was established.
    SignedIn,
    /// The session ended.
    SignedOut,
    /// A password-recovery session was established from a recovery link.
    PasswordRecovery,
    /// The session's tokens were refreshed.
    TokenRefreshed,
    /// The user record attached to the session changed.
    UserUpdated,
}

/// Callback type for auth change notifications.
pub type AuthEventCallback = Arc<dyn Fn(AuthChangeEvent, Option<Session>) + Send + Sync>;

type HandlerMap = Mutex<BTreeMap<u64, AuthEventCallback>>;

/// Registry of auth change callbacks.
///
/// A `BTreeMap` keyed by a monotonically increasing id keeps emission in
/// registration order.
pub struct AuthEventBus {
    handlers: Arc<HandlerMap>,
    next_id: AtomicU64,
}

impl AuthEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a callback for auth change events.
    ///
    /// The returned handle deregisters the callback when unsubscribed or
    /// dropped.
    pub fn subscribe(
        &self,
        callback: impl Fn(AuthChangeEvent, Option<Session>) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.handlers
            .lock()
            .unwrap()
            .insert(id, Arc::new(callback));

        debug!(subscription_id = id, "Auth subscription registered");

        Subscription {
            id,
            handlers: Arc::downgrade(&self.handlers),
        }
    }

    /// Deliver an event to every live subscriber, in registration order.
    ///
    /// Callbacks run outside the registry lock, so a callback may
    /// subscribe or unsubscribe without deadlocking.
    pub fn emit(&self, event: AuthChangeEvent, session: Option<&Session>) {
        let callbacks: Vec<AuthEventCallback> =
            self.handlers.lock().unwrap().values().cloned().collect();

        debug!(event = ?event, subscribers = callbacks.len(), "Emitting auth event");

        for callback in callbacks {
            callback(event, session.cloned());
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }
}

impl Default for AuthEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered auth change callback.
pub struct Subscription {
    id: u64,
    handlers: Weak<HandlerMap>,
}

impl Subscription {
    /// Deregister the callback. No further events are delivered to it.
    pub fn unsubscribe(self) {
        self.release();
    }

    fn release(&self) {
        if let Some(handlers) = self.handlers.upgrade() {
            if handlers.lock().unwrap().remove(&self.id).is_some() {
                debug!(subscription_id = self.id, "Auth subscription released");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_events_delivered_in_registration_order() {
        let bus = AuthEventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o1 = Arc::clone(&order);
        let _s1 = bus.subscribe(move |_, _| o1.lock().unwrap().push(1));
        let o2 = Arc::clone(&order);
        let _s2 = bus.subscribe(move |_, _| o2.lock().unwrap().push(2));
        let o3 = Arc::clone(&order);
        let _s3 = bus.subscribe(move |_, _| o3.lock().unwrap().push(3));

        bus.emit(AuthChangeEvent::SignedOut, None);

        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = AuthEventBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let sub = bus.subscribe(move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(AuthChangeEvent::SignedIn, None);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sub.unsubscribe();
        bus.emit(AuthChangeEvent::SignedIn, None);
        bus.emit(AuthChangeEvent::SignedOut, None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let bus = AuthEventBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        {
            let c = Arc::clone(&count);
            let _sub = bus.subscribe(move |_, _| {
                c.fetch_add(1, Ordering::SeqCst);
            });
            bus.emit(AuthChangeEvent::SignedIn, None);
        }

        bus.emit(AuthChangeEvent::SignedOut, None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_after_bus_dropped_is_noop() {
        let bus = AuthEventBus::new();
        let sub = bus.subscribe(|_, _| {});
        drop(bus);

        // Weak upgrade fails, nothing to do
        sub.unsubscribe();
    }

    #[test]
    fn test_event_carries_session() {
        use chrono::{Duration, Utc};

        let bus = AuthEventBus::new();
        let seen = Arc::new(Mutex::new(None));

        let s = Arc::clone(&seen);
        let _sub = bus.subscribe(move |event, session| {
            *s.lock().unwrap() = Some((event, session));
        });

        let session = Session {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            user: crate::User {
                id: "user-1".to_string(),
                email: Some("a@example.com".to_string()),
                email_confirmed_at: Some(Utc::now()),
                identities: vec![],
            },
        };

        bus.emit(AuthChangeEvent::SignedIn, Some(&session));

        let seen = seen.lock().unwrap();
        let (event, delivered) = seen.as_ref().unwrap();
        assert_eq!(*event, AuthChangeEvent::SignedIn);
        assert_eq!(delivered.as_ref().unwrap().user.id, "user-1");
    }
}

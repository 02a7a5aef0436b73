//! Receiving side of the handoff.
//!
//! [`MessageChannel`] stands in for the window's message-event target. A
//! waiting view calls [`MessageChannel::subscribe`] once and keeps the
//! returned [`Subscription`] for as long as it is on screen; cancelling or
//! dropping it removes the handler.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde_json::Value;
use tracing::debug;

use crate::{AuthFailure, AuthMessage, AuthSuccess};

/// A delivered `message` event.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub origin: String,
    pub data: Value,
}

impl MessageEvent {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

type Callback<T> = Box<dyn Fn(T) + Send + Sync>;

pub struct ListenerOptions {
    allowed_origins: Vec<String>,
    on_success: Callback<AuthSuccess>,
    on_error: Option<Callback<AuthFailure>>,
}

impl ListenerOptions {
    pub fn new<I, S, F>(allowed_origins: I, on_success: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(AuthSuccess) + Send + Sync + 'static,
    {
        Self {
            allowed_origins: allowed_origins
                .into_iter()
                .map(|origin| normalize_origin(origin.as_ref()))
                .collect(),
            on_success: Box::new(on_success),
            on_error: None,
        }
    }

    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(AuthFailure) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(on_error));
        self
    }

    /// Origin check first, then payload validation. `None` means the event
    /// is dropped.
    fn accept(&self, event: &MessageEvent) -> Option<AuthMessage> {
        if !self.allowed_origins.iter().any(|o| *o == event.origin) {
            debug!(origin = %event.origin, "dropped message from untrusted origin");
            return None;
        }

        let message = AuthMessage::from_value(&event.data);
        if message.is_none() {
            debug!(origin = %event.origin, "dropped malformed auth message");
        }
        message
    }

    fn handle(&self, event: &MessageEvent) {
        match self.accept(event) {
            Some(AuthMessage::Success(success)) => (self.on_success)(success),
            Some(AuthMessage::Error(failure)) => {
                if let Some(on_error) = &self.on_error {
                    on_error(failure);
                }
            }
            None => {}
        }
    }
}

fn normalize_origin(origin: &str) -> String {
    origin.strip_suffix('/').unwrap_or(origin).to_string()
}

type Handler = Arc<dyn Fn(&MessageEvent) + Send + Sync>;

struct Entry {
    id: u64,
    active: Arc<AtomicBool>,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry>>,
}

impl Registry {
    fn entries(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: u64) {
        self.entries().retain(|entry| entry.id != id);
    }
}

#[derive(Clone, Default)]
pub struct MessageChannel {
    registry: Arc<Registry>,
}

impl MessageChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the auth handler described by `options`.
    pub fn subscribe(&self, options: ListenerOptions) -> Subscription {
        self.add_listener(move |event| options.handle(event))
    }

    pub fn add_listener<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&MessageEvent) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));

        self.registry.entries().push(Entry {
            id,
            active: active.clone(),
            handler: Arc::new(handler),
        });

        Subscription {
            id,
            active,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Runs every registered handler against `event` on the calling thread.
    pub fn dispatch(&self, event: &MessageEvent) {
        // handlers run without the lock held so they may (un)subscribe
        let handlers: Vec<_> = self
            .registry
            .entries()
            .iter()
            .map(|entry| (entry.active.clone(), entry.handler.clone()))
            .collect();

        for (active, handler) in handlers {
            if active.load(Ordering::Acquire) {
                handler(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.entries().len()
    }
}

/// Handle to one installed handler.
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Removes the handler. Calling it again is a no-op.
    pub fn cancel(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    const APP: &str = "https://tsukimaru.jp";

    #[derive(Default)]
    struct Calls {
        successes: Mutex<Vec<AuthSuccess>>,
        errors: Mutex<Vec<AuthFailure>>,
    }

    fn subscribe(channel: &MessageChannel) -> (Subscription, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let (on_success, on_error) = (calls.clone(), calls.clone());
        let options = ListenerOptions::new(
            [format!("{APP}/"), "http://localhost:3000".to_string()],
            move |success| on_success.successes.lock().unwrap().push(success),
        )
        .on_error(move |failure| on_error.errors.lock().unwrap().push(failure));

        (channel.subscribe(options), calls)
    }

    fn success() -> Value {
        json!({"type": "AUTH_SUCCESS", "jwt": "a.b.c", "user": {"id": "1"}})
    }

    #[test]
    fn test_success_from_allowed_origin() {
        let channel = MessageChannel::new();
        let (_subscription, calls) = subscribe(&channel);

        channel.dispatch(&MessageEvent::new(APP, success()));

        let successes = calls.successes.lock().unwrap();
        assert_eq!(successes.len(), 1);
        assert_eq!(successes[0].jwt, "a.b.c");
        assert_eq!(successes[0].user.id.as_deref(), Some("1"));
        assert!(calls.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_untrusted_origin_never_reaches_callbacks() {
        let channel = MessageChannel::new();
        let (_subscription, calls) = subscribe(&channel);

        for origin in [
            "https://evil.example",
            "https://tsukimaru.jp.evil.example",
            "http://tsukimaru.jp",
            "https://tsukimaru.jp/",
            "",
        ] {
            channel.dispatch(&MessageEvent::new(origin, success()));
            channel.dispatch(&MessageEvent::new(
                origin,
                json!({"type": "AUTH_ERROR", "error": "Unauthorized"}),
            ));
        }

        assert!(calls.successes.lock().unwrap().is_empty());
        assert!(calls.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_payloads_are_dropped() {
        let channel = MessageChannel::new();
        let (_subscription, calls) = subscribe(&channel);

        for data in [
            json!(null),
            json!("a.b.c"),
            json!({"type": "AUTH_SUCCESS"}),
            json!({"type": "AUTH_SUCCESS", "jwt": 1}),
            json!({"type": "AUTH_ERROR"}),
            json!({"type": "LOGOUT"}),
        ] {
            channel.dispatch(&MessageEvent::new(APP, data));
        }

        assert!(calls.successes.lock().unwrap().is_empty());
        assert!(calls.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_error_callback_is_optional() {
        let channel = MessageChannel::new();
        let _subscription =
            channel.subscribe(ListenerOptions::new([APP], |_| {}));

        channel.dispatch(&MessageEvent::new(
            APP,
            json!({"type": "AUTH_ERROR", "error": "Unauthorized"}),
        ));

        assert_eq!(channel.listener_count(), 1);
    }

    #[test]
    fn test_error_reaches_error_callback() {
        let channel = MessageChannel::new();
        let (_subscription, calls) = subscribe(&channel);

        channel.dispatch(&MessageEvent::new(
            "http://localhost:3000",
            json!({"type": "AUTH_ERROR", "error": "Unauthorized"}),
        ));

        let errors = calls.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, "Unauthorized");
    }

    #[test]
    fn test_cancel_twice_stops_delivery() {
        let channel = MessageChannel::new();
        let (subscription, calls) = subscribe(&channel);

        subscription.cancel();
        subscription.cancel();
        channel.dispatch(&MessageEvent::new(APP, success()));

        assert!(!subscription.is_active());
        assert_eq!(channel.listener_count(), 0);
        assert!(calls.successes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_drop_releases_listener() {
        let channel = MessageChannel::new();
        {
            let (_subscription, _calls) = subscribe(&channel);
            let (_other, _other_calls) = subscribe(&channel);
            assert_eq!(channel.listener_count(), 2);
        }

        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn test_cancel_after_channel_is_gone() {
        let channel = MessageChannel::new();
        let (subscription, _calls) = subscribe(&channel);
        drop(channel);

        subscription.cancel();

        assert!(!subscription.is_active());
    }

    #[test]
    fn test_handler_may_cancel_during_dispatch() {
        let channel = MessageChannel::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::default();
        let hits = Arc::new(AtomicU64::new(0));

        let (slot_in_handler, hits_in_handler) = (slot.clone(), hits.clone());
        let subscription = channel.add_listener(move |_| {
            hits_in_handler.fetch_add(1, Ordering::SeqCst);
            if let Some(subscription) = slot_in_handler.lock().unwrap().take() {
                subscription.cancel();
            }
        });
        *slot.lock().unwrap() = Some(subscription);

        channel.dispatch(&MessageEvent::new(APP, success()));
        channel.dispatch(&MessageEvent::new(APP, success()));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(channel.listener_count(), 0);
    }
}

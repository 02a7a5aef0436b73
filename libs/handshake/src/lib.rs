//! Cross-window login handoff.
//!
//! The auth callback page rendered inside a popup or iframe posts an
//! [`AuthMessage`] to the window that opened it ([`document`]), and the
//! waiting view listens for it through an origin-checked [`Subscription`]
//! ([`listener`]).

pub mod document;
pub mod listener;
pub mod message;

pub use listener::{ListenerOptions, MessageChannel, MessageEvent, Subscription};
pub use message::{AuthFailure, AuthMessage, AuthSuccess, AuthUser};

//! Domain layer: user identity, public projection, and the event hub.
//!
//! This module holds the server-side domain model: the [`UserId`] newtype,
//! the [`UserProfile`] projection that is safe to return to clients, the
//! [`UserEvent`]s emitted on registration, and the [`EventHub`] that fans
//! them out to stream subscribers.

pub mod event_hub;
pub mod user;
pub mod user_event;
pub mod user_id;

pub use event_hub::{EventHub, MAX_CAPACITY as MAX_EVENT_HUB_CAPACITY, Subscription};
pub use user::{Album, UserProfile};
pub use user_event::UserEvent;
pub use user_id::UserId;

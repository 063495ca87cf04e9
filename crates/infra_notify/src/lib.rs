//! Change Notification Fan-out
//!
//! Implements the lifecycle engine's
//! [`ChangeNotifier`](domain_lifecycle::ChangeNotifier) port over a
//! broadcast channel. Delivery is best-effort: at most once per connected
//! subscriber, no replay, no persistence. Consumers that miss events catch
//! up by re-reading the item list.

pub mod hub;

pub use hub::ChangeHub;

//! Request handlers

pub mod claims;
pub mod events;
pub mod health;
pub mod items;
pub mod reports;
pub mod users;

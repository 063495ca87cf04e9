//! Request and response data transfer objects

pub mod claims;
pub mod items;
pub mod reports;
pub mod users;

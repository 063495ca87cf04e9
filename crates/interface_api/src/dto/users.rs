//! User DTOs

use serde::Serialize;

use domain_lifecycle::UserStats;

#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    /// Items the user published
    pub published: u32,
    /// Items on which the user is the current claimer
    pub claimed: u32,
    /// Published items that reached a terminal state
    pub delivered: u32,
}

impl From<UserStats> for UserStatsResponse {
    fn from(stats: UserStats) -> Self {
        Self {
            published: stats.published,
            claimed: stats.claimed,
            delivered: stats.delivered,
        }
    }
}

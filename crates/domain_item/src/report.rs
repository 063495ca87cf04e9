//! Moderation reports
//!
//! Users can flag a listing for review. Reports are append-only, carry no
//! lifecycle effect, and are removed together with their item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ItemId, ReportId, UserId};

use crate::error::ItemError;

/// Why a listing was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    /// Listing looks fabricated
    Fake,
    /// Inappropriate content
    Inappropriate,
    /// Spam or advertising
    Spam,
    /// Exposes personal data
    PersonalData,
    /// Offensive content
    Offensive,
    /// Anything else, described in the free text field
    Other,
}

impl ReportReason {
    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::Fake => "fake",
            ReportReason::Inappropriate => "inappropriate",
            ReportReason::Spam => "spam",
            ReportReason::PersonalData => "personal_data",
            ReportReason::Offensive => "offensive",
            ReportReason::Other => "other",
        }
    }
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportReason {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fake" => Ok(ReportReason::Fake),
            "inappropriate" => Ok(ReportReason::Inappropriate),
            "spam" => Ok(ReportReason::Spam),
            "personal_data" => Ok(ReportReason::PersonalData),
            "offensive" => Ok(ReportReason::Offensive),
            "other" => Ok(ReportReason::Other),
            unknown => Err(ItemError::UnknownReportReason(unknown.to_string())),
        }
    }
}

/// A moderation report against an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique identifier
    pub id: ReportId,
    /// Reported item
    pub item_id: ItemId,
    /// Reporting user
    pub reporter: UserId,
    /// Reason category
    pub reason: ReportReason,
    /// Free text detail
    pub description: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Creates a new report
    pub fn new(
        item_id: ItemId,
        reporter: UserId,
        reason: ReportReason,
        description: Option<String>,
    ) -> Self {
        Self {
            id: ReportId::new_v7(),
            item_id,
            reporter,
            reason,
            description: description.filter(|d| !d.trim().is_empty()),
            created_at: Utc::now(),
        }
    }
}

//! Report DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ItemId, ReportId, UserId};
use domain_item::{Report, ReportReason};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    /// Reason category wire name, e.g. `spam` or `personal_data`
    pub reason: String,
    pub description: Option<String>,
}

impl CreateReportRequest {
    pub fn into_parts(self) -> Result<(ReportReason, Option<String>), ApiError> {
        let reason = self
            .reason
            .parse::<ReportReason>()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        Ok((reason, self.description))
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: ReportId,
    pub item_id: ItemId,
    pub reporter: UserId,
    pub reason: ReportReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            item_id: report.item_id,
            reporter: report.reporter,
            reason: report.reason,
            description: report.description,
            created_at: report.created_at,
        }
    }
}

//! Driver DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::driver::{DriverStatus, LicenseCategory};

/// Partial driver update (status, license, safety score)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    pub status: Option<DriverStatus>,

    pub license_expires_at: Option<DateTime<Utc>>,

    pub license_category: Option<LicenseCategory>,

    #[validate(range(min = 0, max = 100))]
    pub safety_score: Option<i32>,
}

/// Query for the expiring-licences report
#[derive(Debug, Deserialize)]
pub struct ExpiringLicencesQuery {
    pub days: Option<i64>,
}

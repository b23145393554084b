//! Row types for the six tables the dashboard reads and writes.
//! Keys are opaque UUID strings; timestamps are ISO-8601 strings.

use serde::{Deserialize, Serialize};

pub mod tables {
    pub const PROFILES: &str = "profiles";
    pub const TRAINING_MODULES: &str = "training_modules";
    pub const TRAINING_PROGRESS: &str = "training_progress";
    pub const INCENTIVES: &str = "incentives";
    pub const WASTE_FACILITIES: &str = "waste_facilities";
    pub const WASTE_REPORTS: &str = "waste_reports";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Citizen,
    WasteWorker,
    GreenChampion,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Citizen => "citizen",
            UserRole::WasteWorker => "waste_worker",
            UserRole::GreenChampion => "green_champion",
            UserRole::Admin => "admin",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Citizen
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TrainingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStatus::NotStarted => "not_started",
            TrainingStatus::InProgress => "in_progress",
            TrainingStatus::Completed => "completed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    Biomethanization,
    WasteToEnergy,
    Recycling,
    ScrapCollection,
}

impl FacilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::Biomethanization => "biomethanization",
            FacilityType::WasteToEnergy => "waste_to_energy",
            FacilityType::Recycling => "recycling",
            FacilityType::ScrapCollection => "scrap_collection",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FacilityType::Biomethanization => "Biomethanization Plant",
            FacilityType::WasteToEnergy => "Waste-to-Energy Plant",
            FacilityType::Recycling => "Recycling Center",
            FacilityType::ScrapCollection => "Scrap Collection Hub",
        }
    }
}

/// One row per authenticated identity, created at sign-up and edited only by
/// its owner through the profile form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Admin-managed curriculum entry; read-only from the dashboard.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingModule {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub duration_minutes: u32,
    pub is_mandatory: bool,
    pub target_role: UserRole,
    pub created_at: String,
}

/// At most one row per (user_id, module_id); writes go through upsert keyed
/// on that pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingProgress {
    pub id: String,
    pub user_id: String,
    pub module_id: String,
    pub status: TrainingStatus,
    pub score: Option<u32>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

/// Append-only points ledger. `source_ref` identifies the module or report
/// the award was for, so re-issuing the same award is a no-op upsert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Incentive {
    pub id: String,
    pub user_id: String,
    pub points: i64,
    pub reason: String,
    pub source_ref: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WasteFacility {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FacilityType,
    pub address: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity_tons: Option<f64>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
}

/// Citizen-submitted dumping report. Status/assignment mutation belongs to
/// the operator side and has no surface here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WasteReport {
    pub id: String,
    pub reporter_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo_url: Option<String>,
    pub status: String,
    pub assigned_to: Option<String>,
    pub resolved_at: Option<String>,
    pub created_at: String,
}

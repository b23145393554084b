//! UI-side mirror of the server DTOs.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionDto {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardDto {
    pub full_name: String,
    pub role: String,
    pub is_verified: bool,
    pub completed_modules: usize,
    pub total_modules: usize,
    pub percentage: f64,
    pub total_points: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingModuleDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub duration_minutes: u32,
    pub is_mandatory: bool,
    pub target_role: String,
    pub status: String,
    pub score: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingOverviewDto {
    pub role: String,
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub modules: Vec<TrainingModuleDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressDto {
    pub module_id: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionDto {
    pub module_id: String,
    pub score: u32,
    pub points_awarded: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacilityDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub address: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity_tons: Option<f64>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub directions_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncentiveDto {
    pub id: String,
    pub points: i64,
    pub reason: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerDto {
    pub total_points: i64,
    pub entries: Vec<IncentiveDto>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProfileDto {
    pub role: String,
    pub is_verified: bool,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProfileFormDto {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo: Option<PhotoAttachment>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhotoAttachment {
    pub file_name: String,
    pub size_bytes: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportReceiptDto {
    pub report_id: String,
    pub points_awarded: i64,
}

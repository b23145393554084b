//! One function per domain-view operation. Every query here is scoped to
//! the authenticated user id, standing in for the hosted backend's
//! row-level authorization.

use crate::state::AppState;
use serde::{Deserialize, Serialize};
use swach_core::schema::{
    tables, Incentive, Profile, TrainingModule, TrainingProgress, TrainingStatus, UserRole,
    WasteFacility,
};
use swach_core::store::{Filter, Order};
use swach_core::{new_row_id, now_iso, points, progress, report};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionDto {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardDto {
    pub full_name: String,
    pub role: String,
    pub is_verified: bool,
    pub completed_modules: usize,
    pub total_modules: usize,
    pub percentage: f64,
    pub total_points: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Clone, Debug, Serialize, Deserialize)]
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
pub struct ProfileFormDto {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileDto {
    pub role: String,
    pub is_verified: bool,
    #[serde(flatten)]
    pub form: ProfileFormDto,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportReceiptDto {
    pub report_id: String,
    pub points_awarded: i64,
}

/// Creates the profile row on first sight of an identity, the way the hosted
/// backend would at sign-up. Existing rows are never touched.
pub fn ensure_profile(state: &AppState, user_id: &str, email: Option<&str>) -> Result<(), String> {
    let existing: Vec<Profile> = state
        .store
        .fetch_as(tables::PROFILES, &[Filter::eq("user_id", user_id)], None)
        .map_err(|e| e.to_string())?;
    if !existing.is_empty() {
        return Ok(());
    }

    let full_name = email
        .and_then(|e| e.split('@').next())
        .unwrap_or("")
        .to_string();
    let now = now_iso();
    let profile = Profile {
        id: new_row_id(),
        user_id: user_id.to_string(),
        full_name,
        role: UserRole::Citizen,
        is_verified: false,
        phone: None,
        address: None,
        city: None,
        state: None,
        pincode: None,
        created_at: now.clone(),
        updated_at: now,
    };
    state
        .store
        .insert(
            tables::PROFILES,
            &serde_json::to_value(&profile).map_err(|e| e.to_string())?,
        )
        .map_err(|e| e.to_string())
}

fn profile_for(state: &AppState, user_id: &str) -> Result<Option<Profile>, String> {
    let mut rows: Vec<Profile> = state
        .store
        .fetch_as(tables::PROFILES, &[Filter::eq("user_id", user_id)], None)
        .map_err(|e| e.to_string())?;
    Ok(if rows.is_empty() {
        None
    } else {
        Some(rows.remove(0))
    })
}

fn progress_for(state: &AppState, user_id: &str) -> Result<Vec<TrainingProgress>, String> {
    state
        .store
        .fetch_as(
            tables::TRAINING_PROGRESS,
            &[Filter::eq("user_id", user_id)],
            None,
        )
        .map_err(|e| e.to_string())
}

pub fn dashboard_summary(state: &AppState, user_id: &str) -> Result<DashboardDto, String> {
    let profile = profile_for(state, user_id)?;
    let role = profile.as_ref().map(|p| p.role).unwrap_or_default();

    let modules: Vec<TrainingModule> = state
        .store
        .fetch_as(
            tables::TRAINING_MODULES,
            &[Filter::eq("target_role", role.as_str())],
            None,
        )
        .map_err(|e| e.to_string())?;
    let progress_rows = progress_for(state, user_id)?;
    let summary = progress::summarize(&progress_rows, modules.len());

    let ledger: Vec<Incentive> = state
        .store
        .fetch_as(tables::INCENTIVES, &[Filter::eq("user_id", user_id)], None)
        .map_err(|e| e.to_string())?;

    Ok(DashboardDto {
        full_name: profile.as_ref().map(|p| p.full_name.clone()).unwrap_or_default(),
        role: role.as_str().to_string(),
        is_verified: profile.as_ref().map(|p| p.is_verified).unwrap_or(false),
        completed_modules: summary.completed,
        total_modules: summary.total,
        percentage: summary.percentage(),
        total_points: points::total_points(&ledger),
    })
}

pub fn training_overview(
    state: &AppState,
    user_id: Option<&str>,
) -> Result<TrainingOverviewDto, String> {
    let modules: Vec<TrainingModule> = state
        .store
        .fetch_as(
            tables::TRAINING_MODULES,
            &[],
            Some(&Order::asc("created_at")),
        )
        .map_err(|e| e.to_string())?;

    let (role, progress_rows) = match user_id {
        Some(user_id) => {
            let role = profile_for(state, user_id)?
                .map(|p| p.role)
                .unwrap_or_default();
            (role, progress_for(state, user_id)?)
        }
        None => (UserRole::default(), Vec::new()),
    };

    let summary = progress::summarize(&progress_rows, modules.len());
    let modules = modules
        .into_iter()
        .map(|module| {
            let (status, row) = progress::status_for(&progress_rows, &module.id);
            TrainingModuleDto {
                id: module.id,
                title: module.title,
                description: module.description,
                content: module.content,
                duration_minutes: module.duration_minutes,
                is_mandatory: module.is_mandatory,
                target_role: module.target_role.as_str().to_string(),
                status: status.as_str().to_string(),
                score: row.and_then(|r| r.score),
            }
        })
        .collect();

    Ok(TrainingOverviewDto {
        role: role.as_str().to_string(),
        completed: summary.completed,
        total: summary.total,
        percentage: summary.percentage(),
        modules,
    })
}

fn module_exists(state: &AppState, module_id: &str) -> Result<bool, String> {
    let rows = state
        .store
        .fetch(tables::TRAINING_MODULES, &[Filter::eq("id", module_id)], None)
        .map_err(|e| e.to_string())?;
    Ok(!rows.is_empty())
}

pub fn start_module(
    state: &AppState,
    user_id: &str,
    module_id: &str,
) -> Result<ProgressDto, String> {
    if !module_exists(state, module_id)? {
        return Err(format!("unknown training module '{module_id}'"));
    }

    let progress_rows = progress_for(state, user_id)?;
    let (status, existing) = progress::status_for(&progress_rows, module_id);
    if !progress::can_transition(status, TrainingStatus::InProgress) {
        return Err(format!(
            "training module is already {}",
            status.as_str().replace('_', " ")
        ));
    }

    let row = serde_json::json!({
        "id": existing.map(|r| r.id.clone()).unwrap_or_else(new_row_id),
        "user_id": user_id,
        "module_id": module_id,
        "status": TrainingStatus::InProgress,
        "score": null,
        "started_at": now_iso(),
        "completed_at": null,
    });
    state
        .store
        .upsert(tables::TRAINING_PROGRESS, &row, &["user_id", "module_id"])
        .map_err(|e| e.to_string())?;

    Ok(ProgressDto {
        module_id: module_id.to_string(),
        status: TrainingStatus::InProgress.as_str().to_string(),
    })
}

/// Completing requires a started module. Completing an already-completed
/// module re-issues only the award, so a retry after a partial failure
/// repairs an under-credit without double-awarding.
pub fn complete_module(
    state: &AppState,
    user_id: &str,
    module_id: &str,
) -> Result<CompletionDto, String> {
    if !module_exists(state, module_id)? {
        return Err(format!("unknown training module '{module_id}'"));
    }

    let progress_rows = progress_for(state, user_id)?;
    let (status, existing) = progress::status_for(&progress_rows, module_id);

    let score = match status {
        TrainingStatus::NotStarted => {
            return Err("start the training module before completing it".into())
        }
        TrainingStatus::Completed => existing.and_then(|r| r.score).unwrap_or(progress::MIN_SCORE),
        TrainingStatus::InProgress => {
            let score = progress::completion_score(&mut rand::rng());
            let row = serde_json::json!({
                "user_id": user_id,
                "module_id": module_id,
                "status": TrainingStatus::Completed,
                "score": score,
                "completed_at": now_iso(),
            });
            state
                .store
                .upsert(tables::TRAINING_PROGRESS, &row, &["user_id", "module_id"])
                .map_err(|e| e.to_string())?;
            score
        }
    };

    award_points(
        state,
        user_id,
        points::TRAINING_COMPLETED_POINTS,
        points::TRAINING_COMPLETED_REASON,
        module_id,
    )?;

    Ok(CompletionDto {
        module_id: module_id.to_string(),
        score,
        points_awarded: points::TRAINING_COMPLETED_POINTS,
    })
}

/// Awards are upserts keyed on (user_id, source_ref): re-issuing the same
/// award can never create a second ledger row.
fn award_points(
    state: &AppState,
    user_id: &str,
    amount: i64,
    reason: &str,
    source_ref: &str,
) -> Result<(), String> {
    let row = serde_json::json!({
        "id": new_row_id(),
        "user_id": user_id,
        "points": amount,
        "reason": reason,
        "source_ref": source_ref,
        "created_at": now_iso(),
    });
    state
        .store
        .upsert(tables::INCENTIVES, &row, &["user_id", "source_ref"])
        .map_err(|e| e.to_string())
}

pub fn submit_report(
    state: &AppState,
    user_id: &str,
    draft: &report::ReportDraft,
) -> Result<ReportReceiptDto, String> {
    report::validate(draft).map_err(|e| e.to_string())?;

    let report_id = new_row_id();
    let photo_url = draft.photo.as_ref().map(|photo| {
        report::photo_storage_name(user_id, &photo.file_name, chrono::Utc::now().timestamp_millis())
    });

    let row = serde_json::json!({
        "id": report_id,
        "reporter_id": user_id,
        "title": draft.title,
        "description": draft.description,
        "location": draft.location,
        "latitude": draft.latitude,
        "longitude": draft.longitude,
        "photo_url": photo_url,
        "status": "open",
        "assigned_to": null,
        "resolved_at": null,
        "created_at": now_iso(),
    });
    state
        .store
        .insert(tables::WASTE_REPORTS, &row)
        .map_err(|e| e.to_string())?;

    award_points(
        state,
        user_id,
        points::REPORT_SUBMITTED_POINTS,
        points::REPORT_SUBMITTED_REASON,
        &report_id,
    )?;

    Ok(ReportReceiptDto {
        report_id,
        points_awarded: points::REPORT_SUBMITTED_POINTS,
    })
}

pub fn list_facilities(state: &AppState) -> Result<Vec<FacilityDto>, String> {
    let rows: Vec<WasteFacility> = state
        .store
        .fetch_as(
            tables::WASTE_FACILITIES,
            &[Filter::eq("is_active", true)],
            Some(&Order::asc("city")),
        )
        .map_err(|e| e.to_string())?;

    Ok(rows
        .into_iter()
        .map(|facility| FacilityDto {
            directions_url: swach_core::facilities::directions_url(&facility),
            id: facility.id,
            name: facility.name,
            kind: facility.kind.as_str().to_string(),
            label: facility.kind.label().to_string(),
            address: facility.address,
            city: facility.city,
            latitude: facility.latitude,
            longitude: facility.longitude,
            capacity_tons: facility.capacity_tons,
            contact_person: facility.contact_person,
            phone: facility.phone,
        })
        .collect())
}

pub fn list_incentives(state: &AppState, user_id: &str) -> Result<LedgerDto, String> {
    let rows: Vec<Incentive> = state
        .store
        .fetch_as(
            tables::INCENTIVES,
            &[Filter::eq("user_id", user_id)],
            Some(&Order::desc("created_at")),
        )
        .map_err(|e| e.to_string())?;

    Ok(LedgerDto {
        total_points: points::total_points(&rows),
        entries: rows
            .into_iter()
            .map(|incentive| IncentiveDto {
                id: incentive.id,
                points: incentive.points,
                reason: incentive.reason,
                created_at: incentive.created_at,
            })
            .collect(),
    })
}

pub fn get_profile(state: &AppState, user_id: &str) -> Result<ProfileDto, String> {
    let profile = profile_for(state, user_id)?.ok_or_else(|| "profile not found".to_string())?;
    Ok(ProfileDto {
        role: profile.role.as_str().to_string(),
        is_verified: profile.is_verified,
        form: ProfileFormDto {
            full_name: profile.full_name,
            phone: profile.phone.unwrap_or_default(),
            address: profile.address.unwrap_or_default(),
            city: profile.city.unwrap_or_default(),
            state: profile.state.unwrap_or_default(),
            pincode: profile.pincode.unwrap_or_default(),
        },
    })
}

/// Full-row save: every form field is written on every save, no diffing.
pub fn update_profile(
    state: &AppState,
    user_id: &str,
    form: &ProfileFormDto,
) -> Result<(), String> {
    let patch = serde_json::json!({
        "full_name": form.full_name,
        "phone": form.phone,
        "address": form.address,
        "city": form.city,
        "state": form.state,
        "pincode": form.pincode,
        "updated_at": now_iso(),
    });
    let touched = state
        .store
        .update(tables::PROFILES, &patch, &[Filter::eq("user_id", user_id)])
        .map_err(|e| e.to_string())?;
    if touched == 0 {
        return Err("profile not found".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    fn db_path(name: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        format!("/tmp/swach-tests/{name}-{nanos}.db")
    }

    fn state(name: &str) -> AppState {
        AppState::open(&db_path(name)).expect("open state")
    }

    fn seed_module(state: &AppState, id: &str, created_at: &str) {
        seed_module_for_role(state, id, created_at, UserRole::Citizen);
    }

    fn seed_module_for_role(state: &AppState, id: &str, created_at: &str, role: UserRole) {
        state
            .store
            .insert(
                tables::TRAINING_MODULES,
                &serde_json::json!({
                    "id": id,
                    "title": format!("Module {id}"),
                    "description": "desc",
                    "content": "content",
                    "duration_minutes": 15,
                    "is_mandatory": true,
                    "target_role": role,
                    "created_at": created_at,
                }),
            )
            .expect("seed module");
    }

    fn draft() -> report::ReportDraft {
        report::ReportDraft {
            title: "Dumping near park".into(),
            description: "Mixed waste".into(),
            location: "Nehru Park".into(),
            latitude: Some(22.7),
            longitude: Some(75.8),
            photo: None,
        }
    }

    #[test]
    fn ensure_profile_creates_once_and_never_overwrites() {
        let state = state("ensure-profile");
        ensure_profile(&state, "u1", Some("asha@example.com")).expect("ensure");

        let mut form = ProfileFormDto::default();
        form.full_name = "Asha Verma".into();
        form.city = "Indore".into();
        update_profile(&state, "u1", &form).expect("update");

        ensure_profile(&state, "u1", Some("asha@example.com")).expect("ensure again");
        let profile = get_profile(&state, "u1").expect("get");
        assert_eq!(profile.form.full_name, "Asha Verma");
        assert_eq!(profile.form.city, "Indore");
        assert_eq!(profile.role, "citizen");
    }

    #[test]
    fn start_then_complete_leaves_one_row_and_one_award() {
        let state = state("start-complete");
        ensure_profile(&state, "u1", None).expect("ensure");
        seed_module(&state, "m1", "2026-01-01T00:00:00Z");

        start_module(&state, "u1", "m1").expect("start");
        let completion = complete_module(&state, "u1", "m1").expect("complete");
        assert!((progress::MIN_SCORE..=progress::MAX_SCORE).contains(&completion.score));
        assert_eq!(completion.points_awarded, 50);

        let rows: Vec<TrainingProgress> = state
            .store
            .fetch_as(
                tables::TRAINING_PROGRESS,
                &[Filter::eq("user_id", "u1"), Filter::eq("module_id", "m1")],
                None,
            )
            .expect("fetch progress");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, TrainingStatus::Completed);
        assert_eq!(rows[0].score, Some(completion.score));
        assert!(rows[0].started_at.is_some());
        assert!(rows[0].completed_at.is_some());

        let ledger = list_incentives(&state, "u1").expect("ledger");
        assert_eq!(ledger.entries.len(), 1);
        assert_eq!(ledger.total_points, 50);
    }

    #[test]
    fn completing_twice_never_double_awards() {
        let state = state("double-complete");
        ensure_profile(&state, "u1", None).expect("ensure");
        seed_module(&state, "m1", "2026-01-01T00:00:00Z");

        start_module(&state, "u1", "m1").expect("start");
        let first = complete_module(&state, "u1", "m1").expect("complete");
        let second = complete_module(&state, "u1", "m1").expect("complete again");
        assert_eq!(first.score, second.score);

        let ledger = list_incentives(&state, "u1").expect("ledger");
        assert_eq!(ledger.entries.len(), 1);
        assert_eq!(ledger.total_points, 50);
    }

    #[test]
    fn complete_without_start_is_rejected() {
        let state = state("complete-unstarted");
        ensure_profile(&state, "u1", None).expect("ensure");
        seed_module(&state, "m1", "2026-01-01T00:00:00Z");

        let err = complete_module(&state, "u1", "m1").expect_err("must reject");
        assert!(err.contains("before completing"));
        assert_eq!(
            list_incentives(&state, "u1").expect("ledger").total_points,
            0
        );
    }

    #[test]
    fn progress_never_moves_backwards() {
        let state = state("no-regression");
        ensure_profile(&state, "u1", None).expect("ensure");
        seed_module(&state, "m1", "2026-01-01T00:00:00Z");

        start_module(&state, "u1", "m1").expect("start");
        assert!(start_module(&state, "u1", "m1").is_err());

        complete_module(&state, "u1", "m1").expect("complete");
        assert!(start_module(&state, "u1", "m1").is_err());

        let rows: Vec<TrainingProgress> = state
            .store
            .fetch_as(
                tables::TRAINING_PROGRESS,
                &[Filter::eq("user_id", "u1")],
                None,
            )
            .expect("fetch");
        assert_eq!(rows[0].status, TrainingStatus::Completed);
    }

    #[test]
    fn dashboard_matches_the_three_of_five_scenario() {
        let state = state("dashboard");
        ensure_profile(&state, "u1", Some("asha@example.com")).expect("ensure");
        for i in 1..=5 {
            seed_module(&state, &format!("m{i}"), &format!("2026-01-0{i}T00:00:00Z"));
        }
        for module in ["m1", "m2", "m3"] {
            start_module(&state, "u1", module).expect("start");
            let row = serde_json::json!({
                "user_id": "u1",
                "module_id": module,
                "status": "completed",
                "score": 80,
                "completed_at": "2026-02-01T00:00:00Z",
            });
            // written directly so no incentive rows exist for this scenario
            state
                .store
                .upsert(tables::TRAINING_PROGRESS, &row, &["user_id", "module_id"])
                .expect("upsert");
        }

        let dashboard = dashboard_summary(&state, "u1").expect("dashboard");
        assert_eq!(dashboard.completed_modules, 3);
        assert_eq!(dashboard.total_modules, 5);
        assert!((dashboard.percentage - 60.0).abs() < f64::EPSILON);
        assert_eq!(dashboard.total_points, 0);
        assert_eq!(dashboard.role, "citizen");
    }

    #[test]
    fn dashboard_counts_only_modules_for_the_users_role() {
        let state = state("dashboard-role");
        ensure_profile(&state, "u1", None).expect("ensure");
        seed_module(&state, "m1", "2026-01-01T00:00:00Z");
        seed_module_for_role(&state, "m2", "2026-01-02T00:00:00Z", UserRole::WasteWorker);

        let dashboard = dashboard_summary(&state, "u1").expect("dashboard");
        assert_eq!(dashboard.total_modules, 1);
    }

    #[test]
    fn training_overview_orders_modules_and_defaults_to_not_started() {
        let state = state("overview");
        seed_module(&state, "m2", "2026-01-02T00:00:00Z");
        seed_module(&state, "m1", "2026-01-01T00:00:00Z");

        let overview = training_overview(&state, None).expect("overview");
        let ids: Vec<&str> = overview.modules.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
        assert!(overview
            .modules
            .iter()
            .all(|m| m.status == "not_started" && m.score.is_none()));
        assert_eq!(overview.completed, 0);
    }

    #[test]
    fn training_overview_carries_user_progress_and_score() {
        let state = state("overview-user");
        ensure_profile(&state, "u1", None).expect("ensure");
        seed_module(&state, "m1", "2026-01-01T00:00:00Z");
        seed_module(&state, "m2", "2026-01-02T00:00:00Z");

        start_module(&state, "u1", "m1").expect("start");
        let completion = complete_module(&state, "u1", "m1").expect("complete");

        let overview = training_overview(&state, Some("u1")).expect("overview");
        let m1 = overview.modules.iter().find(|m| m.id == "m1").expect("m1");
        assert_eq!(m1.status, "completed");
        assert_eq!(m1.score, Some(completion.score));
        let m2 = overview.modules.iter().find(|m| m.id == "m2").expect("m2");
        assert_eq!(m2.status, "not_started");
        assert_eq!(overview.completed, 1);
        assert_eq!(overview.total, 2);
    }

    #[test]
    fn submit_report_awards_twenty_five_points() {
        let state = state("report");
        ensure_profile(&state, "u1", None).expect("ensure");

        let receipt = submit_report(&state, "u1", &draft()).expect("submit");
        assert_eq!(receipt.points_awarded, 25);

        let reports = state
            .store
            .fetch(
                tables::WASTE_REPORTS,
                &[Filter::eq("reporter_id", "u1")],
                None,
            )
            .expect("fetch reports");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0]["status"], serde_json::json!("open"));
        assert_eq!(reports[0]["id"], serde_json::json!(receipt.report_id));

        let ledger = list_incentives(&state, "u1").expect("ledger");
        assert_eq!(ledger.total_points, 25);
        assert_eq!(ledger.entries[0].reason, "Waste report submitted");
    }

    #[test]
    fn invalid_report_writes_nothing() {
        let state = state("report-invalid");
        ensure_profile(&state, "u1", None).expect("ensure");

        let mut missing_title = draft();
        missing_title.title.clear();
        assert!(submit_report(&state, "u1", &missing_title).is_err());

        let mut oversized = draft();
        oversized.photo = Some(report::PhotoAttachment {
            file_name: "big.jpg".into(),
            size_bytes: report::MAX_PHOTO_BYTES + 1,
        });
        assert!(submit_report(&state, "u1", &oversized).is_err());

        let reports = state
            .store
            .fetch(tables::WASTE_REPORTS, &[], None)
            .expect("fetch");
        assert!(reports.is_empty());
        assert_eq!(
            list_incentives(&state, "u1").expect("ledger").total_points,
            0
        );
    }

    #[test]
    fn report_at_exactly_the_photo_limit_is_accepted() {
        let state = state("report-limit");
        ensure_profile(&state, "u1", None).expect("ensure");

        let mut at_limit = draft();
        at_limit.photo = Some(report::PhotoAttachment {
            file_name: "ok.jpg".into(),
            size_bytes: report::MAX_PHOTO_BYTES,
        });
        let receipt = submit_report(&state, "u1", &at_limit).expect("submit");

        let reports = state
            .store
            .fetch(
                tables::WASTE_REPORTS,
                &[Filter::eq("id", receipt.report_id)],
                None,
            )
            .expect("fetch");
        let photo_url = reports[0]["photo_url"].as_str().expect("photo url");
        assert!(photo_url.starts_with("u1/"));
        assert!(photo_url.ends_with(".jpg"));
    }

    #[test]
    fn ledger_lists_newest_first() {
        let state = state("ledger-order");
        for (id, created) in [("a", "2026-01-01T00:00:00Z"), ("b", "2026-02-01T00:00:00Z")] {
            state
                .store
                .insert(
                    tables::INCENTIVES,
                    &serde_json::json!({
                        "id": id,
                        "user_id": "u1",
                        "points": 25,
                        "reason": "Waste report submitted",
                        "source_ref": id,
                        "created_at": created,
                    }),
                )
                .expect("insert");
        }

        let ledger = list_incentives(&state, "u1").expect("ledger");
        assert_eq!(ledger.total_points, 50);
        assert_eq!(ledger.entries[0].id, "b");
        assert_eq!(ledger.entries[1].id, "a");
    }

    #[test]
    fn ledger_is_scoped_to_the_requesting_user() {
        let state = state("ledger-scope");
        for user in ["u1", "u2"] {
            state
                .store
                .insert(
                    tables::INCENTIVES,
                    &serde_json::json!({
                        "id": format!("i-{user}"),
                        "user_id": user,
                        "points": 50,
                        "reason": "Training module completed",
                        "source_ref": "m1",
                        "created_at": "2026-01-01T00:00:00Z",
                    }),
                )
                .expect("insert");
        }

        let ledger = list_incentives(&state, "u1").expect("ledger");
        assert_eq!(ledger.entries.len(), 1);
        assert_eq!(ledger.total_points, 50);
    }

    #[test]
    fn facilities_are_active_only_and_ordered_by_city() {
        let state = state("facilities");
        for (name, city, active) in [
            ("Pune Plant", "Pune", true),
            ("Agra Hub", "Agra", true),
            ("Closed Yard", "Bhopal", false),
        ] {
            state
                .store
                .insert(
                    tables::WASTE_FACILITIES,
                    &serde_json::json!({
                        "id": name,
                        "name": name,
                        "type": "recycling",
                        "address": "addr",
                        "city": city,
                        "latitude": null,
                        "longitude": null,
                        "capacity_tons": null,
                        "contact_person": null,
                        "phone": null,
                        "is_active": active,
                    }),
                )
                .expect("insert");
        }

        let facilities = list_facilities(&state).expect("list");
        let cities: Vec<&str> = facilities.iter().map(|f| f.city.as_str()).collect();
        assert_eq!(cities, vec!["Agra", "Pune"]);
        assert_eq!(facilities[0].label, "Recycling Center");
        assert!(facilities[0].directions_url.contains("maps"));
    }

    #[test]
    fn profile_save_is_a_full_row_write() {
        let state = state("profile-save");
        ensure_profile(&state, "u1", Some("ravi@example.com")).expect("ensure");

        let form = ProfileFormDto {
            full_name: "Ravi Kumar".into(),
            phone: "9876500000".into(),
            address: "45 MG Road".into(),
            city: "Indore".into(),
            state: "MP".into(),
            pincode: "452001".into(),
        };
        update_profile(&state, "u1", &form).expect("save");

        // a second save with cleared optional fields clears them in the row
        let mut cleared = form.clone();
        cleared.phone.clear();
        update_profile(&state, "u1", &cleared).expect("save again");

        let profile = get_profile(&state, "u1").expect("get");
        assert_eq!(profile.form.full_name, "Ravi Kumar");
        assert_eq!(profile.form.phone, "");
        assert_eq!(profile.form.city, "Indore");
    }

    #[test]
    fn updating_an_unknown_profile_fails() {
        let state = state("profile-missing");
        assert!(update_profile(&state, "ghost", &ProfileFormDto::default()).is_err());
    }
}

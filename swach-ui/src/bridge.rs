//! Typed fetch wrappers over the dashboard API, plus the device
//! geolocation call and the external map link-out. The signed-in identity
//! lives in local storage and rides along as request headers.

use crate::dto::{
    CompletionDto, DashboardDto, FacilityDto, LedgerDto, ProfileDto, ProfileFormDto, ProgressDto,
    ReportDraft, ReportReceiptDto, SessionDto, TrainingOverviewDto,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

const USER_ID_KEY: &str = "swach.user_id";
const USER_EMAIL_KEY: &str = "swach.user_email";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn stored_identity() -> Option<(String, Option<String>)> {
    let storage = local_storage()?;
    let user_id = storage.get_item(USER_ID_KEY).ok().flatten()?;
    let email = storage.get_item(USER_EMAIL_KEY).ok().flatten();
    Some((user_id, email))
}

pub fn remember_identity(user_id: &str, email: Option<&str>) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(USER_ID_KEY, user_id);
        match email {
            Some(email) => {
                let _ = storage.set_item(USER_EMAIL_KEY, email);
            }
            None => {
                let _ = storage.remove_item(USER_EMAIL_KEY);
            }
        }
    }
}

pub fn forget_identity() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(USER_ID_KEY);
        let _ = storage.remove_item(USER_EMAIL_KEY);
    }
}

async fn call<B, R>(method: &str, path: &str, body: Option<&B>) -> Result<R, String>
where
    B: Serialize,
    R: DeserializeOwned,
{
    let window = web_sys::window().ok_or_else(|| "window not available".to_string())?;

    let init = RequestInit::new();
    init.set_method(method);
    if let Some(body) = body {
        let json = serde_json::to_string(body).map_err(|e| e.to_string())?;
        init.set_body(&JsValue::from_str(&json));
    }

    let request = Request::new_with_str_and_init(path, &init)
        .map_err(|e| format!("bad request: {e:?}"))?;
    let headers = request.headers();
    if body.is_some() {
        let _ = headers.set("content-type", "application/json");
    }
    if let Some((user_id, email)) = stored_identity() {
        let _ = headers.set("x-user-id", &user_id);
        if let Some(email) = email {
            let _ = headers.set("x-user-email", &email);
        }
    }

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("request failed: {e:?}"))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| "unexpected fetch result".to_string())?;

    if !response.ok() {
        let text = JsFuture::from(response.text().map_err(|e| format!("{e:?}"))?)
            .await
            .map_err(|e| format!("{e:?}"))?;
        return Err(text
            .as_string()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| format!("request failed with status {}", response.status())));
    }

    let value = JsFuture::from(response.json().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("{e:?}"))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

async fn get_json<R: DeserializeOwned>(path: &str) -> Result<R, String> {
    call::<(), R>("GET", path, None).await
}

pub async fn fetch_session() -> Result<SessionDto, String> {
    get_json("/api/session").await
}

/// Registers the stored identity with the server; first sign-in creates
/// the profile there.
pub async fn sign_in() -> Result<SessionDto, String> {
    call::<(), _>("POST", "/api/session", None).await
}

pub async fn fetch_dashboard() -> Result<DashboardDto, String> {
    get_json("/api/dashboard").await
}

pub async fn fetch_training() -> Result<TrainingOverviewDto, String> {
    get_json("/api/training").await
}

pub async fn start_module(module_id: &str) -> Result<ProgressDto, String> {
    call::<(), _>("POST", &format!("/api/training/{module_id}/start"), None).await
}

pub async fn complete_module(module_id: &str) -> Result<CompletionDto, String> {
    call::<(), _>("POST", &format!("/api/training/{module_id}/complete"), None).await
}

pub async fn submit_report(draft: &ReportDraft) -> Result<ReportReceiptDto, String> {
    call("POST", "/api/reports", Some(draft)).await
}

pub async fn fetch_facilities() -> Result<Vec<FacilityDto>, String> {
    get_json("/api/facilities").await
}

pub async fn fetch_incentives() -> Result<LedgerDto, String> {
    get_json("/api/incentives").await
}

pub async fn fetch_profile() -> Result<ProfileDto, String> {
    get_json("/api/profile").await
}

pub async fn save_profile(form: &ProfileFormDto) -> Result<ProfileDto, String> {
    call("PUT", "/api/profile", Some(form)).await
}

/// One-shot device position. Denial or an unsupported device resolves to an
/// error message; callers surface it and go on without coordinates.
pub async fn current_position() -> Result<(f64, f64), String> {
    let window = web_sys::window().ok_or_else(|| "window not available".to_string())?;
    let geolocation = window
        .navigator()
        .geolocation()
        .map_err(|_| "your device doesn't support geolocation".to_string())?;

    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let reject_sync = reject.clone();
        let success = Closure::once_into_js(move |position: JsValue| {
            let coords = js_sys::Reflect::get(&position, &JsValue::from_str("coords"))
                .unwrap_or(JsValue::UNDEFINED);
            let latitude = js_sys::Reflect::get(&coords, &JsValue::from_str("latitude"))
                .ok()
                .and_then(|v| v.as_f64());
            let longitude = js_sys::Reflect::get(&coords, &JsValue::from_str("longitude"))
                .ok()
                .and_then(|v| v.as_f64());
            match (latitude, longitude) {
                (Some(lat), Some(lng)) => {
                    let pair =
                        js_sys::Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lng));
                    let _ = resolve.call1(&JsValue::NULL, &pair);
                }
                _ => {
                    let _ = resolve.call1(&JsValue::NULL, &JsValue::NULL);
                }
            }
        });
        let failure = Closure::once_into_js(move |error: JsValue| {
            let message = js_sys::Reflect::get(&error, &JsValue::from_str("message"))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_else(|| "unable to get your current location".to_string());
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str(&message));
        });
        if geolocation
            .get_current_position_with_error_callback(
                success.unchecked_ref(),
                Some(failure.unchecked_ref()),
            )
            .is_err()
        {
            let _ = reject_sync.call1(
                &JsValue::NULL,
                &JsValue::from_str("unable to get your current location"),
            );
        }
    });

    let value = JsFuture::from(promise).await.map_err(|e| {
        e.as_string()
            .unwrap_or_else(|| "unable to get your current location".to_string())
    })?;
    let pair: js_sys::Array = value
        .dyn_into()
        .map_err(|_| "unexpected geolocation payload".to_string())?;
    let latitude = pair
        .get(0)
        .as_f64()
        .ok_or_else(|| "unexpected geolocation payload".to_string())?;
    let longitude = pair
        .get(1)
        .as_f64()
        .ok_or_else(|| "unexpected geolocation payload".to_string())?;
    Ok((latitude, longitude))
}

/// Opens the external map lookup in a new tab; no response is consumed.
pub fn open_external(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

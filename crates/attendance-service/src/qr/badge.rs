//! Badge QR generation.
//!
//! The code carries a compact JSON identity card which the scanner page
//! later submits verbatim as an event's `qrData`.

use std::io::Cursor;
use std::sync::{Arc, LazyLock};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::SecondsFormat;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use attendance_auth::RoleEnforcer;
use attendance_core::error::AppError;
use attendance_core::result::AppResult;

use crate::context::RequestContext;

/// MIME type of the rendered image.
pub const BADGE_MIME: &str = "image/png";

/// Payload schema version.
const PAYLOAD_VERSION: u8 = 1;

/// Smallest edge of the rendered image, in pixels.
const MIN_EDGE_PX: u32 = 520;

static UNSAFE_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_.-]+").expect("filename pattern is valid")
});

/// Who the badge is for, as the admin typed it.
#[derive(Debug, Clone, Default)]
pub struct BadgeHolder {
    pub username: String,
    pub employee_id: String,
    pub full_name: String,
    pub department: String,
    pub phone: String,
}

/// The JSON encoded into the code. Short keys keep the symbol small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgePayload {
    pub v: u8,
    /// Login name.
    pub uid: String,
    /// Employee id.
    pub eid: String,
    /// Full name.
    pub n: String,
    /// Department.
    pub d: String,
    /// Phone.
    pub p: String,
    /// Issue time, RFC 3339 UTC with milliseconds.
    pub iat: String,
}

/// A rendered badge.
#[derive(Debug, Clone)]
pub struct BadgeQr {
    /// Suggested download name, `qr_<uid>_<eid>.png` with unsafe runs
    /// replaced by `_`.
    pub filename: String,
    pub payload: BadgePayload,
    /// `data:image/png;base64,...`
    pub data_url: String,
}

/// Renders badge QR codes. Admin only.
#[derive(Debug, Clone)]
pub struct QrService {
    roles: Arc<RoleEnforcer>,
}

impl QrService {
    /// Creates a new QR service.
    pub fn new(roles: Arc<RoleEnforcer>) -> Self {
        Self { roles }
    }

    /// Build the payload for `holder` and render it as a PNG data URL.
    pub fn generate(&self, ctx: &RequestContext, holder: &BadgeHolder) -> AppResult<BadgeQr> {
        self.roles.require_admin(&ctx.session)?;

        let payload = BadgePayload {
            v: PAYLOAD_VERSION,
            uid: holder.username.trim().to_string(),
            eid: holder.employee_id.trim().to_string(),
            n: holder.full_name.trim().to_string(),
            d: holder.department.trim().to_string(),
            p: holder.phone.trim().to_string(),
            iat: ctx
                .request_time
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        if payload.uid.is_empty() || payload.eid.is_empty() {
            return Err(AppError::validation("username and employeeId are required"));
        }

        let text = serde_json::to_string(&payload)?;
        let png = render_png(&text).map_err(|e| {
            warn!(uid = %payload.uid, error = %e, "QR rendering failed");
            AppError::internal("qr_failed")
        })?;

        let filename = badge_filename(&payload.uid, &payload.eid);
        info!(
            issued_by = %ctx.session.user_name,
            uid = %payload.uid,
            bytes = png.len(),
            "Badge QR generated"
        );
        Ok(BadgeQr {
            filename,
            data_url: format!("data:{BADGE_MIME};base64,{}", STANDARD.encode(&png)),
            payload,
        })
    }
}

/// Encode `text` at medium error correction and return PNG bytes.
fn render_png(text: &str) -> AppResult<Vec<u8>> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M)
        .map_err(|e| AppError::internal(format!("Failed to encode QR: {e}")))?;
    let img = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .min_dimensions(MIN_EDGE_PX, MIN_EDGE_PX)
        .build();

    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| AppError::internal(format!("Failed to write PNG: {e}")))?;
    Ok(buf)
}

fn badge_filename(uid: &str, eid: &str) -> String {
    UNSAFE_FILENAME
        .replace_all(&format!("qr_{uid}_{eid}.png"), "_")
        .into_owned()
}

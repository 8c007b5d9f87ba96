// Carousel creation route.
//
// Creates one carousel row plus one media row and one slide row per uploaded
// file, in input order. The store executes one statement at a time, so
// all-or-nothing behavior is emulated: on any mid-sequence failure the
// handler deletes everything it inserted so far (best effort) before
// surfacing the error. Validation runs first and writes nothing.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::context::AppContext;
use slideworks_core::db::models;
use slideworks_core::db::WhereClause;
use slideworks_core::options::ServiceOptions;
use slideworks_core::utils::id::generate_id;
use slideworks_core::utils::storage::{filename_from_path, is_user_scoped};

/// Carousel creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateCarouselRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<FileInput>>,
    /// Accepted for forward compatibility; the stored aspect is the
    /// configured fixed value.
    #[serde(default)]
    pub aspect: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One uploaded-file descriptor as it arrives on the wire. All fields are
/// optional here; validation promotes them to [`ValidFile`] or rejects the
/// whole request.
#[derive(Debug, Clone, Deserialize)]
pub struct FileInput {
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<i64>,
}

/// A descriptor that passed validation: every field populated, bucket
/// allowed, path inside the caller's namespace, size positive.
#[derive(Debug, Clone)]
struct ValidFile {
    bucket: String,
    path: String,
    mime_type: String,
    size_bytes: i64,
}

/// Carousel creation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarouselResponse {
    pub carousel_id: String,
    pub slide_count: usize,
    pub media_ids: Vec<String>,
    pub aspect: String,
}

/// Typed error for the creation handler.
///
/// Insert failures carry a code naming the step that failed so an operator
/// can tell which table rejected the write; validation carries the reason.
#[derive(Debug)]
pub enum CreateCarouselError {
    /// 422 — the request was rejected before any write.
    Validation(String),
    /// 500 — the carousel insert failed; nothing was written.
    CarouselInsertFailed,
    /// 500 — a media insert failed mid-sequence; cleanup ran.
    MediaInsertFailed,
    /// 500 — a slide insert failed mid-sequence; cleanup ran.
    SlideInsertFailed,
    /// 500 — anything outside the known failure points.
    Internal(String),
}

impl CreateCarouselError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_request",
            Self::CarouselInsertFailed => "carousel_insert_failed",
            Self::MediaInsertFailed => "media_insert_failed",
            Self::SlideInsertFailed => "slide_insert_failed",
            Self::Internal(_) => "unexpected_error",
        }
    }
}

impl std::fmt::Display for CreateCarouselError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(reason) => write!(f, "{reason}"),
            Self::CarouselInsertFailed => write!(f, "Failed to create carousel"),
            Self::MediaInsertFailed => write!(f, "Failed to save media"),
            Self::SlideInsertFailed => write!(f, "Failed to save slide"),
            Self::Internal(_) => write!(f, "Internal server error"),
        }
    }
}

impl std::error::Error for CreateCarouselError {}

/// Validate the request body against the caller identity. No side effects;
/// the first violation rejects the whole request.
fn validate_files(
    options: &ServiceOptions,
    user_id: &str,
    body: &CreateCarouselRequest,
) -> Result<Vec<ValidFile>, String> {
    let Some(files) = body.files.as_ref() else {
        return Err("files array is required".to_string());
    };
    if files.is_empty() {
        return Err("at least one file is required".to_string());
    }
    if files.len() > options.max_slides {
        return Err(format!("maximum {} files allowed", options.max_slides));
    }

    let mut validated = Vec::with_capacity(files.len());
    for file in files {
        let (Some(bucket), Some(path), Some(mime_type), Some(size_bytes)) = (
            file.bucket.as_deref().filter(|s| !s.is_empty()),
            file.path.as_deref().filter(|s| !s.is_empty()),
            file.mime_type.as_deref().filter(|s| !s.is_empty()),
            file.size_bytes,
        ) else {
            return Err("each file must include bucket, path, mime_type, size_bytes".to_string());
        };

        if bucket != options.media_bucket {
            return Err(format!("bucket must be '{}'", options.media_bucket));
        }
        // Authorization, not just format: a request may only reference
        // storage paths under the caller's own namespace.
        if !is_user_scoped(path, user_id) {
            return Err("path must be namespaced to the user".to_string());
        }
        if size_bytes <= 0 {
            return Err("size_bytes must be positive".to_string());
        }

        validated.push(ValidFile {
            bucket: bucket.to_string(),
            path: path.to_string(),
            mime_type: mime_type.to_string(),
            size_bytes,
        });
    }

    Ok(validated)
}

/// Handle carousel creation for an authenticated caller.
///
/// 1. Validate (no writes on failure).
/// 2. Insert the carousel row under a fresh random id.
/// 3. Per file, in input order: insert the media row, then the slide row at
///    position index + 1. File i completes before file i+1 starts, so a
///    failure only ever needs to unwind fully-recorded work.
/// 4. On any insert failure after step 2, run best-effort cleanup and
///    surface the step that failed.
///
/// Not idempotent: two identical calls create two independent carousels.
pub async fn handle_create_carousel(
    ctx: &AppContext,
    user_id: &str,
    body: CreateCarouselRequest,
) -> Result<CreateCarouselResponse, CreateCarouselError> {
    let files = validate_files(&ctx.options, user_id, &body).map_err(CreateCarouselError::Validation)?;

    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(&ctx.options.default_title)
        .to_string();
    let aspect = ctx.options.default_aspect.clone();
    let status = body
        .status
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ctx.options.default_status.clone());

    let carousel_id = generate_id();
    let now = chrono::Utc::now().to_rfc3339();

    ctx.adapter
        .create(
            models::CAROUSEL,
            json!({
                "id": carousel_id,
                "user_id": user_id,
                "title": title,
                "aspect": aspect,
                "status": status,
                "created_at": now,
                "updated_at": now,
            }),
        )
        .await
        .map_err(|err| {
            ctx.logger.error(&format!("Insert carousel failed: {err}"));
            CreateCarouselError::CarouselInsertFailed
        })?;

    let mut media_ids: Vec<String> = Vec::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        let media_row = match ctx
            .adapter
            .create(
                models::MEDIA,
                json!({
                    "user_id": user_id,
                    "bucket": file.bucket,
                    "path": file.path,
                    "filename": filename_from_path(&file.path),
                    "mime_type": file.mime_type,
                    "size_bytes": file.size_bytes,
                    "media_type": "image",
                    "visibility": "private",
                    "is_library": false,
                }),
            )
            .await
        {
            Ok(row) => row,
            Err(err) => {
                ctx.logger
                    .error(&format!("Insert media failed for {}: {err}", file.path));
                cleanup(ctx, &carousel_id, &media_ids).await;
                return Err(CreateCarouselError::MediaInsertFailed);
            }
        };

        let Some(media_id) = media_row.get("id").and_then(|id| id.as_str()).map(str::to_string)
        else {
            ctx.logger
                .error(&format!("Insert media returned no id for {}", file.path));
            cleanup(ctx, &carousel_id, &media_ids).await;
            return Err(CreateCarouselError::MediaInsertFailed);
        };
        media_ids.push(media_id.clone());

        if let Err(err) = ctx
            .adapter
            .create(
                models::CAROUSEL_SLIDE,
                json!({
                    "user_id": user_id,
                    "carousel_id": carousel_id,
                    "media_id": media_id,
                    "position": index + 1,
                }),
            )
            .await
        {
            ctx.logger
                .error(&format!("Insert slide failed for media {media_id}: {err}"));
            cleanup(ctx, &carousel_id, &media_ids).await;
            return Err(CreateCarouselError::SlideInsertFailed);
        }
    }

    Ok(CreateCarouselResponse {
        carousel_id,
        slide_count: files.len(),
        media_ids,
        aspect,
    })
}

/// Compensating cleanup: slides, then media, then the carousel itself.
///
/// Each deletion is attempted independently; a failed step is logged and
/// the rest still run. The cleanup itself is not atomic — without a
/// multi-statement transaction on the store this is the accepted limit.
async fn cleanup(ctx: &AppContext, carousel_id: &str, media_ids: &[String]) {
    if let Err(err) = ctx
        .adapter
        .delete_many(
            models::CAROUSEL_SLIDE,
            &[WhereClause::eq("carousel_id", carousel_id)],
        )
        .await
    {
        ctx.logger
            .error(&format!("Cleanup slides failed for {carousel_id}: {err}"));
    }

    if !media_ids.is_empty() {
        let ids = media_ids
            .iter()
            .map(|id| serde_json::Value::from(id.as_str()))
            .collect();
        if let Err(err) = ctx
            .adapter
            .delete_many(models::MEDIA, &[WhereClause::is_in("id", ids)])
            .await
        {
            ctx.logger
                .error(&format!("Cleanup media failed for {carousel_id}: {err}"));
        }
    }

    if let Err(err) = ctx
        .adapter
        .delete(models::CAROUSEL, &[WhereClause::eq("id", carousel_id)])
        .await
    {
        ctx.logger
            .error(&format!("Cleanup carousel failed for {carousel_id}: {err}"));
    }
}

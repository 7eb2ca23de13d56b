use super::model::Video;
use super::service::VideoService;
use crate::common::error::{AppError, AppResult};
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::common::upload::read_file_field;
use crate::modules::auth::dto::TokenClaims;
use crate::state::AppState;
use axum::{
    Extension,
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

fn parse_video_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidIdentifier(raw.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/videos/{videoID}",
    params(("videoID" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video", body = ApiResponse<Video>),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Video not found")
    ),
    tag = "Videos"
)]
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiSuccess<Video>> {
    let video_id = parse_video_id(&video_id)?;
    let video = VideoService::get_video(&state, video_id).await?;
    Ok(ApiSuccess::ok(video, "Video retrieved successfully"))
}

/// Upload a video
///
/// The file is buffered locally, probed for its aspect ratio, and stored under
/// a `landscape/`, `portrait/` or `other/` key.
#[utoipa::path(
    post,
    path = "/api/video_upload/{videoID}",
    params(("videoID" = Uuid, Path, description = "Video ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload successful", body = ApiResponse<Video>),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Video not found"),
        (status = 413, description = "Payload Too Large"),
        (status = 415, description = "Unsupported Media Type"),
        (status = 502, description = "Object storage failure")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<ApiSuccess<Video>> {
    let video_id = parse_video_id(&video_id)?;
    let upload = read_file_field(&mut multipart, "video", state.config.max_video_bytes).await?;
    let video = VideoService::upload_video(&state, video_id, claims.sub, upload).await?;
    Ok(ApiSuccess::ok(video, "Video uploaded successfully"))
}

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{videoID}",
    params(("videoID" = Uuid, Path, description = "Video ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload successful", body = ApiResponse<Video>),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Video not found"),
        (status = 413, description = "Payload Too Large"),
        (status = 415, description = "Unsupported Media Type")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<ApiSuccess<Video>> {
    let video_id = parse_video_id(&video_id)?;
    let upload =
        read_file_field(&mut multipart, "thumbnail", state.config.max_thumbnail_bytes).await?;
    let video = VideoService::upload_thumbnail(&state, video_id, claims.sub, upload).await?;
    Ok(ApiSuccess::ok(video, "Thumbnail uploaded successfully"))
}

/// Serve a thumbnail held in process memory
#[utoipa::path(
    get,
    path = "/api/thumbnails/{videoID}",
    params(("videoID" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Thumbnail bytes", body = Vec<u8>),
        (status = 404, description = "Not Found")
    ),
    tag = "Videos"
)]
pub async fn get_thumbnail(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Response> {
    let video_id = parse_video_id(&video_id)?;
    let thumbnail = VideoService::get_thumbnail(&state, video_id).await?;
    Ok(([(header::CONTENT_TYPE, thumbnail.media_type)], thumbnail.data).into_response())
}

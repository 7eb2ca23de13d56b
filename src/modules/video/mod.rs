use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};

pub mod classify;
pub mod handler;
pub mod key;
pub mod model;
pub mod repository;
pub mod service;
pub mod thumbnail_store;

/// Headroom on top of the file cap for multipart boundaries and headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(state: AppState) -> Router<AppState> {
    let max_video = state.config.max_video_bytes;
    let max_thumbnail = state.config.max_thumbnail_bytes;

    let public_routes = Router::new()
        .route("/videos/{videoID}", get(handler::get_video))
        .route("/thumbnails/{videoID}", get(handler::get_thumbnail));

    let protected_routes = Router::new()
        .route(
            "/video_upload/{videoID}",
            post(handler::upload_video)
                .layer(DefaultBodyLimit::max(max_video.saturating_add(MULTIPART_OVERHEAD))),
        )
        .route(
            "/thumbnail_upload/{videoID}",
            post(handler::upload_thumbnail)
                .layer(DefaultBodyLimit::max(max_thumbnail.saturating_add(MULTIPART_OVERHEAD))),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ));

    public_routes.merge(protected_routes)
}

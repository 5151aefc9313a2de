//! HTTP 外壳：端点到处理器的分发、参数解析、状态码映射。
//!
//! 这一层只是薄适配：把查询参数整理好交给 [`crate::SaavnHelper`]，
//! 再把结果或错误包进统一的 `{status, …, error?}` 信封。
//! 所有规整逻辑都在库里，这里不做任何数据变换。

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::SaavnHelper;

mod handlers;
pub mod keep_alive;

/// 处理器共享的应用状态。
pub type AppState = Arc<SaavnHelper>;

/// 组装完整的路由表。
pub fn router(helper: SaavnHelper) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/song/", get(handlers::search_songs))
        .route("/song/get/", get(handlers::get_song))
        .route("/songs/get/", get(handlers::get_songs))
        .route("/song/suggestions/", get(handlers::song_suggestions))
        .route("/album/", get(handlers::album))
        .route("/playlist/", get(handlers::playlist))
        .route("/lyrics/", get(handlers::lyrics))
        .route("/result/", get(handlers::result))
        .route("/search/", get(handlers::global_search))
        .route("/search/songs/", get(handlers::search_section_songs))
        .route("/search/albums/", get(handlers::search_section_albums))
        .route(
            "/search/playlists/",
            get(handlers::search_section_playlists),
        )
        .route("/search/artists/", get(handlers::search_section_artists))
        .route("/artist/", get(handlers::artist_details))
        .route("/artist/songs/", get(handlers::artist_songs))
        .route("/artist/albums/", get(handlers::artist_albums))
        .route("/keep-alive/", get(handlers::keep_alive_probe))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(helper))
}

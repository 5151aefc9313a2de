//! 各端点的处理器实现。
//!
//! 信封约定：成功时 `{"status": true, …}` 配 HTTP 200；输入缺失或
//! 非法时 `{"status": false, "error": …}` 配 400；上游或规整失败配
//! 500。错误信息只给人读的一句话，不泄露内部细节。

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use super::AppState;
use crate::error::{Result, SaavnHelperError};

type Reply = (StatusCode, Json<Value>);

fn ok(body: Value) -> Reply {
    (StatusCode::OK, Json(body))
}

fn input_error(message: &str) -> Reply {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"status": false, "error": message})),
    )
}

fn failure(err: &SaavnHelperError) -> Reply {
    let code = if err.is_input() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    tracing::error!("请求处理失败: {err}");
    (
        code,
        Json(json!({"status": false, "error": err.to_string()})),
    )
}

/// 把库层结果包成带 `data` 键的信封。
fn reply_data(result: Result<Value>) -> Reply {
    match result {
        Ok(data) => ok(json!({"status": true, "data": data})),
        Err(e) => failure(&e),
    }
}

/// `lyrics` 等开关参数：出现且不等于 "false" 即为真。
fn flag_on(params: &HashMap<String, String>, key: &str) -> bool {
    params
        .get(key)
        .is_some_and(|text| !text.eq_ignore_ascii_case("false"))
}

/// `songdata` 参数：默认真，出现且不等于 "true" 时为假。
fn flag_default_on(params: &HashMap<String, String>, key: &str) -> bool {
    params
        .get(key)
        .is_none_or(|text| text.eq_ignore_ascii_case("true"))
}

fn parsed_u32(params: &HashMap<String, String>, key: &str) -> Option<u32> {
    params.get(key).and_then(|text| text.parse().ok())
}

/// `GET /` 服务自述。
pub async fn home() -> Reply {
    ok(json!({
        "status": true,
        "message": "saavn-helper-rs is running",
    }))
}

/// `GET /song/` 自由文本或链接搜索歌曲。
pub async fn search_songs(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(query) = params.get("query") else {
        return input_error("Query is required to search songs!");
    };
    let lyrics = flag_on(&params, "lyrics");
    let songdata = flag_default_on(&params, "songdata");
    reply_data(helper.search_songs(query, lyrics, songdata).await)
}

/// `GET /song/get/` 按 id 取单曲。
pub async fn get_song(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(id) = params.get("id") else {
        return input_error("Song ID is required to get a song!");
    };
    let lyrics = flag_on(&params, "lyrics");
    reply_data(helper.get_song(id, lyrics).await)
}

/// `GET /songs/get/` 按逗号分隔的 id 列表批量取歌。
pub async fn get_songs(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(raw_ids) = params.get("ids") else {
        return input_error("Song IDs are required to get songs!");
    };
    let ids: Vec<String> = raw_ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect();
    let lyrics = flag_on(&params, "lyrics");
    match helper.get_songs(&ids, lyrics).await {
        // 批量结果自带 status / failed_ids 字段，原样发出
        Ok(batch) => match serde_json::to_value(&batch) {
            Ok(body) => ok(body),
            Err(e) => failure(&SaavnHelperError::from(e)),
        },
        Err(e) => failure(&e),
    }
}

/// `GET /album/` 按链接取专辑。
pub async fn album(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(query) = params.get("query") else {
        return input_error("Query is required to search albums!");
    };
    let lyrics = flag_on(&params, "lyrics");
    reply_data(helper.album_by_link(query, lyrics).await)
}

/// `GET /playlist/` 按链接取歌单。
pub async fn playlist(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(query) = params.get("query") else {
        return input_error("Query is required to search playlists!");
    };
    let lyrics = flag_on(&params, "lyrics");
    reply_data(helper.playlist_by_link(query, lyrics).await)
}

/// `GET /lyrics/` 按链接或 id 取歌词全文。
pub async fn lyrics(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(query) = params.get("query") else {
        return input_error("Query containing song link or id is required to fetch lyrics!");
    };
    match helper.lyrics(query).await {
        Ok(text) => ok(json!({"status": true, "lyrics": text})),
        Err(e) => failure(&e),
    }
}

/// `GET /result/` 统一入口：文本走搜索，链接按类别分派。
pub async fn result(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(query) = params.get("query") else {
        return input_error("Query is required!");
    };
    let lyrics = flag_on(&params, "lyrics");
    reply_data(helper.resolve(query, lyrics).await)
}

/// `GET /search/` 全局搜索（多分区）。
pub async fn global_search(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(query) = params.get("query") else {
        return input_error("Query is required to search!");
    };
    match helper.global_search(query).await {
        Ok(payload) => ok(mirror_body(payload)),
        Err(e) => failure(&e),
    }
}

/// 镜像信封：我们的成功标志和镜像自报的状态是两个字段，不合并。
fn mirror_body(payload: crate::MirrorPayload) -> Value {
    let mut body = json!({"status": true, "data": payload.data});
    if let Some(upstream) = payload.upstream_status {
        body["upstream_status"] = upstream;
    }
    body
}

async fn search_section(
    helper: AppState,
    params: HashMap<String, String>,
    section: &str,
) -> Reply {
    let Some(query) = params.get("query") else {
        return input_error("Query is required to search!");
    };
    let page = parsed_u32(&params, "page").unwrap_or(1);
    let limit = parsed_u32(&params, "limit");
    match helper.search_section(section, query, page, limit).await {
        Ok(payload) => ok(mirror_body(payload)),
        Err(e) => failure(&e),
    }
}

/// `GET /search/songs/`
pub async fn search_section_songs(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    search_section(helper, params, "songs").await
}

/// `GET /search/albums/`
pub async fn search_section_albums(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    search_section(helper, params, "albums").await
}

/// `GET /search/playlists/`
pub async fn search_section_playlists(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    search_section(helper, params, "playlists").await
}

/// `GET /search/artists/`
pub async fn search_section_artists(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    search_section(helper, params, "artists").await
}

/// `GET /artist/` 歌手详情。
pub async fn artist_details(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(id) = params.get("id") else {
        return input_error("Artist ID is required!");
    };
    reply_data(helper.artist_details(id).await)
}

/// `GET /artist/songs/` 歌手歌曲分页（sortBy / sortOrder 严格校验）。
pub async fn artist_songs(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(id) = params.get("id") else {
        return input_error("Artist ID is required!");
    };
    let page = parsed_u32(&params, "page").unwrap_or(1);
    let sort_by = params.get("sortBy").map_or("popularity", String::as_str);
    let sort_order = params.get("sortOrder").map_or("desc", String::as_str);
    reply_data(helper.artist_songs(id, page, sort_by, sort_order).await)
}

/// `GET /artist/albums/` 歌手专辑分页。
pub async fn artist_albums(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(id) = params.get("id") else {
        return input_error("Artist ID is required!");
    };
    let page = parsed_u32(&params, "page").unwrap_or(1);
    let sort_by = params.get("sortBy").map_or("popularity", String::as_str);
    let sort_order = params.get("sortOrder").map_or("desc", String::as_str);
    reply_data(helper.artist_albums(id, page, sort_by, sort_order).await)
}

/// `GET /song/suggestions/` 歌曲推荐。
pub async fn song_suggestions(
    State(helper): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let Some(id) = params.get("id") else {
        return input_error("Song ID is required to get suggestions!");
    };
    reply_data(helper.song_suggestions(id).await)
}

/// `GET /keep-alive/` 保活探针。
pub async fn keep_alive_probe() -> Reply {
    ok(json!({
        "status": true,
        "message": format!(
            "Service is running at {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
    }))
}

/// 兜底 404。
pub async fn not_found() -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"status": false, "error": "Resource not found"})),
    )
}

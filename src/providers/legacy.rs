//! 旧版 `api.php` 端点族的客户端。
//!
//! 这一族端点没有文档，响应体带反斜杠转义和已知的畸形引号模式，
//! 统一经 [`crate::fetch::decode_legacy_body`] 解码后再交给
//! `normalize::legacy` 规整。

use std::sync::Arc;

use futures::future;
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{Result, SaavnHelperError},
    fetch::{DEFAULT_TIMEOUT, Fetcher, decode_legacy_body},
    normalize::legacy as fmt,
    resolver,
    value::ValueExt,
};

const SEARCH_BASE_URL: &str = "https://www.jiosaavn.com/api.php?__call=autocomplete.get&_format=json&_marker=0&cc=in&includeMetaTags=1&query=";
const SONG_DETAILS_BASE_URL: &str = "https://www.jiosaavn.com/api.php?__call=song.getDetails&cc=in&_marker=0%3F_marker%3D0&_format=json&pids=";
const PLAYLIST_DETAILS_BASE_URL: &str = "https://www.jiosaavn.com/api.php?__call=playlist.getDetails&_format=json&cc=in&_marker=0%3F_marker%3D0&listid=";
const LYRICS_BASE_URL: &str = "https://www.jiosaavn.com/api.php?__call=lyrics.getLyrics&ctx=web6dot0&api_version=4&_format=json&_marker=0%3F_marker%3D0&lyrics_id=";

/// 批量取歌的结果：整体成功，但逐条失败的 id 单独列出。
#[derive(Debug, Serialize)]
pub struct BatchSongs {
    /// 整体成功标志（部分失败不影响整体成功）
    pub status: bool,
    /// 成功取回并规整的歌曲，保持上游返回的相对顺序
    pub songs: Vec<Value>,
    /// 请求的 id 总数
    pub total_requested: usize,
    /// 实际取回的条数
    pub total_found: usize,
    /// 未取回的 id 列表
    pub failed_ids: Vec<String>,
    /// 存在失败 id 时的提示信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 旧版端点族的客户端实现。
#[derive(Clone)]
pub struct LegacyClient {
    fetcher: Arc<dyn Fetcher>,
}

impl LegacyClient {
    /// 创建一个新的 `LegacyClient`，共享外部传入的抓取器。
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// 取回任意页面正文（用于链接换 id 的标记切割）。
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        self.fetcher.fetch_text(url, DEFAULT_TIMEOUT).await
    }

    async fn fetch_legacy_json(
        &self,
        url: &str,
        timeout: std::time::Duration,
    ) -> Result<Value> {
        let body = self.fetcher.fetch_text(url, timeout).await?;
        decode_legacy_body(&body)
    }

    /// 自由文本搜索，返回上游 `songs.data` 下的原始条目列表。
    pub async fn search_songs_raw(&self, query: &str) -> Result<Vec<Value>> {
        let url = format!("{SEARCH_BASE_URL}{}", urlencoding::encode(query));
        tracing::info!("搜索歌曲: {query}");
        let data = self.fetch_legacy_json(&url, DEFAULT_TIMEOUT).await?;
        data.get_path(&["songs", "data"])
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                SaavnHelperError::Decode("搜索响应缺少 songs.data 结构".to_string())
            })
    }

    /// 按 id 取单曲详情并规整；`lyrics` 为真且歌曲声明有歌词时
    /// 再取歌词全文内联进结果。歌词获取失败只降级为缺席。
    pub async fn get_song(&self, id: &str, lyrics: bool) -> Result<Value> {
        let url = format!("{SONG_DETAILS_BASE_URL}{id}");
        let data = self.fetch_legacy_json(&url, DEFAULT_TIMEOUT).await?;
        let raw = data.get(id).cloned().ok_or_else(|| {
            SaavnHelperError::ApiError(format!("歌曲 id `{id}` 不在响应中"))
        })?;

        let mut song = fmt::format_song(raw);
        if lyrics && fmt::has_lyrics(&song) {
            match self.get_lyrics(id).await {
                Ok(text) => {
                    if let Some(obj) = song.as_object_mut() {
                        obj.insert("lyrics".to_string(), Value::String(text));
                    }
                }
                Err(e) => tracing::warn!("为歌曲 {id} 获取歌词失败: {e}"),
            }
        }
        Ok(song)
    }

    /// 一次请求批量取多首歌，超时随批量大小标定。
    ///
    /// 逐条失败（上游缺该 id）不会中断整批：失败 id 进
    /// `failed_ids`，成功条目保持顺序。
    pub async fn get_songs(&self, ids: &[String], lyrics: bool) -> Result<BatchSongs> {
        if ids.is_empty() {
            return Err(SaavnHelperError::Input(
                "No song IDs provided".to_string(),
            ));
        }

        let timeout = resolver::batch_timeout(ids.len());
        let url = format!("{SONG_DETAILS_BASE_URL}{}", ids.join(","));
        tracing::info!(
            "批量请求 {} 首歌，超时 {:.1}s",
            ids.len(),
            timeout.as_secs_f64()
        );
        let data = self.fetch_legacy_json(&url, timeout).await?;

        let mut songs = Vec::new();
        let mut failed_ids = Vec::new();
        for id in ids {
            match data.get(id.as_str()) {
                Some(raw) => songs.push(fmt::format_song(raw.clone())),
                None => {
                    tracing::warn!("歌曲 id {id} 不在批量响应中");
                    failed_ids.push(id.clone());
                }
            }
        }

        if lyrics {
            for song in &mut songs {
                if !fmt::has_lyrics(song) {
                    continue;
                }
                let Some(id) = song.str_at("id").map(str::to_owned) else {
                    continue;
                };
                if let Ok(text) = self.get_lyrics(&id).await
                    && let Some(obj) = song.as_object_mut()
                {
                    obj.insert("lyrics".to_string(), Value::String(text));
                }
            }
        }

        let message = (!failed_ids.is_empty())
            .then(|| format!("Some songs could not be fetched: {failed_ids:?}"));
        Ok(BatchSongs {
            status: true,
            total_requested: ids.len(),
            total_found: songs.len(),
            songs,
            failed_ids,
            message,
        })
    }

    /// 搜索的"全量数据"路径：对每个搜索结果 id 并发取详情。
    ///
    /// 单条详情失败只会让那一条从结果里消失，输出顺序与搜索
    /// 结果顺序一致。
    pub async fn fetch_songs_for_results(
        &self,
        results: Vec<Value>,
        lyrics: bool,
    ) -> Vec<Value> {
        let fetches = results.iter().filter_map(|entry| {
            entry
                .str_at("id")
                .map(|id| self.get_song(id, lyrics))
        });
        future::join_all(fetches)
            .await
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(song) => Some(song),
                Err(e) => {
                    tracing::warn!("取搜索结果详情失败: {e}");
                    None
                }
            })
            .collect()
    }

    /// 按歌单 id 取详情并规整；`lyrics` 为真时为声明有歌词的
    /// 歌曲逐条内联歌词全文。
    pub async fn get_playlist(&self, list_id: &str, lyrics: bool) -> Result<Value> {
        let url = format!("{PLAYLIST_DETAILS_BASE_URL}{list_id}");
        let data = self.fetch_legacy_json(&url, DEFAULT_TIMEOUT).await?;
        let mut playlist = fmt::format_playlist(data);

        if lyrics
            && let Some(songs) = playlist
                .as_object_mut()
                .and_then(|obj| obj.get_mut("songs"))
                .and_then(Value::as_array_mut)
        {
            for song in songs {
                if !fmt::has_lyrics(song) {
                    continue;
                }
                let Some(id) = song.str_at("id").map(str::to_owned) else {
                    continue;
                };
                if let Ok(text) = self.get_lyrics(&id).await
                    && let Some(obj) = song.as_object_mut()
                {
                    obj.insert("lyrics".to_string(), Value::String(text));
                }
            }
        }
        Ok(playlist)
    }

    /// 取歌词全文。
    pub async fn get_lyrics(&self, id: &str) -> Result<String> {
        let url = format!("{LYRICS_BASE_URL}{id}");
        let body = self.fetcher.fetch_text(url.as_str(), DEFAULT_TIMEOUT).await?;
        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| SaavnHelperError::Decode(format!("歌词响应不是合法 JSON: {e}")))?;
        parsed
            .str_at("lyrics")
            .map(str::to_owned)
            .ok_or_else(|| SaavnHelperError::ApiError(format!("歌词接口未返回 id `{id}` 的歌词")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HttpFetcher;

    const TEST_SONG_QUERY: &str = "Tum Hi Ho";

    fn live_client() -> LegacyClient {
        LegacyClient::new(Arc::new(HttpFetcher::new()))
    }

    #[tokio::test]
    #[ignore]
    async fn test_search_songs_raw() {
        let client = live_client();
        let results = client.search_songs_raw(TEST_SONG_QUERY).await.unwrap();
        assert!(!results.is_empty(), "搜索结果不应为空");
        println!("✅ 为 '{TEST_SONG_QUERY}' 找到 {} 条结果", results.len());
    }

    #[tokio::test]
    #[ignore]
    async fn test_search_then_get_song() {
        let client = live_client();
        let results = client.search_songs_raw(TEST_SONG_QUERY).await.unwrap();
        let id = results[0].str_at("id").expect("搜索结果应带 id").to_owned();

        let song = client.get_song(&id, false).await.unwrap();
        assert!(song.str_at("media_url").is_some() || song.str_at("image").is_some());
        println!("✅ 测试 get_song 通过: {:?}", song.str_at("song"));
    }
}

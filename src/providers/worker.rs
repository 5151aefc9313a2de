//! 工作镜像族（Cloudflare Worker / Vercel 托管）的客户端。
//!
//! 镜像返回 `{status, message, data}` 信封；镜像自己报告的状态
//! 与本服务的成功标志是两回事，保持为两个独立字段往外传，
//! 不做合并。

use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::{Result, SaavnHelperError},
    fetch::{DEFAULT_TIMEOUT, Fetcher},
    normalize::{EntityKind, worker as fmt},
    resolver::{SortBy, SortOrder},
};

const WORKER_BASE_URL: &str = "https://jiosaavn-api.alangeokurian10.workers.dev/api";
const VERCEL_BASE_URL: &str = "https://jiosaavn-api-eight-brown.vercel.app/api";

/// 一次镜像调用的结果：规整后的数据，外加镜像自报的状态（原样透传）。
#[derive(Debug)]
pub struct MirrorPayload {
    /// 规整后的数据
    pub data: Value,
    /// 镜像信封里的 `status` 字段，原样保留
    pub upstream_status: Option<Value>,
}

/// 工作镜像族的客户端实现。
#[derive(Clone)]
pub struct WorkerClient {
    fetcher: Arc<dyn Fetcher>,
}

impl WorkerClient {
    /// 创建一个新的 `WorkerClient`，共享外部传入的抓取器。
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// 取回并拆开镜像信封。`data` 缺失视为镜像报错。
    async fn fetch_envelope(&self, url: &str) -> Result<(Value, Option<Value>)> {
        let body = self.fetcher.fetch_text(url, DEFAULT_TIMEOUT).await?;
        let mut parsed: Value = serde_json::from_str(&body)
            .map_err(|e| SaavnHelperError::Decode(format!("镜像响应不是合法 JSON: {e}")))?;

        let upstream_status = parsed.get("status").cloned();
        let data = parsed
            .as_object_mut()
            .and_then(|obj| obj.remove("data"))
            .ok_or_else(|| {
                let message = parsed
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("镜像响应缺少 data 字段");
                SaavnHelperError::ApiError(message.to_string())
            })?;
        Ok((data, upstream_status))
    }

    /// 按链接取专辑，含专辑内歌曲列表。
    pub async fn album_by_link(&self, link: &str) -> Result<Value> {
        let url = format!(
            "{WORKER_BASE_URL}/albums?link={}",
            urlencoding::encode(link)
        );
        let (data, _) = self.fetch_envelope(&url).await?;
        Ok(fmt::normalize_album(data))
    }

    /// 全局搜索：一次返回歌曲 / 专辑 / 歌手 / 歌单多个分区。
    pub async fn global_search(&self, query: &str) -> Result<MirrorPayload> {
        let url = format!(
            "{VERCEL_BASE_URL}/search?query={}",
            urlencoding::encode(query)
        );
        let (data, upstream_status) = self.fetch_envelope(&url).await?;
        Ok(MirrorPayload {
            data: fmt::normalize_global_search(data),
            upstream_status,
        })
    }

    async fn search_section(
        &self,
        section: &str,
        kind: EntityKind,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<MirrorPayload> {
        let url = format!(
            "{WORKER_BASE_URL}/search/{section}?query={}&page={page}&limit={limit}",
            urlencoding::encode(query)
        );
        let (data, upstream_status) = self.fetch_envelope(&url).await?;
        Ok(MirrorPayload {
            data: fmt::normalize_search_section(kind, data),
            upstream_status,
        })
    }

    /// 歌曲搜索分区。
    pub async fn search_songs(&self, query: &str, page: u32, limit: u32) -> Result<MirrorPayload> {
        self.search_section("songs", EntityKind::SearchSong, query, page, limit)
            .await
    }

    /// 专辑搜索分区。
    pub async fn search_albums(&self, query: &str, page: u32, limit: u32) -> Result<MirrorPayload> {
        self.search_section("albums", EntityKind::SearchAlbum, query, page, limit)
            .await
    }

    /// 歌单搜索分区。
    pub async fn search_playlists(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<MirrorPayload> {
        self.search_section("playlists", EntityKind::SearchPlaylist, query, page, limit)
            .await
    }

    /// 歌手搜索分区。
    pub async fn search_artists(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<MirrorPayload> {
        self.search_section("artists", EntityKind::SearchArtist, query, page, limit)
            .await
    }

    /// 歌手详情（含热门歌曲 / 热门专辑 / 相似歌手）。
    pub async fn artist_details(&self, artist_id: &str) -> Result<Value> {
        let url = format!("{WORKER_BASE_URL}/artists/{artist_id}");
        let (data, _) = self.fetch_envelope(&url).await?;
        Ok(fmt::normalize_artist_details(data))
    }

    /// 歌手歌曲分页列表。排序参数在进入本方法前已严格校验。
    pub async fn artist_songs(
        &self,
        artist_id: &str,
        page: u32,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Value> {
        let url = format!(
            "{WORKER_BASE_URL}/artists/{artist_id}/songs?page={page}&sortBy={}&sortOrder={}",
            sort_by.as_str(),
            sort_order.as_str()
        );
        let (data, _) = self.fetch_envelope(&url).await?;
        Ok(fmt::normalize_artist_songs(data))
    }

    /// 歌手专辑分页列表。
    pub async fn artist_albums(
        &self,
        artist_id: &str,
        page: u32,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Value> {
        let url = format!(
            "{WORKER_BASE_URL}/artists/{artist_id}/albums?page={page}&sortBy={}&sortOrder={}",
            sort_by.as_str(),
            sort_order.as_str()
        );
        let (data, _) = self.fetch_envelope(&url).await?;
        Ok(fmt::normalize_artist_albums(data))
    }

    /// 歌曲推荐列表。
    pub async fn song_suggestions(&self, song_id: &str) -> Result<Value> {
        let url = format!("{VERCEL_BASE_URL}/songs/{song_id}/suggestions");
        let (data, _) = self.fetch_envelope(&url).await?;
        Ok(fmt::normalize_suggestions(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HttpFetcher;

    fn live_client() -> WorkerClient {
        WorkerClient::new(Arc::new(HttpFetcher::new()))
    }

    #[tokio::test]
    #[ignore]
    async fn test_search_albums_live() {
        let client = live_client();
        let payload = client.search_albums("Arijit", 1, 5).await.unwrap();
        let results = payload
            .data
            .get("results")
            .and_then(Value::as_array)
            .expect("专辑搜索应返回 results 列表");
        assert!(!results.is_empty(), "专辑搜索结果不应为空");
        println!("✅ 专辑搜索返回 {} 条", results.len());
    }

    #[tokio::test]
    #[ignore]
    async fn test_artist_details_live() {
        let client = live_client();
        let artist = client.artist_details("459320").await.unwrap();
        assert!(artist.get("name").is_some(), "歌手详情应带 name");
        assert!(
            artist.get("availableLanguages").is_none(),
            "availableLanguages 应被丢弃"
        );
        println!("✅ 歌手详情: {:?}", artist.get("name"));
    }
}

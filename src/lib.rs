#![warn(missing_docs)]

//! # Saavn Helper RS
//!
//! 一个 JioSaavn 聚合代理库：面向若干无文档的第三方音乐目录
//! HTTP API（一族旧版端点加多个社区托管的工作镜像），把它们
//! 形状各异的 JSON 确定性地规整为一套稳定的公共格式再发布。
//!
//! 每个请求都是两段流水线：
//!
//! 1. **解析**：自由文本 / 目录链接 / 不透明 id 被解析成对正确
//!    上游端点的调用序列（链接先换内部 id 再取详情）。
//! 2. **规整**：上游返回的原始 JSON 按实体类型走对应的纯变换，
//!    收敛图片 / 下载链接变体、抽取主创艺术家、做逐端点的键名
//!    改写。任何嵌套字段缺失都只降级为字段缺席，绝不中断。
//!
//! ## 用法
//!
//! ```rust,no_run
//! use saavn_helper_rs::SaavnHelper;
//!
//! async {
//!     let helper = SaavnHelper::new();
//!     match helper.search_songs("tum hi ho", false, true).await {
//!         Ok(songs) => println!("找到结果: {songs}"),
//!         Err(e) => eprintln!("发生错误: {e}"),
//!     }
//! };
//! ```

pub mod error;
pub mod fetch;
pub mod normalize;
pub mod providers;
pub mod quality;
pub mod resolver;
pub mod server;
pub mod value;

use std::sync::Arc;

use serde_json::Value;

pub use crate::{
    error::{Result, SaavnHelperError},
    providers::{legacy::BatchSongs, worker::MirrorPayload},
};

use crate::{
    fetch::{Fetcher, HttpFetcher},
    providers::{legacy::LegacyClient, worker::WorkerClient},
    resolver::{LinkKind, SortBy, SortOrder},
};

/// 顶层聚合代理客户端，封装两族上游，为调用方提供统一入口。
///
/// 这是与本库交互的主要入口点。内部不持有任何跨请求的可变状态，
/// 可以被任意多的并发请求共享。
#[derive(Clone)]
pub struct SaavnHelper {
    legacy: LegacyClient,
    worker: WorkerClient,
}

impl Default for SaavnHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl SaavnHelper {
    /// 创建一个使用真实 HTTP 抓取器的实例。
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// 用外部传入的抓取器创建实例（测试里注入内存假实现）。
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            legacy: LegacyClient::new(fetcher.clone()),
            worker: WorkerClient::new(fetcher),
        }
    }

    /// 搜索歌曲。
    ///
    /// 输入是目录链接时直接解析成单曲；否则走旧版搜索端点。
    /// `songdata` 为真时对每个结果 id 取完整详情（单条失败只会
    /// 让那一条消失）；为假时返回搜索端点的原始条目。
    pub async fn search_songs(&self, query: &str, lyrics: bool, songdata: bool) -> Result<Value> {
        if query.is_empty() {
            return Err(SaavnHelperError::Input(
                "Query is required to search songs!".to_string(),
            ));
        }

        if resolver::is_catalog_link(query) {
            let body = self.legacy.fetch_page(query).await?;
            let id = resolver::extract_song_id(&body)?;
            return self.legacy.get_song(&id, lyrics).await;
        }

        let results = self.legacy.search_songs_raw(query).await?;
        if !songdata {
            return Ok(Value::Array(results));
        }
        let songs = self.legacy.fetch_songs_for_results(results, lyrics).await;
        Ok(Value::Array(songs))
    }

    /// 按 id 取单曲。
    pub async fn get_song(&self, id: &str, lyrics: bool) -> Result<Value> {
        if id.is_empty() {
            return Err(SaavnHelperError::Input(
                "Song ID is required to get a song!".to_string(),
            ));
        }
        self.legacy.get_song(id, lyrics).await
    }

    /// 批量取歌，一次请求最多 100 个 id。
    pub async fn get_songs(&self, ids: &[String], lyrics: bool) -> Result<BatchSongs> {
        const MAX_BATCH_IDS: usize = 100;
        if ids.len() > MAX_BATCH_IDS {
            return Err(SaavnHelperError::Input(format!(
                "Too many song IDs: {} (maximum {MAX_BATCH_IDS} per request)",
                ids.len()
            )));
        }
        self.legacy.get_songs(ids, lyrics).await
    }

    /// 按目录链接取专辑：先从页面正文切出专辑 id，再调工作镜像。
    ///
    /// `lyrics` 为真时为专辑内声明有歌词的歌曲逐条内联歌词全文，
    /// 单条获取失败只降级为缺席。
    pub async fn album_by_link(&self, link: &str, lyrics: bool) -> Result<Value> {
        let body = self.legacy.fetch_page(link).await?;
        let album_id = resolver::extract_album_id(&body)?;
        // 镜像的 link 参数历史上就收这个切出来的 id，保持不变
        let mut album = self.worker.album_by_link(&album_id).await?;

        if lyrics
            && let Some(songs) = album
                .as_object_mut()
                .and_then(|obj| obj.get_mut("songs"))
                .and_then(Value::as_array_mut)
        {
            for song in songs {
                if !normalize::legacy::has_lyrics(song) {
                    continue;
                }
                let Some(id) = song.get("id").and_then(Value::as_str).map(str::to_owned)
                else {
                    continue;
                };
                match self.legacy.get_lyrics(&id).await {
                    Ok(text) => {
                        if let Some(obj) = song.as_object_mut() {
                            obj.insert("lyrics".to_string(), Value::String(text));
                        }
                    }
                    Err(e) => tracing::warn!("为专辑歌曲 {id} 获取歌词失败: {e}"),
                }
            }
        }
        Ok(album)
    }

    /// 按目录链接取歌单：先切出歌单 id，再走旧版歌单端点。
    pub async fn playlist_by_link(&self, link: &str, lyrics: bool) -> Result<Value> {
        let body = self.legacy.fetch_page(link).await?;
        let list_id = resolver::extract_playlist_id(&body)?;
        self.legacy.get_playlist(&list_id, lyrics).await
    }

    /// 取歌词：输入可以是目录链接（先换 id）或直接给歌曲 id。
    pub async fn lyrics(&self, query: &str) -> Result<String> {
        if query.contains("http") && query.contains("saavn") {
            let body = self.legacy.fetch_page(query).await?;
            let id = resolver::extract_song_id(&body)?;
            self.legacy.get_lyrics(&id).await
        } else {
            self.legacy.get_lyrics(query).await
        }
    }

    /// 统一入口：自由文本走搜索，目录链接按类别分派到
    /// 单曲 / 专辑 / 歌单，未识别的链接直接报输入错误。
    pub async fn resolve(&self, query: &str, lyrics: bool) -> Result<Value> {
        if !query.contains("saavn") {
            return self.search_songs(query, lyrics, true).await;
        }
        match resolver::classify_link(query)? {
            LinkKind::Song => {
                let body = self.legacy.fetch_page(query).await?;
                let id = resolver::extract_song_id(&body)?;
                self.legacy.get_song(&id, lyrics).await
            }
            LinkKind::Album => self.album_by_link(query, lyrics).await,
            LinkKind::Playlist => self.playlist_by_link(query, lyrics).await,
        }
    }

    /// 全局搜索（歌曲 / 专辑 / 歌手 / 歌单多分区）。
    pub async fn global_search(&self, query: &str) -> Result<MirrorPayload> {
        self.worker.global_search(query).await
    }

    /// 单分区搜索。`section` 取 songs / albums / playlists / artists。
    pub async fn search_section(
        &self,
        section: &str,
        query: &str,
        page: u32,
        limit: Option<u32>,
    ) -> Result<MirrorPayload> {
        let limit = resolver::clamp_limit(limit);
        match section {
            "songs" => self.worker.search_songs(query, page, limit).await,
            "albums" => self.worker.search_albums(query, page, limit).await,
            "playlists" => self.worker.search_playlists(query, page, limit).await,
            "artists" => self.worker.search_artists(query, page, limit).await,
            other => Err(SaavnHelperError::Input(format!(
                "Unknown search section: '{other}'"
            ))),
        }
    }

    /// 歌手详情。
    pub async fn artist_details(&self, artist_id: &str) -> Result<Value> {
        self.worker.artist_details(artist_id).await
    }

    /// 歌手歌曲分页。排序参数先严格校验，非法值不发起上游请求。
    pub async fn artist_songs(
        &self,
        artist_id: &str,
        page: u32,
        sort_by: &str,
        sort_order: &str,
    ) -> Result<Value> {
        let sort_by = SortBy::parse(sort_by)?;
        let sort_order = SortOrder::parse(sort_order)?;
        self.worker
            .artist_songs(artist_id, page, sort_by, sort_order)
            .await
    }

    /// 歌手专辑分页。排序参数同样先严格校验。
    pub async fn artist_albums(
        &self,
        artist_id: &str,
        page: u32,
        sort_by: &str,
        sort_order: &str,
    ) -> Result<Value> {
        let sort_by = SortBy::parse(sort_by)?;
        let sort_order = SortOrder::parse(sort_order)?;
        self.worker
            .artist_albums(artist_id, page, sort_by, sort_order)
            .await
    }

    /// 歌曲推荐。
    pub async fn song_suggestions(&self, song_id: &str) -> Result<Value> {
        self.worker.song_suggestions(song_id).await
    }
}

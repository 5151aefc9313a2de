//! 解析层：把调用方给的自由文本 / 目录链接 / 不透明 id
//! 变成正确的上游请求计划。
//!
//! 旧版站点不提供"链接换 id"的正式接口，只能在取回的页面正文里
//! 定位两个已知的 JSON 片段标记做字符串切割。两个标记都找不到时
//! 以 `DataExtraction` 错误收场，绝不猜测。

use std::time::Duration;

use crate::error::{Result, SaavnHelperError};

/// 目录域名标记，带此标记的输入按链接处理而不是当搜索词。
pub const CATALOG_DOMAIN: &str = "saavn.com";

/// 判断输入是否是一条目录链接。
pub fn is_catalog_link(query: &str) -> bool {
    query.starts_with("http") && query.contains(CATALOG_DOMAIN)
}

/// 目录链接指向的实体类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// 单曲链接（路径含 `/song/`）
    Song,
    /// 专辑链接（路径含 `/album/`）
    Album,
    /// 歌单链接（路径含 `/playlist/` 或 `/featured/`）
    Playlist,
}

/// 按路径片段对目录链接分类。
///
/// 原始实现把所有非歌曲非专辑的链接都当歌单处理（一处运算符
/// 优先级失误导致的恒真分支）；这里按澄清后的语义明确分四路，
/// 无法识别的链接直接报输入错误。
pub fn classify_link(url: &str) -> Result<LinkKind> {
    if url.contains("/song/") {
        Ok(LinkKind::Song)
    } else if url.contains("/album/") {
        Ok(LinkKind::Album)
    } else if url.contains("/playlist/") || url.contains("/featured/") {
        Ok(LinkKind::Playlist)
    } else {
        Err(SaavnHelperError::Input(format!(
            "Unrecognized Saavn link: {url}"
        )))
    }
}

fn between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let (_, tail) = haystack.split_once(start)?;
    let (found, _) = tail.split_once(end)?;
    Some(found)
}

/// 从页面正文中切出歌曲 pid。
///
/// 先找 `"pid":"` 标记；缺失时走 `"song":{"type":"` 开头、
/// `"id":"` 结尾的回退标记串。
pub fn extract_song_id(body: &str) -> Result<String> {
    if let Some(pid) = between(body, "\"pid\":\"", "\",\"") {
        return Ok(pid.to_string());
    }

    let fallback = between(body, "\"song\":{\"type\":\"", "\",\"image\":")
        .and_then(|segment| segment.rsplit_once("\"id\":\"").map(|(_, id)| id));
    match fallback {
        Some(id) => Ok(id.to_string()),
        None => Err(SaavnHelperError::DataExtraction(
            "页面正文中找不到歌曲 id 标记".to_string(),
        )),
    }
}

/// 从页面正文中切出专辑 id。
pub fn extract_album_id(body: &str) -> Result<String> {
    if let Some(id) = between(body, "\"album_id\":\"", "\"") {
        return Ok(id.to_string());
    }
    match between(body, "\"page_id\",\"", "\",\"") {
        Some(id) => Ok(id.to_string()),
        None => Err(SaavnHelperError::DataExtraction(
            "页面正文中找不到专辑 id 标记".to_string(),
        )),
    }
}

/// 从页面正文中切出歌单 id。
pub fn extract_playlist_id(body: &str) -> Result<String> {
    if let Some(id) = between(body, "\"type\":\"playlist\",\"id\":\"", "\"") {
        return Ok(id.to_string());
    }
    match between(body, "\"page_id\",\"", "\",\"") {
        Some(id) => Ok(id.to_string()),
        None => Err(SaavnHelperError::DataExtraction(
            "页面正文中找不到歌单 id 标记".to_string(),
        )),
    }
}

/// 批量取歌的超时：`min(60, 15 + 0.5 × 条数)` 秒。
///
/// 上游延迟随批量大小增长，这个标定必须保留。
pub fn batch_timeout(count: usize) -> Duration {
    const BASE_SECS: f64 = 15.0;
    const PER_ITEM_SECS: f64 = 0.5;
    const CAP_SECS: f64 = 60.0;
    let secs = (BASE_SECS + PER_ITEM_SECS * count as f64).min(CAP_SECS);
    Duration::from_secs_f64(secs)
}

/// 歌手列表接口的排序字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// 按最新发布
    Latest,
    /// 按热门程度
    Popularity,
}

impl SortBy {
    /// 严格解析，任何其他取值都是输入错误（不会发起上游请求）。
    pub fn parse(text: &str) -> Result<Self> {
        match text {
            "latest" => Ok(Self::Latest),
            "popularity" => Ok(Self::Popularity),
            other => Err(SaavnHelperError::Input(format!(
                "Invalid sortBy value: '{other}'. Expected 'latest' or 'popularity'."
            ))),
        }
    }

    /// 上游查询参数里的写法。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Popularity => "popularity",
        }
    }
}

/// 歌手列表接口的排序方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// 升序
    Asc,
    /// 降序
    Desc,
}

impl SortOrder {
    /// 严格解析，任何其他取值都是输入错误。
    pub fn parse(text: &str) -> Result<Self> {
        match text {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(SaavnHelperError::Input(format!(
                "Invalid sortOrder value: '{other}'. Expected 'asc' or 'desc'."
            ))),
        }
    }

    /// 上游查询参数里的写法。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// 搜索结果条数上限：默认 10，夹在 [1, 50]。
pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(10).clamp(1, 50)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_marker_wins_over_fallback() {
        let body = r#"junk "pid":"abc123","more":1 "song":{"type":"x","id":"zzz","image":"i""#;
        assert_eq!(extract_song_id(body).unwrap(), "abc123");
    }

    #[test]
    fn song_id_fallback_marker_sequence() {
        let body = r#"prefix "song":{"type":"song","id":"fallback9","image":"cover" suffix"#;
        assert_eq!(extract_song_id(body).unwrap(), "fallback9");
    }

    #[test]
    fn missing_markers_fail_with_extraction_error() {
        let err = extract_song_id("no markers here").unwrap_err();
        assert!(matches!(err, SaavnHelperError::DataExtraction(_)));
    }

    #[test]
    fn album_and_playlist_markers() {
        assert_eq!(
            extract_album_id(r#"x"album_id":"1001"y"#).unwrap(),
            "1001"
        );
        assert_eq!(
            extract_album_id(r#"x"page_id","2002","z""#).unwrap(),
            "2002"
        );
        assert_eq!(
            extract_playlist_id(r#"x"type":"playlist","id":"3003"y"#).unwrap(),
            "3003"
        );
    }

    #[test]
    fn link_classification_is_explicit() {
        assert_eq!(
            classify_link("https://www.jiosaavn.com/song/x/abc").unwrap(),
            LinkKind::Song
        );
        assert_eq!(
            classify_link("https://www.jiosaavn.com/album/x").unwrap(),
            LinkKind::Album
        );
        assert_eq!(
            classify_link("https://www.jiosaavn.com/featured/mix").unwrap(),
            LinkKind::Playlist
        );
        // 不再把一切未知链接当歌单
        assert!(classify_link("https://www.jiosaavn.com/artist/x").is_err());
    }

    #[test]
    fn batch_timeout_scales_and_caps() {
        assert_eq!(batch_timeout(10), Duration::from_secs_f64(20.0));
        assert_eq!(batch_timeout(200), Duration::from_secs_f64(60.0));
        assert_eq!(batch_timeout(0), Duration::from_secs_f64(15.0));
    }

    #[test]
    fn sort_params_reject_unknown_values() {
        assert!(SortBy::parse("latest").is_ok());
        assert!(matches!(
            SortBy::parse("bogus"),
            Err(SaavnHelperError::Input(_))
        ));
        assert!(SortOrder::parse("desc").is_ok());
        assert!(matches!(
            SortOrder::parse("down"),
            Err(SaavnHelperError::Input(_))
        ));
    }

    #[test]
    fn limit_clamping() {
        assert_eq!(clamp_limit(None), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), 50);
        assert_eq!(clamp_limit(Some(25)), 25);
    }

    #[test]
    fn catalog_link_detection() {
        assert!(is_catalog_link("https://www.jiosaavn.com/song/x"));
        assert!(!is_catalog_link("tum hi ho"));
        assert!(!is_catalog_link("www.jiosaavn.com/song/x"));
    }
}

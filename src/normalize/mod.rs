//! 实体规整层：把上游返回的异构 JSON 确定性地压平为稳定的公共格式。
//!
//! 不同端点、不同实体类型输出的字段名并不一致（`primaryArtists` /
//! `primary_artists` / `primaryartist`），这是上游与历史格式演化留下的
//! 真实差异，调用方已经依赖这些字段名，不能"修正"统一。这里用一张
//! 显式的 [`FieldPolicy`] 查表来表达这份差异，而不是把分支散落在各处。
//!
//! 所有规整函数都是纯函数：相同输入永远产出相同输出；任何嵌套字段的
//! 缺失或畸形只会让对应的输出字段缺席，绝不会中断兄弟字段的规整。

use serde_json::{Map, Value};

use crate::{
    quality::{best_download_url, best_image_url},
    value::{ValueExt, remove_keys, rename_key},
};

pub mod legacy;
pub mod worker;

/// 规整目标的实体类型标签，决定使用哪一行字段策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// 全局搜索结果中的歌曲条目
    SearchSong,
    /// 专辑搜索结果条目
    SearchAlbum,
    /// 歌单搜索结果条目
    SearchPlaylist,
    /// 歌手搜索结果条目
    SearchArtist,
    /// 按链接取回的专辑根对象
    AlbumRoot,
    /// 专辑内的歌曲条目
    AlbumSong,
    /// 歌手详情根对象
    ArtistRoot,
    /// 歌手歌曲分页列表中的条目
    ArtistSong,
    /// 歌手专辑分页列表中的条目
    ArtistAlbum,
    /// 歌手详情中的热门歌曲条目
    ArtistTopSong,
    /// 歌手详情中的热门专辑条目
    ArtistTopAlbum,
    /// 歌手详情中的相似歌手条目
    SimilarArtist,
    /// 歌曲推荐列表中的条目
    SuggestedSong,
}

/// 下载链接列表的收敛策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPolicy {
    /// 该实体不输出下载字段
    Skip,
    /// 收敛为 `media_url` 字符串
    MediaUrl,
    /// 原地收敛：`downloadUrl` 从变体数组变为单个字符串
    DownloadUrl,
}

/// 一行字段策略：某实体类型规整后各公共字段叫什么名字。
#[derive(Debug, Clone, Copy)]
pub struct FieldPolicy {
    /// 主创艺术家收敛后的输出键名，`None` 表示该实体不输出此字段
    pub artist_key: Option<&'static str>,
    /// 下载链接收敛策略
    pub download: DownloadPolicy,
    /// `url` 改名后的目标键名
    pub url_rename: Option<&'static str>,
    /// `name` 改名后的目标键名
    pub title_rename: Option<&'static str>,
    /// 是否无条件丢弃歌曲条目上嵌套的 `album` 子对象
    pub drop_album_object: bool,
}

/// 每实体类型一行的字段名对照表。
///
/// 表中的不一致来自上游格式演化，按端点原样保留。
pub fn policy(kind: EntityKind) -> FieldPolicy {
    use DownloadPolicy::{DownloadUrl, MediaUrl, Skip};
    match kind {
        EntityKind::SearchSong => FieldPolicy {
            artist_key: Some("primaryArtists"),
            download: MediaUrl,
            url_rename: Some("perma_url"),
            title_rename: None,
            drop_album_object: true,
        },
        EntityKind::SearchAlbum => FieldPolicy {
            artist_key: Some("primaryArtists"),
            download: Skip,
            url_rename: Some("album_url"),
            title_rename: None,
            drop_album_object: false,
        },
        EntityKind::SearchPlaylist => FieldPolicy {
            artist_key: None,
            download: Skip,
            url_rename: Some("playlist_url"),
            title_rename: None,
            drop_album_object: false,
        },
        EntityKind::SearchArtist => FieldPolicy {
            artist_key: None,
            download: Skip,
            url_rename: None,
            title_rename: None,
            drop_album_object: false,
        },
        EntityKind::AlbumRoot => FieldPolicy {
            artist_key: Some("primary_artists"),
            download: Skip,
            url_rename: Some("album_url"),
            title_rename: Some("album"),
            drop_album_object: false,
        },
        EntityKind::AlbumSong | EntityKind::ArtistSong => FieldPolicy {
            artist_key: Some("primary_artists"),
            download: MediaUrl,
            url_rename: Some("perma_url"),
            title_rename: Some("song"),
            drop_album_object: true,
        },
        EntityKind::ArtistAlbum => FieldPolicy {
            artist_key: Some("primary_artists"),
            download: Skip,
            url_rename: Some("album_url"),
            title_rename: Some("album"),
            drop_album_object: false,
        },
        EntityKind::ArtistRoot => FieldPolicy {
            artist_key: None,
            download: Skip,
            url_rename: None,
            title_rename: None,
            drop_album_object: false,
        },
        EntityKind::ArtistTopSong | EntityKind::SuggestedSong => FieldPolicy {
            artist_key: Some("primaryartist"),
            download: DownloadUrl,
            url_rename: Some("perma_url"),
            title_rename: None,
            drop_album_object: true,
        },
        EntityKind::ArtistTopAlbum => FieldPolicy {
            artist_key: Some("primaryartist"),
            download: Skip,
            url_rename: Some("album_url"),
            title_rename: None,
            drop_album_object: false,
        },
        EntityKind::SimilarArtist => FieldPolicy {
            artist_key: None,
            download: Skip,
            url_rename: None,
            title_rename: None,
            drop_album_object: false,
        },
    }
}

/// 从嵌套的艺术家结构中抽出 "primary" 分组并用 `", "` 连接姓名。
///
/// 兼容两代上游格式：新格式是 `artists.primary` 的对象数组，
/// 旧格式是顶层 `primaryArtists` 的数组或字符串。分组为空时返回
/// `None`，调用方应省略输出字段而不是写入空字符串。
fn primary_artist_names(obj: &Map<String, Value>) -> Option<String> {
    fn joined(list: &[Value]) -> Option<String> {
        let names: Vec<&str> = list
            .iter()
            .filter_map(|entry| entry.str_at("name").or_else(|| entry.as_str()))
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    if let Some(primary) = obj
        .get("artists")
        .and_then(|artists| artists.get("primary"))
        .and_then(Value::as_array)
        && let Some(names) = joined(primary)
    {
        return Some(names);
    }

    match obj.get("primaryArtists") {
        Some(Value::Array(list)) => joined(list),
        Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
        _ => None,
    }
}

/// 把原始的图片变体数组收敛为单个 `image` 字符串。
///
/// 已经是字符串的保持原样；数组走质量挑选器；挑不出或类型畸形
/// 则整个键被移除（字段缺席）。
fn collapse_image(obj: &mut Map<String, Value>) {
    let collapsed = match obj.get("image") {
        Some(raw) if raw.is_array() => Some(best_image_url(raw)),
        Some(raw) if !raw.is_string() => Some(None),
        _ => None,
    };
    if let Some(best) = collapsed {
        match best {
            Some(url) => {
                obj.insert("image".to_string(), Value::String(url));
            }
            None => {
                obj.remove("image");
            }
        }
    }
}

/// 对单条记录应用 `kind` 对应的字段策略。
///
/// 输入不是对象时原样返回。每个被消费掉的原始键（图片变体数组、
/// 艺术家结构、下载变体数组、原 `url` / `name`）都会被移除，
/// 输出里绝不会同时出现原始数组和收敛后的标量。
pub fn apply(kind: EntityKind, mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    let policy = policy(kind);

    collapse_image(obj);

    let names = primary_artist_names(obj);
    remove_keys(obj, &["artists", "primaryArtists", "featuredArtists"]);
    if let Some(key) = policy.artist_key
        && let Some(names) = names
    {
        obj.insert(key.to_string(), Value::String(names));
    }

    match policy.download {
        DownloadPolicy::Skip => {}
        DownloadPolicy::MediaUrl => {
            let best = obj.get("downloadUrl").and_then(best_download_url);
            obj.remove("downloadUrl");
            if let Some(url) = best
                && !obj.contains_key("media_url")
            {
                obj.insert("media_url".to_string(), Value::String(url));
            }
        }
        DownloadPolicy::DownloadUrl => {
            let best = obj.get("downloadUrl").and_then(best_download_url);
            obj.remove("downloadUrl");
            if let Some(url) = best {
                obj.insert("downloadUrl".to_string(), Value::String(url));
            }
        }
    }

    if let Some(target) = policy.url_rename {
        rename_key(obj, "url", target);
    }
    if let Some(target) = policy.title_rename {
        rename_key(obj, "name", target);
    }

    if policy.drop_album_object && obj.get("album").is_some_and(Value::is_object) {
        obj.remove("album");
    }

    value
}

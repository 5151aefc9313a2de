//! 工作镜像（worker-mirror）格式族的规整路径。
//!
//! 社区镜像返回的 JSON 比旧版端点规整得多，但字段命名仍按
//! `normalize::policy` 的对照表逐端点处理。本模块的函数都是
//! `Value -> Value` 的纯变换，不发起任何网络请求。

use serde_json::Value;

use super::{EntityKind, apply};
use crate::value::remove_keys;

/// 把列表键下的每个元素按 `kind` 规整，列表缺失或畸形时不动。
fn map_list(value: &mut Value, key: &str, kind: EntityKind) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    if let Some(Value::Array(items)) = obj.remove(key) {
        let mapped: Vec<Value> = items.into_iter().map(|item| apply(kind, item)).collect();
        obj.insert(key.to_string(), Value::Array(mapped));
    }
}

/// 规整全局搜索响应：对每个已知分区的 `results` 列表套用对应策略。
///
/// 未知分区原样保留，缺失的分区跳过。
pub fn normalize_global_search(mut data: Value) -> Value {
    const SECTIONS: [(&str, EntityKind); 5] = [
        ("topQuery", EntityKind::SearchSong),
        ("songs", EntityKind::SearchSong),
        ("albums", EntityKind::SearchAlbum),
        ("artists", EntityKind::SearchArtist),
        ("playlists", EntityKind::SearchPlaylist),
    ];
    if let Some(obj) = data.as_object_mut() {
        for (section, kind) in SECTIONS {
            if let Some(block) = obj.get_mut(section) {
                map_list(block, "results", kind);
            }
        }
    }
    data
}

/// 规整单分区搜索响应（歌曲 / 专辑 / 歌单 / 歌手搜索端点）。
pub fn normalize_search_section(kind: EntityKind, mut data: Value) -> Value {
    map_list(&mut data, "results", kind);
    data
}

/// 规整按链接取回的专辑：根对象套 [`EntityKind::AlbumRoot`]，
/// `songs` 列表逐条套 [`EntityKind::AlbumSong`]。
pub fn normalize_album(data: Value) -> Value {
    let mut root = apply(EntityKind::AlbumRoot, data);
    map_list(&mut root, "songs", EntityKind::AlbumSong);
    root
}

/// 规整歌手详情。
///
/// 根对象只收敛图片；`availableLanguages` 与 `singles` 是历史噪声，
/// 无条件丢弃；三个子列表各按自己的策略行处理。
pub fn normalize_artist_details(data: Value) -> Value {
    let mut root = apply(EntityKind::ArtistRoot, data);
    if let Some(obj) = root.as_object_mut() {
        remove_keys(obj, &["availableLanguages", "singles"]);
    }
    map_list(&mut root, "topSongs", EntityKind::ArtistTopSong);
    map_list(&mut root, "topAlbums", EntityKind::ArtistTopAlbum);
    map_list(&mut root, "similarArtists", EntityKind::SimilarArtist);
    root
}

/// 规整歌手歌曲分页响应。镜像的不同版本把列表放在 `songs` 或
/// `results` 下，两个键都处理。
pub fn normalize_artist_songs(mut data: Value) -> Value {
    map_list(&mut data, "songs", EntityKind::ArtistSong);
    map_list(&mut data, "results", EntityKind::ArtistSong);
    data
}

/// 规整歌手专辑分页响应。
pub fn normalize_artist_albums(mut data: Value) -> Value {
    map_list(&mut data, "albums", EntityKind::ArtistAlbum);
    map_list(&mut data, "results", EntityKind::ArtistAlbum);
    data
}

/// 规整歌曲推荐列表（顶层就是一个数组）。
pub fn normalize_suggestions(data: Value) -> Value {
    match data {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| apply(EntityKind::SuggestedSong, item))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn album_root_and_songs_both_normalized() {
        let raw = json!({
            "id": "al1",
            "name": "Album One",
            "url": "https://example/album",
            "image": [{"quality": "500x500", "url": "cover"}],
            "artists": {"primary": [{"name": "A"}]},
            "songs": [{
                "id": "s1",
                "name": "Track",
                "url": "https://example/track",
                "image": [{"quality": "150x150", "url": "ti"}],
                "artists": {"primary": [{"name": "A"}, {"name": "B"}]},
                "downloadUrl": [
                    {"quality": "96", "url": "d96"},
                    {"quality": "320", "url": "d320"},
                ],
                "album": {"id": "al1", "name": "Album One"},
            }],
        });

        let out = normalize_album(raw);
        assert_eq!(out.get("album"), Some(&json!("Album One")));
        assert_eq!(out.get("album_url"), Some(&json!("https://example/album")));
        assert_eq!(out.get("primary_artists"), Some(&json!("A")));
        assert_eq!(out.get("image"), Some(&json!("cover")));

        let song = &out.get("songs").unwrap().as_array().unwrap()[0];
        assert_eq!(song.get("song"), Some(&json!("Track")));
        assert_eq!(song.get("primary_artists"), Some(&json!("A, B")));
        assert_eq!(song.get("media_url"), Some(&json!("d320")));
        assert_eq!(song.get("perma_url"), Some(&json!("https://example/track")));
        assert!(song.get("album").is_none());
        assert!(song.get("downloadUrl").is_none());
    }

    #[test]
    fn artist_details_drop_noise_and_keep_sublists() {
        let raw = json!({
            "id": "ar1",
            "name": "Artist",
            "image": [{"quality": "500x500", "url": "ai"}],
            "availableLanguages": ["hindi"],
            "singles": [{"id": "x"}],
            "topSongs": [{
                "name": "Hot",
                "artists": {"primary": [{"name": "Artist"}]},
                "downloadUrl": [{"quality": "320", "url": "d"}],
            }],
            "topAlbums": [{
                "name": "Best Of",
                "artists": {"primary": [{"name": "Artist"}]},
                "url": "au",
            }],
            "similarArtists": [{"name": "Other", "image": [{"quality": "150x150", "url": "oi"}]}],
        });

        let out = normalize_artist_details(raw);
        assert!(out.get("availableLanguages").is_none());
        assert!(out.get("singles").is_none());
        assert_eq!(out.get("image"), Some(&json!("ai")));

        let top_song = &out.get("topSongs").unwrap().as_array().unwrap()[0];
        assert_eq!(top_song.get("primaryartist"), Some(&json!("Artist")));
        assert_eq!(top_song.get("downloadUrl"), Some(&json!("d")));

        let top_album = &out.get("topAlbums").unwrap().as_array().unwrap()[0];
        assert_eq!(top_album.get("primaryartist"), Some(&json!("Artist")));
        assert_eq!(top_album.get("album_url"), Some(&json!("au")));

        let similar = &out.get("similarArtists").unwrap().as_array().unwrap()[0];
        assert_eq!(similar.get("image"), Some(&json!("oi")));
        assert!(similar.get("primaryartist").is_none());
    }

    #[test]
    fn global_search_sections_use_their_own_field_names() {
        let raw = json!({
            "albums": {"results": [{
                "name": "Al",
                "artists": {"primary": [{"name": "A"}]},
                "url": "u",
            }]},
            "playlists": {"results": [{"name": "Pl", "url": "pu"}]},
            "unknownSection": {"results": [{"keep": true}]},
        });

        let out = normalize_global_search(raw);
        let album = &out.get("albums").unwrap().get("results").unwrap()[0];
        assert_eq!(album.get("primaryArtists"), Some(&json!("A")));
        assert_eq!(album.get("album_url"), Some(&json!("u")));

        let playlist = &out.get("playlists").unwrap().get("results").unwrap()[0];
        assert_eq!(playlist.get("playlist_url"), Some(&json!("pu")));
        assert!(playlist.get("primaryArtists").is_none());

        // 未知分区不动
        assert_eq!(
            out.get("unknownSection").unwrap().get("results").unwrap()[0],
            json!({"keep": true})
        );
    }

    #[test]
    fn malformed_lists_do_not_abort_siblings() {
        let raw = json!({
            "topSongs": "garbage",
            "topAlbums": [{"name": "Ok", "url": "u"}],
        });
        let out = normalize_artist_details(raw);
        assert_eq!(out.get("topSongs"), Some(&json!("garbage")));
        let album = &out.get("topAlbums").unwrap().as_array().unwrap()[0];
        assert_eq!(album.get("album_url"), Some(&json!("u")));
    }

    #[test]
    fn suggestions_normalize_each_entry() {
        let raw = json!([{
            "name": "Sug",
            "artists": {"primary": [{"name": "A"}]},
            "downloadUrl": [
                {"quality": "96", "url": "d96"},
                {"quality": "320", "url": "d320"},
            ],
        }]);
        let out = normalize_suggestions(raw);
        let song = &out.as_array().unwrap()[0];
        assert_eq!(song.get("primaryartist"), Some(&json!("A")));
        assert_eq!(song.get("downloadUrl"), Some(&json!("d320")));
    }
}

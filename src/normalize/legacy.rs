//! 旧版端点（jiosaavn.com `api.php`）格式族的规整路径。
//!
//! 这是为旧版上游保留的独立实现：返回的结构更丰富，也不做
//! worker 路径那套键名改写。两条路径不能合并，调用方分别依赖
//! 各自的输出格式。

use serde_json::Value;

use crate::quality::best_image_url;
use crate::value::ValueExt;

/// 旧版响应里少量字段带着 HTML 实体转义，原样还原。
fn decode_html_entities(text: &str) -> String {
    text.replace("&quot;", "'")
        .replace("&amp;", "&")
        .replace("&#039;", "'")
}

fn decode_entity_fields(obj: &mut serde_json::Map<String, Value>) {
    for key in ["song", "album", "primary_artists", "singers", "starring"] {
        if let Some(Value::String(text)) = obj.get(key) {
            let decoded = decode_html_entities(text);
            obj.insert(key.to_string(), Value::String(decoded));
        }
    }
}

/// 规整一条旧版歌曲详情。
///
/// - 图片：变体数组走共用挑选器；字符串则把缩略档升到 500x500。
/// - `media_url` 缺失时从 `media_preview_url` 推导（预览域名换成
///   音频域名、96k 预览片段换成 320k 正式片段），推导后预览键被消费。
/// - 其余字段原样保留，不做键名改写。
pub fn format_song(mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };

    let collapsed = match obj.get("image") {
        Some(raw) if raw.is_array() => Some(best_image_url(raw)),
        Some(Value::String(url)) => Some(Some(url.replace("150x150", "500x500"))),
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

    if !obj.contains_key("media_url")
        && let Some(preview) = value_str(obj.get("media_preview_url"))
    {
        let media = preview
            .replace("preview.saavncdn.com", "aac.saavncdn.com")
            .replace("_96_p.mp4", "_320.mp4");
        obj.insert("media_url".to_string(), Value::String(media));
        obj.remove("media_preview_url");
    }

    decode_entity_fields(obj);
    value
}

fn value_str(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}

/// 规整旧版歌单详情：根部图片升档，`songs` 列表逐条走 [`format_song`]。
///
/// 单条歌曲畸形不会中断整单规整。
pub fn format_playlist(mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };

    if let Some(Value::String(image)) = obj.get("image") {
        let upgraded = image.replace("150x150", "500x500");
        obj.insert("image".to_string(), Value::String(upgraded));
    }

    if let Some(Value::Array(songs)) = obj.remove("songs") {
        let formatted: Vec<Value> = songs.into_iter().map(format_song).collect();
        obj.insert("songs".to_string(), Value::Array(formatted));
    }

    value
}

/// 判断一条歌曲是否声明有歌词，供调用方决定是否再取歌词全文。
///
/// 旧版端点写 `has_lyrics`（布尔或 `"true"` 字符串），工作镜像
/// 写 `hasLyrics`，两种拼写都认。
pub fn has_lyrics(song: &Value) -> bool {
    let flag = song.get("has_lyrics").or_else(|| song.get("hasLyrics"));
    match flag {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text == "true",
        _ => false,
    }
}

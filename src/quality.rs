//! 质量挑选器：从多档图片 / 下载链接变体里挑出最优的一条。
//!
//! 所有实体规整器都复用这两个函数，以保证各实体类型之间
//! 并列取最大时的平手裁决行为完全一致（首次出现者胜出）。

use serde_json::Value;

use crate::value::ValueExt;

/// 图片分辨率的固定排名表，未识别的档位记 0。
fn image_rank(variant: &Value) -> u32 {
    match variant.str_at("quality") {
        Some("500x500") => 4,
        Some("480x480") => 3,
        Some("320x320") => 2,
        Some("150x150") => 1,
        _ => 0,
    }
}

/// 从图片变体列表里挑出最佳分辨率对应的 URL。
///
/// 平手时保留先出现的一条（稳定取最大）。胜出变体没有可用的
/// `url` 字段时回退到列表第一个元素。输入为空、缺失或根本不是
/// 数组时返回 `None`。列表中混入非对象元素只会被记为 0 分，
/// 永远不会导致失败。
pub fn best_image_url(variants: &Value) -> Option<String> {
    let list = variants.as_array()?;
    let first = list.first()?;

    let mut best = first;
    let mut best_rank = image_rank(best);
    for variant in &list[1..] {
        let rank = image_rank(variant);
        if rank > best_rank {
            best = variant;
            best_rank = rank;
        }
    }

    best.str_at("url")
        .or_else(|| first.str_at("url"))
        .map(str::to_owned)
}

/// 码率排名：`quality` 字段能整体解析为整数时用其数值，
/// 否则按 URL 子串猜测 320 / 160 / 96，再不然记 0。
fn download_rank(variant: &Value) -> u32 {
    if let Some(quality) = variant.str_at("quality")
        && let Ok(bitrate) = quality.trim().parse::<u32>()
    {
        return bitrate;
    }
    match variant.str_at("url") {
        Some(url) if url.contains("320") => 320,
        Some(url) if url.contains("160") => 160,
        Some(url) if url.contains("96") => 96,
        _ => 0,
    }
}

/// 从下载链接变体列表里挑出最高码率对应的 URL。
///
/// 平手时同样保留先出现的一条。列表为空或缺失时返回 `None`。
pub fn best_download_url(variants: &Value) -> Option<String> {
    let list = variants.as_array()?;
    let first = list.first()?;

    let mut best = first;
    let mut best_rank = download_rank(best);
    for variant in &list[1..] {
        let rank = download_rank(variant);
        if rank > best_rank {
            best = variant;
            best_rank = rank;
        }
    }

    best.str_at("url").map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn image_ties_keep_first_occurrence() {
        let variants = json!([
            {"quality": "500x500", "url": "u1"},
            {"quality": "500x500", "url": "u2"},
        ]);
        assert_eq!(best_image_url(&variants), Some("u1".to_string()));
    }

    #[test]
    fn image_prefers_highest_resolution_regardless_of_order() {
        let variants = json!([
            {"quality": "150x150", "url": "low"},
            {"quality": "500x500", "url": "high"},
            {"quality": "320x320", "url": "mid"},
        ]);
        assert_eq!(best_image_url(&variants), Some("high".to_string()));
    }

    #[test]
    fn image_degrades_to_none_without_raising() {
        assert_eq!(best_image_url(&json!([])), None);
        assert_eq!(best_image_url(&json!(null)), None);
        assert_eq!(best_image_url(&json!("not-a-list")), None);
        assert_eq!(best_image_url(&json!([{}])), None);
        assert_eq!(best_image_url(&json!([42, "junk"])), None);
        assert_eq!(
            best_image_url(&json!([{"quality": "150x150", "url": "a"}])),
            Some("a".to_string())
        );
    }

    #[test]
    fn image_winner_without_url_falls_back_to_first() {
        let variants = json!([
            {"quality": "150x150", "url": "fallback"},
            {"quality": "500x500"},
        ]);
        assert_eq!(best_image_url(&variants), Some("fallback".to_string()));
    }

    #[test]
    fn download_prefers_higher_bitrate() {
        let variants = json!([
            {"quality": "160", "url": "u160"},
            {"quality": "320", "url": "u320"},
        ]);
        assert_eq!(best_download_url(&variants), Some("u320".to_string()));

        let reversed = json!([
            {"quality": "320", "url": "u320"},
            {"quality": "160", "url": "u160"},
        ]);
        assert_eq!(best_download_url(&reversed), Some("u320".to_string()));
    }

    #[test]
    fn download_falls_back_to_url_substring() {
        // "320kbps" 不是纯整数，应转入 URL 子串猜测
        let variants = json!([
            {"url": "https://cdn.example/x_96kbps.mp4"},
            {"url": "https://cdn.example/x_320kbps.mp4"},
        ]);
        assert_eq!(
            best_download_url(&variants),
            Some("https://cdn.example/x_320kbps.mp4".to_string())
        );
    }

    #[test]
    fn download_empty_or_absent_is_none() {
        assert_eq!(best_download_url(&json!([])), None);
        assert_eq!(best_download_url(&json!(null)), None);
    }

    #[test]
    fn download_ties_keep_first_occurrence() {
        let variants = json!([
            {"quality": "320", "url": "first"},
            {"quality": "320", "url": "second"},
        ]);
        assert_eq!(best_download_url(&variants), Some("first".to_string()));
    }
}

//! 上游抓取边界：一个"按 URL 取文本"的能力接口，
//! 以及旧版格式族特有的响应体解码怪癖。
//!
//! 核心逻辑只依赖 [`Fetcher`] 这一层抽象，测试里可以用内存
//! 假实现替换掉真实网络。

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, SaavnHelperError};

/// 单次上游请求的默认超时。
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// "从 URL 取回响应正文"的能力。所有上游访问都经过这里。
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// 取回 `url` 的响应正文。非 2xx、超时或传输故障都转为错误，
    /// 绝不抛裸异常。
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String>;
}

/// 基于 `reqwest` 的生产实现。
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// 创建一个新的 `HttpFetcher`。
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String> {
        tracing::debug!("正在请求上游: {url}");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// 旧版上游会把 `(From "X")` 这种歌名片段原样塞进 JSON 字符串里，
/// 内层双引号未转义，直接解析必炸。先把内层双引号换成单引号。
static FROM_QUOTE_REPAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\(From "([^"]+)"\)"#).expect("修复正则必定合法"));

/// 还原旧版上游的反斜杠转义（`\uXXXX`、`\n` 等，含代理对）。
///
/// 未识别的转义序列原样保留，与旧实现的宽松行为一致。
pub fn unescape_unicode(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    fn hex4(chars: &[char], at: usize) -> Option<u32> {
        if at + 4 > chars.len() {
            return None;
        }
        let mut code = 0u32;
        for &c in &chars[at..at + 4] {
            code = code * 16 + c.to_digit(16)?;
        }
        Some(code)
    }

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' || i + 1 >= chars.len() {
            out.push(c);
            i += 1;
            continue;
        }
        match chars[i + 1] {
            'u' => {
                if let Some(code) = hex4(&chars, i + 2) {
                    i += 6;
                    if (0xD800..0xDC00).contains(&code) {
                        // 高代理：尝试与紧随的低代理合成
                        if i + 1 < chars.len()
                            && chars[i] == '\\'
                            && chars[i + 1] == 'u'
                            && let Some(low) = hex4(&chars, i + 2)
                            && (0xDC00..0xE000).contains(&low)
                        {
                            let combined =
                                0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                            out.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                            i += 6;
                        } else {
                            out.push('\u{FFFD}');
                        }
                    } else {
                        out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                    }
                } else {
                    out.push('\\');
                    i += 1;
                }
            }
            'n' => {
                out.push('\n');
                i += 2;
            }
            't' => {
                out.push('\t');
                i += 2;
            }
            'r' => {
                out.push('\r');
                i += 2;
            }
            '"' => {
                out.push('"');
                i += 2;
            }
            '\'' => {
                out.push('\'');
                i += 2;
            }
            '/' => {
                out.push('/');
                i += 2;
            }
            '\\' => {
                out.push('\\');
                i += 2;
            }
            other => {
                out.push('\\');
                out.push(other);
                i += 2;
            }
        }
    }
    out
}

/// 解码一份旧版格式族的响应体：先反转义，再修复已知的
/// 畸形引号模式，最后解析为 JSON。
///
/// 仅旧版路径需要此处理；worker 镜像的响应直接 `serde_json` 解析。
pub fn decode_legacy_body(raw: &str) -> Result<serde_json::Value> {
    let unescaped = unescape_unicode(raw);
    let repaired = FROM_QUOTE_REPAIR.replace_all(&unescaped, "(From '$1')");
    serde_json::from_str(&repaired)
        .map_err(|e| SaavnHelperError::Decode(format!("旧版响应体不是合法 JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unescapes_basic_sequences() {
        assert_eq!(unescape_unicode(r"a\u0041b"), "aAb");
        assert_eq!(unescape_unicode(r"line\nbreak"), "line\nbreak");
        assert_eq!(unescape_unicode(r"slash\/end"), "slash/end");
        // 未识别的转义保持原样
        assert_eq!(unescape_unicode(r"\q"), r"\q");
    }

    #[test]
    fn unescapes_surrogate_pairs() {
        assert_eq!(unescape_unicode(r"\ud83c\udfb5"), "\u{1F3B5}");
        // 孤立高代理退化为替换字符而不是 panic
        assert_eq!(unescape_unicode(r"x\ud83cx"), "x\u{FFFD}x");
    }

    #[test]
    fn repairs_malformed_from_quoting() {
        let raw = r#"{"song":"Tera Ban (From 'X')","album":"Y"}"#
            .replace("(From 'X')", r#"(From "X")"#);
        let decoded = decode_legacy_body(&raw).unwrap();
        assert_eq!(decoded.get("song"), Some(&json!("Tera Ban (From 'X')")));
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let err = decode_legacy_body("<html>not json</html>").unwrap_err();
        assert!(matches!(err, SaavnHelperError::Decode(_)));
    }
}

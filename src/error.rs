//! 定义了整个 `saavn-helper` 库的错误类型 `SaavnHelperError`。

use thiserror::Error;

/// `saavn-helper` 库的通用错误枚举。
///
/// 错误大体分为四类：输入错误（未发起任何上游请求）、传输错误、
/// 解码错误以及上游接口自身报告的错误。
#[derive(Error, Debug)]
pub enum SaavnHelperError {
    /// 通用的 anyhow 错误
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    /// 调用方输入缺失或非法，尚未发起任何上游请求
    #[error("{0}")]
    Input(String),

    /// 网络请求失败 (源自 `reqwest::Error`)
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// JSON 解析失败 (源自 `serde_json::Error`)
    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// 上游响应体经反转义后仍不是预期的结构
    #[error("上游响应解码失败: {0}")]
    Decode(String),

    /// 从上游页面正文中提取 id 失败（两个已知标记都不存在）
    #[error("数据提取失败: {0}")]
    DataExtraction(String),

    /// API 返回错误或空数据
    #[error("API 为 `{0}` 返回了错误或空数据")]
    ApiError(String),

    /// 更通用的网络层错误
    #[error("网络错误: {0}")]
    Network(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// `SaavnHelperError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, SaavnHelperError>;

impl SaavnHelperError {
    /// 该错误是否属于输入错误（应映射为 HTTP 400）。
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

//! 后台保活任务：每隔固定周期打一条存活日志。
//!
//! 免费托管平台会回收长时间安静的实例，这条周期日志配合
//! `/keep-alive/` 探针一起用。

use std::time::Duration;

/// 默认保活周期：10 分钟。
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(600);

/// 启动保活任务。任务随运行时退出而结束，不需要显式取消。
pub fn spawn(interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // interval 的第一个 tick 立即到期，跳过它
        ticker.tick().await;
        loop {
            ticker.tick().await;
            tracing::info!(
                "Keep alive - Service is running at {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );
        }
    });
}

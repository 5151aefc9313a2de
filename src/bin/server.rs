//! 服务入口：读取 `PORT` 环境变量，装配路由并启动。

use saavn_helper_rs::{
    SaavnHelper,
    server::{keep_alive, router},
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,saavn_helper_rs=debug"));
    FmtSubscriber::builder().with_env_filter(filter).init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|text| text.parse().ok())
        .unwrap_or(5100);

    let app = router(SaavnHelper::new());
    keep_alive::spawn(keep_alive::DEFAULT_INTERVAL);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("服务已启动: http://localhost:{port}");
    tracing::info!("保活任务已启动（每 10 分钟一次）");
    axum::serve(listener, app).await?;
    Ok(())
}

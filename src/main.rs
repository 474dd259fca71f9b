// ==========================================
// 机场查询服务 - 主入口
// ==========================================
// 技术栈: axum + Rust + SQLite
// ==========================================

use airport_lookup_api::config::AppConfig;
use airport_lookup_api::{app, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 需在日志初始化前加载（RUST_LOG / LOG_FORMAT）
    dotenv::dotenv().ok();
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", airport_lookup_api::APP_NAME);
    tracing::info!("系统版本: {}", airport_lookup_api::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "配置加载失败");
        e
    })?;

    app::run(config).await
}

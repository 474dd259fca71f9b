// ==========================================
// 机场查询服务 - 启动流程
// ==========================================
// 顺序: 打开存储 → 参考数据导入（一次性）→ 绑定端口 → 服务 → 优雅退出
// 导入失败策略: 缺少工作表为致命错误；其他导入错误记录后继续启动
// ==========================================

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::app::http::build_router;
use crate::app::state::AppState;
use crate::config::AppConfig;
use crate::db::{open_store, StoreHandle};
use crate::domain::ImportOutcome;
use crate::importer::{ReferenceImporter, ReferenceImporterImpl};
use crate::repository::ReferenceDataRepositoryImpl;

/// 启动时导入参考数据
///
/// # 返回
/// - Ok(Some): 导入已执行或因数据已存在而跳过
/// - Ok(None): 配置为跳过，或导入失败（已记录日志）
/// - Err: 致命错误（缺少必需工作表），调用方应终止进程
pub async fn run_startup_import(
    store: StoreHandle,
    config: &AppConfig,
) -> anyhow::Result<Option<ImportOutcome>> {
    if config.skip_import {
        info!("已配置跳过参考数据导入");
        return Ok(None);
    }

    let importer = ReferenceImporterImpl::with_defaults(
        ReferenceDataRepositoryImpl::new(store),
        config.import_source_path.clone(),
    );

    match importer.import().await {
        Ok(outcome) => Ok(Some(outcome)),
        Err(e) if e.is_fatal() => {
            error!(error = %e, "参考数据导入前置条件不满足，终止启动");
            Err(anyhow::Error::new(e).context("参考数据导入失败"))
        }
        Err(e) => {
            warn!(error = %e, "参考数据导入失败，服务将以现有数据继续启动");
            Ok(None)
        }
    }
}

/// 完整启动流程（阻塞直至收到退出信号）
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let store = open_store(&config.database_path)
        .with_context(|| format!("无法打开数据库: {}", config.database_path))?;
    info!(database_path = %config.database_path, "数据库已就绪");

    run_startup_import(store.clone(), &config).await?;

    let state = AppState::new(store);
    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("无法监听地址: {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), "HTTP 服务已启动");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    info!("服务已关闭");
    Ok(())
}

/// 等待 Ctrl-C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("收到退出信号，开始关闭"),
        Err(e) => error!(error = %e, "退出信号监听失败"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::IN_MEMORY_PATH;
    use std::fs;
    use tempfile::TempDir;

    fn config(source: &std::path::Path, skip_import: bool) -> AppConfig {
        AppConfig {
            database_path: IN_MEMORY_PATH.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            import_source_path: source.to_path_buf(),
            skip_import,
        }
    }

    #[tokio::test]
    async fn test_skip_import_flag() {
        let store = open_store(IN_MEMORY_PATH).unwrap();
        let dir = TempDir::new().unwrap();
        let outcome = run_startup_import(store, &config(dir.path(), true))
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_missing_source_file_is_swallowed() {
        let store = open_store(IN_MEMORY_PATH).unwrap();
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Database.xlsx");

        let outcome = run_startup_import(store, &config(&source, false))
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_missing_sheet_is_fatal() {
        let store = open_store(IN_MEMORY_PATH).unwrap();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("countries.csv"), "id,name\n1,India\n").unwrap();

        let result = run_startup_import(store, &config(dir.path(), false)).await;
        assert!(result.is_err());
    }
}

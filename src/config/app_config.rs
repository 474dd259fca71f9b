// ==========================================
// 机场查询服务 - 应用配置
// ==========================================
// 来源: 环境变量（启动时先加载 .env）
// 红线: DATABASE_PATH 缺失为致命错误，进程不得启动
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    /// SQLite 数据库路径（必填）
    pub const DATABASE_PATH: &str = "DATABASE_PATH";
    /// 监听端口
    pub const PORT: &str = "PORT";
    /// 监听地址
    pub const HOST: &str = "HOST";
    /// 导入源（.xlsx 文件或包含三个 CSV 的目录）
    pub const IMPORT_SOURCE_PATH: &str = "IMPORT_SOURCE_PATH";
    /// 跳过启动导入
    pub const SKIP_IMPORT: &str = "SKIP_IMPORT";
}

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_IMPORT_SOURCE_PATH: &str = "./Database.xlsx";

/// 配置错误
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("环境变量未设置: {0}")]
    MissingVar(&'static str),

    #[error("环境变量取值无效 ({key}={value}): {message}")]
    InvalidVar {
        key: &'static str,
        value: String,
        message: String,
    },
}

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub import_source_path: PathBuf,
    pub skip_import: bool,
}

impl AppConfig {
    /// 从进程环境读取配置（先加载 .env，已存在的环境变量优先）
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置
    ///
    /// 测试中传入闭包，避免修改进程环境变量
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_path =
            get(config_keys::DATABASE_PATH).ok_or(ConfigError::MissingVar(config_keys::DATABASE_PATH))?;

        let port = match get(config_keys::PORT) {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidVar {
                key: config_keys::PORT,
                value: raw.clone(),
                message: e.to_string(),
            })?,
        };

        let skip_import = match get(config_keys::SKIP_IMPORT) {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::InvalidVar {
                key: config_keys::SKIP_IMPORT,
                value: raw.clone(),
                message: "期望 true/false/1/0".to_string(),
            })?,
        };

        Ok(Self {
            database_path,
            host: get(config_keys::HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            import_source_path: PathBuf::from(
                get(config_keys::IMPORT_SOURCE_PATH)
                    .unwrap_or_else(|| DEFAULT_IMPORT_SOURCE_PATH.to_string()),
            ),
            skip_import,
        })
    }

    /// 监听地址（host:port）
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_PATH", "airports.db")])).unwrap();

        assert_eq!(config.database_path, "airports.db");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.import_source_path, PathBuf::from(DEFAULT_IMPORT_SOURCE_PATH));
        assert!(!config.skip_import);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_database_path_is_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", "8080")]));
        assert_eq!(result, Err(ConfigError::MissingVar("DATABASE_PATH")));

        // 空白视为未设置
        let result = AppConfig::from_lookup(lookup_from(&[("DATABASE_PATH", "   ")]));
        assert_eq!(result, Err(ConfigError::MissingVar("DATABASE_PATH")));
    }

    #[test]
    fn test_invalid_port() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_PATH", "airports.db"),
            ("PORT", "abc"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidVar { key: "PORT", .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_PATH", "/data/airports.db"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("IMPORT_SOURCE_PATH", "/data/reference"),
            ("SKIP_IMPORT", "Yes"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.import_source_path, PathBuf::from("/data/reference"));
        assert!(config.skip_import);
    }

    #[test]
    fn test_invalid_skip_import_flag() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_PATH", "airports.db"),
            ("SKIP_IMPORT", "maybe"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidVar { key: "SKIP_IMPORT", .. })
        ));
    }
}

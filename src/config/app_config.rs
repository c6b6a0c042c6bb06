// ==========================================
// 工厂员工技能矩阵管理系统 - 启动配置
// ==========================================
// 来源: 环境变量
// - SKILL_MATRIX_HOST     监听地址（默认 127.0.0.1）
// - SKILL_MATRIX_PORT     监听端口（默认 3080）
// - SKILL_MATRIX_DB_PATH  数据库文件（默认 <data_dir>/skill-matrix/skill_matrix.db）
// - SKILL_MATRIX_CORS     为 1/true 时启用宽松 CORS
// ==========================================

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3080;
pub const DB_FILE_NAME: &str = "skill_matrix.db";

/// 服务启动配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub cors_permissive: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: get_default_db_path(),
            cors_permissive: false,
        }
    }
}

impl AppConfig {
    /// 从环境变量加载（缺失项使用默认值）
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("SKILL_MATRIX_HOST").filter(|v| !v.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup("SKILL_MATRIX_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("SKILL_MATRIX_PORT 无效 '{}': {}", port, e))?;
        }
        if let Some(path) = lookup("SKILL_MATRIX_DB_PATH").filter(|v| !v.trim().is_empty()) {
            config.db_path = PathBuf::from(path.trim());
        }
        if let Some(cors) = lookup("SKILL_MATRIX_CORS") {
            config.cors_permissive = matches!(cors.trim(), "1" | "true" | "TRUE" | "yes");
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 默认数据库路径
///
/// 优先使用系统数据目录，不可用时退回当前目录
pub fn get_default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("skill-matrix").join(DB_FILE_NAME),
        None => PathBuf::from(DB_FILE_NAME),
    }
}

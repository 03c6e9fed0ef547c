//! Server configuration.

use std::path::PathBuf;

/// 起動時に決まる設定（CLI 引数 / 環境変数から組み立てる）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CORS で許可するオリジン。`*` なら全て許可
    pub allowed_origin: String,
    /// `/api` と `/ws` 以外のパスで配信する静的ファイルのディレクトリ
    pub static_dir: PathBuf,
}

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 3001;
    pub const ANY_ORIGIN: &'static str = "*";
    pub const DEFAULT_STATIC_DIR: &'static str = "client/build";

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origin == Self::ANY_ORIGIN
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            allowed_origin: Self::ANY_ORIGIN.to_string(),
            static_dir: PathBuf::from(Self::DEFAULT_STATIC_DIR),
        }
    }
}

pub mod error;
pub mod guard;

pub use error::*;
pub use guard::{Guard, require_api_key, require_config};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// プロビジョニング定義ファイルのパスを上書きする環境変数
pub const PROVISION_FILE_ENV: &str = "VPS_PROVISION_FILE";

/// 設定ファイルのパスを上書きする環境変数
pub const SETTINGS_FILE_ENV: &str = "VPSFLOW_CONFIG";

/// ホームディレクトリからの相対パス
const PROVISION_FILE: [&str; 2] = [".vps", "vultr"];

/// プロビジョニング定義ファイルのパスを取得
///
/// 1. 環境変数 VPS_PROVISION_FILE (直接パス指定)
/// 2. ~/.vps/vultr
pub fn provision_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(PROVISION_FILE_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(PROVISION_FILE.iter().fold(home, |path, part| path.join(part)))
}

/// vpsflowの設定ディレクトリを取得 (~/.config/vpsflow)
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("vpsflow");
    Ok(config_dir)
}

/// 設定ファイルのパスを取得
///
/// 1. 環境変数 VPSFLOW_CONFIG
/// 2. ~/.config/vpsflow/config.yaml
pub fn settings_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_FILE_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    Ok(get_config_dir()?.join("config.yaml"))
}

/// ユーザー設定 (config.yaml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// プロバイダーのAPIキー
    pub api_key: Option<String>,

    /// APIエンドポイント（プロキシやテスト用）
    pub endpoint: Option<String>,
}

impl Settings {
    /// 既定の場所から設定を読み込む（ファイルがなければデフォルト）
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("settings file not found: {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// APIキーを決定する
    ///
    /// 優先順位: 明示指定（--api-key / VULTR_API_KEY） > 設定ファイル
    pub fn api_key(&self, explicit: Option<String>) -> Option<String> {
        explicit
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }
}

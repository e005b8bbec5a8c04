//! 前提条件チェック
//!
//! 設定ファイルやAPIキーが揃っているかを確認し、処理を続行するか
//! 理由付きでスキップするかを返す。スキップはエラーではない。

use std::path::{Path, PathBuf};

/// 前提条件チェックの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard<T> {
    /// 続行（チェック済みの値を保持）
    Proceed(T),
    /// スキップ（ユーザーに表示する理由）
    Skip(String),
}

impl<T> Guard<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Guard<U> {
        match self {
            Guard::Proceed(value) => Guard::Proceed(f(value)),
            Guard::Skip(reason) => Guard::Skip(reason),
        }
    }
}

/// 設定ファイルの存在を確認
pub fn require_config(path: &Path) -> Guard<PathBuf> {
    if path.exists() {
        Guard::Proceed(path.to_path_buf())
    } else {
        tracing::debug!("config file missing: {}", path.display());
        Guard::Skip(format!("'{}' missing", path.display()))
    }
}

/// APIキーの存在を確認
///
/// 空白のみのキーは未設定として扱う。
pub fn require_api_key(key: Option<String>) -> Guard<String> {
    match key.map(|k| k.trim().to_string()) {
        Some(k) if !k.is_empty() => Guard::Proceed(k),
        _ => Guard::Skip(
            "API key missing: use --api-key, VULTR_API_KEY or api_key in the settings file"
                .to_string(),
        ),
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ホームディレクトリが見つかりません")]
    HomeDirNotFound,

    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error("設定ファイルの解析に失敗しました ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

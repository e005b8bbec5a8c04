pub mod provision;
pub mod resources;
pub mod roster;
pub mod wipe;

use colored::Colorize;
use vpsflow_cloud_vultr::{VultrClient, VultrProvider};
use vpsflow_config::{Guard, Settings, require_api_key};

/// コマンド共通の実行コンテキスト
pub struct Context {
    pub provider: VultrProvider,
    /// false の場合は結果を表示しない (--quiet)
    pub echo: bool,
}

impl Context {
    pub fn client(&self) -> &VultrClient {
        self.provider.client()
    }
}

/// グローバルオプション
pub struct GlobalArgs {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub quiet: bool,
}

/// APIキーを解決してコンテキストを作成
///
/// キーが無い場合は Skip を返し、プロバイダーには一切アクセスしない。
pub fn connect(args: GlobalArgs, settings: &Settings) -> Guard<Context> {
    let endpoint = args.endpoint.or_else(|| settings.endpoint.clone());
    require_api_key(settings.api_key(args.api_key)).map(|key| {
        let mut client = VultrClient::new(key);
        if let Some(endpoint) = endpoint {
            tracing::debug!("Using API endpoint {}", endpoint);
            client = client.with_base_url(endpoint);
        }
        Context {
            provider: VultrProvider::new(client),
            echo: !args.quiet,
        }
    })
}

/// Skip 理由を表示
pub fn print_skip(reason: &str) {
    println!("{}", reason.yellow());
}

mod commands;
mod display;

use clap::{Parser, Subcommand};
use commands::resources::{
    AccountCommands, DnsCommands, ListOnlyCommands, RegionsCommands, ServerCommands,
    SnapshotCommands, SshKeyCommands, StartupScriptCommands,
};
use commands::{GlobalArgs, connect, print_skip};
use tracing_subscriber::EnvFilter;
use vpsflow_cloud::ListingKind;
use vpsflow_config::{Guard, Settings};

#[derive(Parser)]
#[command(name = "vps")]
#[command(about = "Vultr の VPS を宣言的に作成・照会するCLI", long_about = None)]
struct Cli {
    /// Vultr APIキー
    #[arg(long, global = true, env = "VULTR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// APIエンドポイント（テスト・プロキシ用）
    #[arg(long, global = true, env = "VULTR_API_ENDPOINT", hide = true)]
    endpoint: Option<String>,

    /// 結果を表示しない
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn global_args(&self) -> GlobalArgs {
        GlobalArgs {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            quiet: self.quiet,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// ~/.vps/vultr に定義されたサーバーを作成
    Provision,
    /// アカウント上の全サーバーを削除
    Wipe {
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// 全サーバーの Salt-SSH roster を出力
    Roster,
    /// アカウント情報
    #[command(subcommand)]
    Account(AccountCommands),
    /// アプリケーション
    #[command(subcommand)]
    App(ListOnlyCommands),
    /// バックアップ
    #[command(subcommand)]
    Backup(ListOnlyCommands),
    /// ISOイメージ
    #[command(subcommand)]
    Iso(ListOnlyCommands),
    /// OS
    #[command(subcommand)]
    Os(ListOnlyCommands),
    /// プラン
    #[command(subcommand)]
    Plans(ListOnlyCommands),
    /// リージョン
    #[command(subcommand)]
    Regions(RegionsCommands),
    /// サーバー
    #[command(subcommand)]
    Server(ServerCommands),
    /// スナップショット
    #[command(subcommand)]
    Snapshot(SnapshotCommands),
    /// SSH鍵
    #[command(subcommand)]
    Sshkey(SshKeyCommands),
    /// スタートアップスクリプト
    #[command(subcommand)]
    Startupscript(StartupScriptCommands),
    /// DNS
    #[command(subcommand)]
    Dns(DnsCommands),
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrに出力（stdoutは結果表示用）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("vpsflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = Settings::load()?;
    let args = cli.global_args();

    // provision はAPIキーより先にプロビジョニングファイルを確認する
    if matches!(cli.command, Commands::Provision) {
        return commands::provision::handle(args, &settings).await;
    }

    let ctx = match connect(args, &settings) {
        Guard::Proceed(ctx) => ctx,
        Guard::Skip(reason) => {
            print_skip(&reason);
            return Ok(());
        }
    };

    // コマンドディスパッチ
    match cli.command {
        Commands::Wipe { yes } => commands::wipe::handle(&ctx, yes).await?,
        Commands::Roster => commands::roster::handle(&ctx).await?,
        Commands::Account(cmd) => commands::resources::handle_account(&ctx, cmd).await?,
        Commands::App(cmd) => {
            commands::resources::handle_list_only(&ctx, ListingKind::Apps, cmd).await?
        }
        Commands::Backup(cmd) => {
            commands::resources::handle_list_only(&ctx, ListingKind::Backups, cmd).await?
        }
        Commands::Iso(cmd) => {
            commands::resources::handle_list_only(&ctx, ListingKind::Isos, cmd).await?
        }
        Commands::Os(cmd) => {
            commands::resources::handle_list_only(&ctx, ListingKind::OperatingSystems, cmd)
                .await?
        }
        Commands::Plans(cmd) => {
            commands::resources::handle_list_only(&ctx, ListingKind::Plans, cmd).await?
        }
        Commands::Regions(cmd) => commands::resources::handle_regions(&ctx, cmd).await?,
        Commands::Server(cmd) => commands::resources::handle_server(&ctx, cmd).await?,
        Commands::Snapshot(cmd) => commands::resources::handle_snapshot(&ctx, cmd).await?,
        Commands::Sshkey(cmd) => commands::resources::handle_sshkey(&ctx, cmd).await?,
        Commands::Startupscript(cmd) => {
            commands::resources::handle_startupscript(&ctx, cmd).await?
        }
        Commands::Dns(cmd) => commands::resources::handle_dns(&ctx, cmd).await?,
        Commands::Provision => {
            unreachable!("Provision is handled before connecting");
        }
        Commands::Version => {
            unreachable!("Version is handled before settings loading");
        }
    }

    Ok(())
}

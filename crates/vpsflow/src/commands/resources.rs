//! リソース単位のコマンド (list / create / destroy ...)

use super::Context;
use crate::display;
use anyhow::Context as _;
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;
use vpsflow_cloud::{CreateServerRequest, Criteria, Listing, ListingKind, Record, filter, query};
use vpsflow_cloud_vultr::{DnsRecordRequest, ServerListFilter};

/// 一覧コマンド共通のオプション
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// 結果の絞り込み (例: "{'family': 'ubuntu'}")
    #[arg(long)]
    pub criteria: Option<String>,
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// アカウント情報を表示
    Info,
}

/// list のみを持つリソース
#[derive(Subcommand)]
pub enum ListOnlyCommands {
    /// 一覧を表示
    List(ListArgs),
}

#[derive(Subcommand)]
pub enum RegionsCommands {
    /// リージョンの一覧を表示
    List(ListArgs),
    /// リージョンで利用可能なプランIDを表示
    Availability {
        /// リージョンID
        dcid: String,
    },
}

#[derive(Subcommand)]
pub enum ServerCommands {
    /// サーバーの一覧を表示
    List {
        #[command(flatten)]
        list: ListArgs,
        /// このサブスクリプションのみを表示
        #[arg(long)]
        subid: Option<String>,
        /// タグで絞り込み
        #[arg(long)]
        tag: Option<String>,
        /// ラベルで絞り込み
        #[arg(long)]
        label: Option<String>,
        /// メインIPv4アドレスで絞り込み
        #[arg(long)]
        main_ip: Option<String>,
    },
    /// サーバーを作成（即時に課金が始まります）
    Create {
        /// リージョンID (regions list を参照)
        #[arg(long)]
        dcid: String,
        /// プランID (plans list を参照)
        #[arg(long)]
        vpsplanid: String,
        /// OS ID (os list を参照)
        #[arg(long)]
        osid: String,
        /// ラベル
        #[arg(long)]
        label: Option<String>,
        /// 追加パラメータ (KEY=VALUE、複数指定可)
        #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
    /// サーバーを削除
    Destroy {
        /// サブスクリプションID
        subid: String,
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// サーバーを起動
    Start {
        /// サブスクリプションID
        subid: String,
    },
    /// サーバーを停止（電源OFF）
    Halt {
        /// サブスクリプションID
        subid: String,
    },
    /// サーバーを再起動
    Reboot {
        /// サブスクリプションID
        subid: String,
    },
    /// サーバーのラベルを変更
    Label {
        /// サブスクリプションID
        subid: String,
        /// 新しいラベル
        label: String,
    },
}

#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// スナップショットの一覧を表示
    List(ListArgs),
    /// サーバーのスナップショットを作成
    Create {
        /// サブスクリプションID
        subid: String,
        /// 説明
        #[arg(long)]
        description: Option<String>,
    },
    /// スナップショットを削除
    Destroy {
        /// スナップショットID
        snapshotid: String,
    },
}

#[derive(Subcommand)]
pub enum SshKeyCommands {
    /// SSH鍵の一覧を表示
    List(ListArgs),
    /// SSH鍵を登録
    Create {
        /// 名前
        #[arg(long)]
        name: String,
        /// 公開鍵
        #[arg(long)]
        ssh_key: String,
    },
    /// SSH鍵を更新
    Update {
        /// SSH鍵ID
        sshkeyid: String,
        /// 新しい名前
        #[arg(long)]
        name: Option<String>,
        /// 新しい公開鍵
        #[arg(long)]
        ssh_key: Option<String>,
    },
    /// SSH鍵を削除
    Destroy {
        /// SSH鍵ID
        sshkeyid: String,
    },
}

/// スクリプト本文（直接指定またはファイル）
#[derive(Args, Debug, Clone)]
#[group(required = false, multiple = false)]
pub struct ScriptSource {
    /// スクリプト本文
    #[arg(long)]
    pub script: Option<String>,
    /// スクリプトファイル
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl ScriptSource {
    fn read(&self) -> anyhow::Result<Option<String>> {
        match (&self.script, &self.file) {
            (Some(script), _) => Ok(Some(script.clone())),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("{} を読み込めません", path.display())),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Subcommand)]
pub enum StartupScriptCommands {
    /// スタートアップスクリプトの一覧を表示
    List(ListArgs),
    /// スタートアップスクリプトを作成
    Create {
        /// 名前
        #[arg(long)]
        name: String,
        #[command(flatten)]
        source: ScriptSource,
        /// 種類 (boot / pxe)
        #[arg(long = "type")]
        script_type: Option<String>,
    },
    /// スタートアップスクリプトを更新
    Update {
        /// スクリプトID
        scriptid: String,
        /// 新しい名前
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        source: ScriptSource,
    },
    /// スタートアップスクリプトを削除
    Destroy {
        /// スクリプトID
        scriptid: String,
    },
}

#[derive(Subcommand)]
pub enum DnsCommands {
    /// ドメインの一覧を表示
    List(ListArgs),
    /// ドメインのレコード一覧を表示
    Records {
        /// ドメイン名
        domain: String,
        #[command(flatten)]
        list: ListArgs,
    },
    /// ドメインを作成
    CreateDomain {
        /// ドメイン名
        domain: String,
        /// デフォルトのAレコードに使うIP
        serverip: String,
    },
    /// ドメインを削除
    DeleteDomain {
        /// ドメイン名
        domain: String,
    },
    /// レコードを作成
    CreateRecord {
        /// ドメイン名
        domain: String,
        /// レコード名
        #[arg(long)]
        name: String,
        /// レコードタイプ (A, AAAA, CNAME, MX, TXT ...)
        #[arg(long = "type")]
        record_type: String,
        /// レコードの値
        #[arg(long)]
        data: String,
        /// TTL
        #[arg(long)]
        ttl: Option<u32>,
        /// 優先度 (MX / SRV)
        #[arg(long)]
        priority: Option<u32>,
    },
    /// レコードを削除
    DeleteRecord {
        /// ドメイン名
        domain: String,
        /// レコードID
        recordid: String,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("KEY=VALUE 形式で指定してください: {}", s))?;
    if key.is_empty() {
        return Err(format!("キーが空です: {}", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// 一覧を取得して絞り込み、表示
///
/// criteria はプロバイダーへのリクエスト前に解析する。
pub async fn list(ctx: &Context, kind: ListingKind, args: &ListArgs) -> anyhow::Result<Vec<Record>> {
    let criteria = Criteria::parse_optional(args.criteria.as_deref())?;
    let records = query(&ctx.provider, kind, &criteria).await?;
    if ctx.echo {
        display::print_records(&records)?;
    }
    Ok(records)
}

fn filter_listing(value: Value, criteria: &Criteria) -> anyhow::Result<Vec<Record>> {
    Ok(filter(Listing::from_value(value)?.into_records(), criteria))
}

/// 書き込み系のレスポンスを表示
fn echo_response(ctx: &Context, value: &Value) -> anyhow::Result<()> {
    if ctx.echo {
        display::print_response(value)?;
    }
    Ok(())
}

fn echo_done(ctx: &Context, message: String) {
    if ctx.echo {
        println!("{} {}", "✓".green(), message);
    }
}

pub async fn handle_account(ctx: &Context, cmd: AccountCommands) -> anyhow::Result<()> {
    match cmd {
        AccountCommands::Info => {
            let info = ctx.client().account_info().await?;
            echo_response(ctx, &info)
        }
    }
}

pub async fn handle_list_only(
    ctx: &Context,
    kind: ListingKind,
    cmd: ListOnlyCommands,
) -> anyhow::Result<()> {
    match cmd {
        ListOnlyCommands::List(args) => list(ctx, kind, &args).await.map(|_| ()),
    }
}

pub async fn handle_regions(ctx: &Context, cmd: RegionsCommands) -> anyhow::Result<()> {
    match cmd {
        RegionsCommands::List(args) => list(ctx, ListingKind::Regions, &args).await.map(|_| ()),
        RegionsCommands::Availability { dcid } => {
            let plans = ctx.client().regions_availability(&dcid).await?;
            echo_response(ctx, &plans)
        }
    }
}

pub async fn handle_server(ctx: &Context, cmd: ServerCommands) -> anyhow::Result<()> {
    let client = ctx.client();
    match cmd {
        ServerCommands::List {
            list: args,
            subid,
            tag,
            label,
            main_ip,
        } => {
            let server_filter = ServerListFilter {
                subid,
                tag,
                label,
                main_ip,
            };
            if server_filter == ServerListFilter::default() {
                return list(ctx, ListingKind::Servers, &args).await.map(|_| ());
            }

            let criteria = Criteria::parse_optional(args.criteria.as_deref())?;
            let value = client.server_list(&server_filter).await?;
            let records = match value {
                Value::Object(record) if server_filter.is_single() => {
                    filter(vec![record], &criteria)
                }
                other => filter_listing(other, &criteria)?,
            };
            if ctx.echo {
                display::print_records(&records)?;
            }
            Ok(())
        }
        ServerCommands::Create {
            dcid,
            vpsplanid,
            osid,
            label,
            params,
        } => {
            let mut request = CreateServerRequest::new(dcid, vpsplanid, osid);
            for (key, value) in params {
                request.params.insert(key, value);
            }
            if let Some(label) = label {
                request.params.insert("label".to_string(), label);
            }
            let response = client.server_create(&request).await?;
            echo_response(ctx, &response)
        }
        ServerCommands::Destroy { subid, yes } => {
            if !yes {
                println!(
                    "{}",
                    format!("警告: サーバー {} を削除します。元に戻せません。", subid).yellow()
                );
                println!("実行するには --yes オプションを指定してください");
                return Ok(());
            }
            client.server_destroy(&subid).await?;
            echo_done(ctx, format!("サーバー {} を削除しました", subid.cyan()));
            Ok(())
        }
        ServerCommands::Start { subid } => {
            client.server_start(&subid).await?;
            echo_done(ctx, format!("サーバー {} を起動しました", subid.cyan()));
            Ok(())
        }
        ServerCommands::Halt { subid } => {
            client.server_halt(&subid).await?;
            echo_done(ctx, format!("サーバー {} を停止しました", subid.cyan()));
            Ok(())
        }
        ServerCommands::Reboot { subid } => {
            client.server_reboot(&subid).await?;
            echo_done(ctx, format!("サーバー {} を再起動しました", subid.cyan()));
            Ok(())
        }
        ServerCommands::Label { subid, label } => {
            client.server_label_set(&subid, &label).await?;
            echo_done(
                ctx,
                format!("サーバー {} のラベルを {} に変更しました", subid.cyan(), label),
            );
            Ok(())
        }
    }
}

pub async fn handle_snapshot(ctx: &Context, cmd: SnapshotCommands) -> anyhow::Result<()> {
    let client = ctx.client();
    match cmd {
        SnapshotCommands::List(args) => list(ctx, ListingKind::Snapshots, &args).await.map(|_| ()),
        SnapshotCommands::Create { subid, description } => {
            let response = client
                .snapshot_create(&subid, description.as_deref())
                .await?;
            echo_response(ctx, &response)
        }
        SnapshotCommands::Destroy { snapshotid } => {
            client.snapshot_destroy(&snapshotid).await?;
            echo_done(ctx, format!("スナップショット {} を削除しました", snapshotid.cyan()));
            Ok(())
        }
    }
}

pub async fn handle_sshkey(ctx: &Context, cmd: SshKeyCommands) -> anyhow::Result<()> {
    let client = ctx.client();
    match cmd {
        SshKeyCommands::List(args) => list(ctx, ListingKind::SshKeys, &args).await.map(|_| ()),
        SshKeyCommands::Create { name, ssh_key } => {
            let response = client.sshkey_create(&name, &ssh_key).await?;
            echo_response(ctx, &response)
        }
        SshKeyCommands::Update {
            sshkeyid,
            name,
            ssh_key,
        } => {
            client
                .sshkey_update(&sshkeyid, name.as_deref(), ssh_key.as_deref())
                .await?;
            echo_done(ctx, format!("SSH鍵 {} を更新しました", sshkeyid.cyan()));
            Ok(())
        }
        SshKeyCommands::Destroy { sshkeyid } => {
            client.sshkey_destroy(&sshkeyid).await?;
            echo_done(ctx, format!("SSH鍵 {} を削除しました", sshkeyid.cyan()));
            Ok(())
        }
    }
}

pub async fn handle_startupscript(ctx: &Context, cmd: StartupScriptCommands) -> anyhow::Result<()> {
    let client = ctx.client();
    match cmd {
        StartupScriptCommands::List(args) => {
            list(ctx, ListingKind::StartupScripts, &args).await.map(|_| ())
        }
        StartupScriptCommands::Create {
            name,
            source,
            script_type,
        } => {
            let script = source
                .read()?
                .ok_or_else(|| anyhow::anyhow!("--script または --file を指定してください"))?;
            let response = client
                .startupscript_create(&name, &script, script_type.as_deref())
                .await?;
            echo_response(ctx, &response)
        }
        StartupScriptCommands::Update {
            scriptid,
            name,
            source,
        } => {
            let script = source.read()?;
            client
                .startupscript_update(&scriptid, name.as_deref(), script.as_deref())
                .await?;
            echo_done(
                ctx,
                format!("スタートアップスクリプト {} を更新しました", scriptid.cyan()),
            );
            Ok(())
        }
        StartupScriptCommands::Destroy { scriptid } => {
            client.startupscript_destroy(&scriptid).await?;
            echo_done(
                ctx,
                format!("スタートアップスクリプト {} を削除しました", scriptid.cyan()),
            );
            Ok(())
        }
    }
}

pub async fn handle_dns(ctx: &Context, cmd: DnsCommands) -> anyhow::Result<()> {
    let client = ctx.client();
    match cmd {
        DnsCommands::List(args) => list(ctx, ListingKind::DnsDomains, &args).await.map(|_| ()),
        DnsCommands::Records { domain, list: args } => {
            let criteria = Criteria::parse_optional(args.criteria.as_deref())?;
            let records = filter_listing(client.dns_records(&domain).await?, &criteria)?;
            if ctx.echo {
                display::print_records(&records)?;
            }
            Ok(())
        }
        DnsCommands::CreateDomain { domain, serverip } => {
            client.dns_create_domain(&domain, &serverip).await?;
            echo_done(ctx, format!("ドメイン {} を作成しました", domain.cyan()));
            Ok(())
        }
        DnsCommands::DeleteDomain { domain } => {
            client.dns_delete_domain(&domain).await?;
            echo_done(ctx, format!("ドメイン {} を削除しました", domain.cyan()));
            Ok(())
        }
        DnsCommands::CreateRecord {
            domain,
            name,
            record_type,
            data,
            ttl,
            priority,
        } => {
            let record = DnsRecordRequest {
                domain,
                name,
                record_type,
                data,
                ttl,
                priority,
            };
            client.dns_create_record(&record).await?;
            echo_done(
                ctx,
                format!(
                    "{} レコード {}.{} を作成しました",
                    record.record_type,
                    record.name.cyan(),
                    record.domain
                ),
            );
            Ok(())
        }
        DnsCommands::DeleteRecord { domain, recordid } => {
            client.dns_delete_record(&domain, &recordid).await?;
            echo_done(ctx, format!("レコード {} を削除しました", recordid.cyan()));
            Ok(())
        }
    }
}

use super::Context;
use crate::display;
use colored::Colorize;
use vpsflow_cloud::{ListingKind, VpsProvider, wipe, wipe_targets};

pub async fn handle(ctx: &Context, yes: bool) -> anyhow::Result<()> {
    // 確認（--yesが指定されていない場合）
    if !yes {
        let servers = ctx.provider.list(ListingKind::Servers).await?.into_records();
        let targets = wipe_targets(&servers)?;
        if targets.is_empty() {
            println!("{}", "削除対象のサーバーはありません".dimmed());
            return Ok(());
        }

        println!(
            "{}",
            format!("削除対象のサーバー ({} 台):", targets.len()).bold()
        );
        for (label, subid) in &targets {
            println!("  • {} ({})", label.cyan(), subid);
        }
        println!();
        println!(
            "{}",
            "警告: アカウント上の全サーバーを削除します。元に戻せません。".yellow()
        );
        println!("実行するには --yes オプションを指定してください");
        return Ok(());
    }

    let destroyed = wipe(&ctx.provider).await?;
    if ctx.echo {
        if destroyed.is_empty() {
            println!("{}", "削除対象のサーバーはありません".dimmed());
        } else {
            display::print_yaml(&destroyed)?;
        }
    }
    Ok(())
}

use super::{GlobalArgs, connect, print_skip};
use anyhow::Context as _;
use colored::Colorize;
use vpsflow_cloud::{ProvisionDocument, provision};
use vpsflow_config::{Guard, Settings, provision_file_path, require_config};

pub async fn handle(args: GlobalArgs, settings: &Settings) -> anyhow::Result<()> {
    // プロビジョニングファイルが無ければ何もしない
    let path = match require_config(&provision_file_path()?) {
        Guard::Proceed(path) => path,
        Guard::Skip(reason) => {
            print_skip(&reason);
            return Ok(());
        }
    };

    let ctx = match connect(args, settings) {
        Guard::Proceed(ctx) => ctx,
        Guard::Skip(reason) => {
            print_skip(&reason);
            return Ok(());
        }
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("{} を読み込めません", path.display()))?;
    let document = ProvisionDocument::parse(&text)
        .with_context(|| format!("{} の解析に失敗しました", path.display()))?;

    if document.is_empty() {
        if ctx.echo {
            println!("{}", "作成するサーバーはありません".dimmed());
        }
        return Ok(());
    }

    if ctx.echo {
        println!(
            "{}",
            format!("{} 台のサーバーを作成します...", document.len())
                .blue()
                .bold()
        );
    }

    let created = provision(&ctx.provider, &document).await?;

    if ctx.echo {
        for server in &created {
            println!(
                "  {} {} (SUBID: {})",
                "✓".green(),
                server.label.cyan(),
                server.subid.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}

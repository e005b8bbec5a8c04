use super::Context;
use crate::display;
use vpsflow_cloud::salt_roster;

/// Salt-SSH 用の roster を YAML で出力
pub async fn handle(ctx: &Context) -> anyhow::Result<()> {
    let roster = salt_roster(&ctx.provider).await?;
    if ctx.echo {
        display::print_yaml(&roster)?;
    }
    Ok(())
}

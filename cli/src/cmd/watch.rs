use std::time::Duration;

use cfkit_core::{
    action,
    config::{Config, WatchConfig},
    watch::{LiveRender, Poller, SubmissionFeed},
};
use cfkit_webclient::CodeforcesClient;

use crate::{config::GlobalConfig, util};

use super::{GlobalArgs, SubcmdResult};

/// Show the contest's solve status, or follow your latest submissions with -s
#[derive(Debug, clap::Args)]
pub struct Args {
    /// `<contest> [<problem>]` or a contest/problem URL; inferred from the current path if omitted
    #[arg()]
    pub target: Vec<String>,

    /// Follow the last N submissions until every verdict is final
    #[arg(short = 's', long, value_name = "N")]
    pub submissions: Option<Option<usize>>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub budget: Option<u64>,

    /// Append output instead of redrawing in place
    #[arg(long)]
    pub plain: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cwd = util::current_dir();
    let global = GlobalConfig::from_file_and_args(global_args)?;
    let handle = global.require_handle()?;
    let target = util::resolve_target(&args.target, &cwd)?;

    let watch_cfg = match Config::from_file_finding_in_ancestors(&cwd) {
        Ok(cfg) => cfg.watch,
        Err(e) => {
            log::debug!("No workspace config ({:#}); using default watch settings", e);
            WatchConfig::default()
        }
    };

    let client = CodeforcesClient::new(&global.host)?;

    let Some(count) = args.submissions else {
        let table = action::show_problem_standings(&client, &target, handle).await?;
        println!("{}", table);
        return Ok(());
    };
    let count = count.unwrap_or(watch_cfg.submissions);

    let poller = Poller::new()
        .interval(watch_cfg.interval())
        .budget(args.budget.map(Duration::from_secs).or(watch_cfg.budget()));
    let mut feed = SubmissionFeed::new(client, target, handle, count);
    let mut live = LiveRender::stdout(args.plain);

    action::watch_submissions(&poller, &mut feed, &mut live, ctrl_c()).await?;
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

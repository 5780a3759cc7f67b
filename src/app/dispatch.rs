use crate::cli::commands::{Cli, Commands};
use anyhow::{Result, bail};
use asteroniris_recall::Config;
use asteroniris_recall::message::MessageSegment;
use asteroniris_recall::recall::{BatchRecallEngine, BatchRecallRequest, ContentPolicy};
use asteroniris_recall::transport::OneBotHttpTransport;
use std::collections::BTreeSet;
use std::sync::Arc;

fn run_check(config: &Config, group: Option<&str>, text: &[String]) {
    let policy = ContentPolicy::new(&config.recall);
    let chain = [MessageSegment::text(text.join(" "))];
    match policy.evaluate(group, &chain) {
        Some(reason) => println!("recall: {reason}"),
        None => println!("pass"),
    }
}

async fn run_recall(
    config: &Config,
    group: String,
    users: Vec<String>,
    self_id: Option<String>,
    count: Option<usize>,
) -> Result<()> {
    let mut targets: BTreeSet<String> = users.into_iter().filter(|u| !u.is_empty()).collect();
    if targets.is_empty() {
        let Some(self_id) = self_id else {
            bail!("Pass at least one --user, or --self-id to recall the bot's own messages");
        };
        targets.insert(self_id);
    }

    let transport = Arc::new(OneBotHttpTransport::new(&config.onebot)?);
    let engine = BatchRecallEngine::from_config(transport, &config.recall);
    let request = BatchRecallRequest::new(
        group,
        targets,
        count.unwrap_or(config.recall.batch_default_count),
    );

    let report = engine.execute(&request).await;
    println!("{}", report.summary());
    if report.eligible > report.deleted {
        println!(
            "  {} of {} matching messages could not be recalled",
            report.eligible - report.deleted,
            report.eligible
        );
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Check { group, text } => {
            run_check(&config, group.as_deref(), &text);
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Commands::Recall {
            group,
            users,
            self_id,
            count,
        } => run_recall(&config, group, users, self_id, count).await,
    }
}

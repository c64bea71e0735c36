use anyhow::{Context, Result};
use rss_affiliate::config::{Config, Secrets};
use rss_affiliate::feed::rss::RssFeed;
use rss_affiliate::model::gemini::GeminiClient;
use rss_affiliate::pipeline::{Pipeline, RunOutcome};
use rss_affiliate::publish::email::EmailPublisher;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "config.toml";

struct Args {
    config: PathBuf,
    dry_run: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: PathBuf::from(DEFAULT_CONFIG),
        dry_run: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dry-run" => args.dry_run = true,
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = PathBuf::from(path);
            }
            other => anyhow::bail!("unknown argument: {}", other),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "rss_affiliate=info".to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args()?;
    let config = Config::load_or_default(&args.config)?;

    // Load saved secrets from .env (real env vars take precedence)
    Config::load_env_file();
    let secrets = Secrets::from_env()?;

    let model = GeminiClient::new(secrets.model_api_key.clone(), &config.model)?;
    if let Err(e) = model.preflight_check().await {
        tracing::error!(error = %e, "generative model unavailable, aborting");
        return Err(e.into());
    }

    let feed = RssFeed::new(&config.feed)?;
    let publisher = EmailPublisher::new(&config.mail, &secrets, args.dry_run)?;
    if args.dry_run {
        tracing::info!("dry run: posts will be logged, not sent");
    }

    let pipeline = Pipeline::new(&config, &feed, &model, &publisher);
    let mut rng = rand::thread_rng();

    match pipeline.run(&mut rng).await {
        Ok(RunOutcome::Published { subject, destination, degraded }) => {
            if degraded {
                tracing::warn!(%subject, %destination, "published fallback article");
            } else {
                tracing::info!(%subject, %destination, "published");
            }
            Ok(())
        }
        Ok(RunOutcome::NoEntries) => Ok(()),
        Ok(RunOutcome::NothingToPublish { title }) => {
            tracing::warn!(%title, "nothing published this run");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            Err(e.into())
        }
    }
}

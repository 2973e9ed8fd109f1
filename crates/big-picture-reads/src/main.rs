use anyhow::{Context, Result};
use clap::Parser;
use shared::{notifier_for, Config, HttpFetcher, ReadsJob, RunMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "big-picture-reads")]
#[command(about = "Email today's Big Picture reading list as JSON")]
struct Args {
    /// Use this post instead of searching the blog index
    #[arg(short, long)]
    post_url: Option<String>,

    /// Blog index to search for the reading-list post
    #[arg(short, long)]
    blog_url: Option<String>,

    /// Print the list to stdout even if email is configured
    #[arg(short, long)]
    local: bool,

    /// Also save the list to the local data directory
    #[arg(short, long)]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the reading list in local mode
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reqwest=warn,html5ever=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = args.post_url {
        config.post_url = Some(url);
    }
    if let Some(url) = args.blog_url {
        config.blog_url = url;
    }

    let mode = config.run_mode(args.local);
    match &mode {
        RunMode::Local => tracing::info!("Printing reading list locally"),
        RunMode::Mailgun(mailgun) => {
            tracing::info!(to = %mailgun.email_address, "Emailing reading list")
        }
    }

    let fetcher = HttpFetcher::new()?;
    let notifier = notifier_for(&mode)?;
    let job = ReadsJob::new(&config, &fetcher);

    match job.run(notifier.as_ref()).await {
        Ok(report) => {
            tracing::info!(
                post = %report.post_url,
                articles = report.result.len(),
                "Reading list delivered"
            );
            if args.save {
                save(&report.payload)?;
            }
            Ok(())
        }
        Err(err) => {
            tracing::error!(kind = err.kind(), error = %err, "Run failed");
            // Delivery failed after the list was built; keep it if asked
            if let (true, Some(result)) = (args.save, err.result()) {
                if let Err(e) = result.to_json().map_err(Into::into).and_then(|p| save(&p)) {
                    tracing::warn!(error = %e, "Could not save reading list");
                }
            }
            Err(err.into())
        }
    }
}

fn save(payload: &str) -> Result<()> {
    let dir = shared::get_default_reads_dir()?;
    let path = shared::save_payload(payload, &dir, chrono::Local::now())?;
    tracing::info!(path = %path.display(), "Saved reading list");
    Ok(())
}

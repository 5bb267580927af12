use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use creator_insights::analytics::{AnalyticsStore, HistoricalComparisonService, StoreConfig};
use creator_insights::config::{AppConfig, LoggingConfig};
use creator_insights::llm::LlmClient;
use creator_insights::trends::{TrendAnalyzer, TrendCategory};
use creator_insights::{
    format_change, format_number, format_ratio, server, HistoricalComparison, TimeRange,
};

#[derive(Parser)]
#[command(name = "creator-insights", about = "Creator analytics and trend suggestions")]
struct Cli {
    /// TOML config file (defaults to $INSIGHTS_CONFIG_PATH or config/insights.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Compare a user's current and previous period
    Historical(HistoricalArgs),
    /// List trending hashtags, sounds, effects or challenges
    Trends(TrendsArgs),
    /// Suggest content ideas for a niche
    Ideas(IdeasArgs),
    /// Suggest trends to join for a set of interests
    Recommend(RecommendArgs),
    /// Write the effective configuration to a file
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    web_root: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct HistoricalArgs {
    #[arg(long, default_value = "default")]
    user: String,
    #[arg(long, default_value = "7d")]
    range: String,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct TrendsArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long, default_value_t = 10)]
    count: usize,
}

#[derive(Args, Debug, Clone)]
struct IdeasArgs {
    #[arg(long)]
    niche: Option<String>,
    #[arg(long)]
    user_type: Option<String>,
    #[arg(long, default_value_t = 5)]
    count: usize,
}

#[derive(Args, Debug, Clone)]
struct RecommendArgs {
    #[arg(long = "interest")]
    interests: Vec<String>,
    #[arg(long = "history")]
    content_history: Vec<String>,
    #[arg(long, default_value_t = 5)]
    count: usize,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/insights.toml")]
    path: PathBuf,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (mut config, _) = AppConfig::load(cli.config)?;
    init_tracing(&config.logging);

    let command = cli.command.unwrap_or(Command::Serve(ServeArgs::default()));
    match command {
        Command::Serve(args) => {
            if let Some(host) = args.host {
                config.server.host = host;
            }
            if let Some(port) = args.port {
                config.server.port = port;
            }
            if let Some(web_root) = args.web_root {
                config.server.web_root = Some(web_root);
            }
            server::serve(config).await
        }
        Command::Historical(args) => run_historical(&config, args).await,
        Command::Trends(args) => run_trends(&config, args).await,
        Command::Ideas(args) => run_ideas(&config, args).await,
        Command::Recommend(args) => run_recommend(&config, args).await,
        Command::InitConfig(args) => {
            config.write(&args.path)?;
            println!("Wrote {}", args.path.display());
            Ok(())
        }
    }
}

async fn run_historical(config: &AppConfig, args: HistoricalArgs) -> Result<(), String> {
    let range: TimeRange = args.range.parse()?;
    let store = Arc::new(AnalyticsStore::new(StoreConfig::unbounded()));
    let service =
        HistoricalComparisonService::new(store, config.analytics.variance, config.analytics.seed);
    let comparison = service.comparison(&args.user, range).await?;

    if args.json {
        return print_json(&comparison);
    }
    print_comparison(&args.user, &comparison);
    Ok(())
}

fn print_comparison(user: &str, comparison: &HistoricalComparison) {
    let metrics = &comparison.metrics;
    println!(
        "{} for {} ({} to {})",
        metrics.time_interval.label, user, metrics.time_interval.start, metrics.time_interval.end
    );

    let rows = [
        ("views", metrics.current.views, metrics.previous.views, metrics.growth.views),
        ("likes", metrics.current.likes, metrics.previous.likes, metrics.growth.likes),
        ("comments", metrics.current.comments, metrics.previous.comments, metrics.growth.comments),
        ("shares", metrics.current.shares, metrics.previous.shares, metrics.growth.shares),
        ("followers", metrics.current.followers, metrics.previous.followers, metrics.growth.followers),
    ];
    for (label, current, previous, growth) in rows {
        println!(
            "  {:<10} {:>12} (was {:>12}) {}",
            label,
            format_number(current as f64),
            format_number(previous as f64),
            format_change(growth)
        );
    }
    println!(
        "  {:<10} {:>12} (was {:>12}) {}",
        "engagement",
        format_ratio(metrics.current.engagement),
        format_ratio(metrics.previous.engagement),
        format_change(metrics.growth.engagement)
    );

    println!("\nGrowth trend:");
    for point in &comparison.growth_trend {
        println!(
            "  {}  views {:>10}  followers {:>8}  engagement {}",
            point.date,
            format_number(point.views as f64),
            format_number(point.followers as f64),
            format_ratio(point.engagement)
        );
    }
}

async fn run_trends(config: &AppConfig, args: TrendsArgs) -> Result<(), String> {
    let mut analyzer_config = config.analyzer_config();
    analyzer_config.items_per_category = args.count;
    let analyzer = TrendAnalyzer::new(None, analyzer_config);

    match args.category {
        Some(category) => {
            let category: TrendCategory = category.parse()?;
            print_json(&analyzer.trending(category).await)
        }
        None => {
            let mut all = serde_json::Map::new();
            for category in TrendCategory::ALL {
                let items = serde_json::to_value(analyzer.trending(category).await)
                    .map_err(|err| format!("failed to serialize trends: {}", err))?;
                all.insert(category.as_str().to_string(), items);
            }
            print_json(&all)
        }
    }
}

async fn run_ideas(config: &AppConfig, args: IdeasArgs) -> Result<(), String> {
    let analyzer = build_analyzer(config)?;
    let result = analyzer
        .content_ideas(args.user_type.as_deref(), args.niche.as_deref(), args.count)
        .await;
    eprintln!("source: {:?}", result.source);
    print_json(&result.value)
}

async fn run_recommend(config: &AppConfig, args: RecommendArgs) -> Result<(), String> {
    let analyzer = build_analyzer(config)?;
    let result = analyzer
        .recommendations(&args.interests, &args.content_history, args.count)
        .await;
    eprintln!("source: {:?}", result.source);
    print_json(&result.value)
}

fn build_analyzer(config: &AppConfig) -> Result<TrendAnalyzer, String> {
    let llm_client = LlmClient::from_config(&config.ai)?;
    Ok(TrendAnalyzer::new(llm_client, config.analyzer_config()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}

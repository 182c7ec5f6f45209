use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marketlens_common::data::cache::CacheConfig;
use marketlens_core::{
    analysis::{StrategyConfig, StrategyKind},
    api::{self, AppState},
    config::Settings,
    provider::YahooProvider,
    service::{AnalysisRequest, AnalysisService},
};

#[derive(Parser)]
#[command(name = "marketlens")]
#[command(about = "Momentum vs value strategy comparison for market data")]
enum Commands {
    /// Run the dashboard API server
    Server,
    /// Run one analysis and print the comparison to stdout
    Analyze {
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, default_value = "^GSPC")]
        benchmark: String,
        #[arg(short, long, default_value = "365")]
        days: i64,
        #[arg(long, default_value = "momentum")]
        strategy: String,
        #[arg(short, long)]
        window: Option<usize>,
        #[arg(short, long)]
        threshold: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new()?;
    let provider = Arc::new(YahooProvider::with_base_url(
        settings.provider.base_url.clone(),
        Duration::from_secs(settings.provider.timeout_secs),
    ));
    let service = AnalysisService::new(
        provider,
        CacheConfig {
            ttl: Duration::from_secs(settings.cache.ttl_secs),
            max_entries: settings.cache.max_entries,
        },
    );

    let command = Commands::try_parse().unwrap_or(Commands::Server);

    match command {
        Commands::Server => {
            let state = Arc::new(AppState { service });
            let app = api::router(state);

            let addr = format!("0.0.0.0:{}", settings.api.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Dashboard API listening on {}", addr);

            axum::serve(listener, app).await?;
        }

        Commands::Analyze {
            symbol,
            benchmark,
            days,
            strategy,
            window,
            threshold,
        } => {
            let kind: StrategyKind = strategy.parse()?;
            let end = Utc::now().date_naive();
            let start = end - chrono::Duration::days(days);

            let report = service
                .analyze(AnalysisRequest {
                    symbol: symbol.clone(),
                    benchmark: benchmark.clone(),
                    start,
                    end,
                    strategy: StrategyConfig::from_parts(kind, window, threshold),
                })
                .await?;

            println!("\nAnalysis: {} vs {} ({} to {})", symbol, benchmark, start, end);
            println!("Strategy: {:?}", report.strategy);
            println!("\n{:<24} {:>10} {:>10} {:>10}", "", "strategy", "hold", benchmark.as_str());
            print_row(
                "Total Return %",
                report.strategy_metrics.total_return * 100.0,
                report.baseline_metrics.total_return * 100.0,
                report.benchmark_metrics.total_return * 100.0,
            );
            print_row(
                "Annualized Vol %",
                report.strategy_metrics.annualized_volatility * 100.0,
                report.baseline_metrics.annualized_volatility * 100.0,
                report.benchmark_metrics.annualized_volatility * 100.0,
            );
            print_row(
                "Sharpe Ratio",
                report.strategy_metrics.sharpe_ratio,
                report.baseline_metrics.sharpe_ratio,
                report.benchmark_metrics.sharpe_ratio,
            );
            print_row(
                "Max Drawdown %",
                report.strategy_metrics.max_drawdown * 100.0,
                report.baseline_metrics.max_drawdown * 100.0,
                report.benchmark_metrics.max_drawdown * 100.0,
            );
            print_row(
                "Win Rate %",
                report.strategy_metrics.win_rate * 100.0,
                report.baseline_metrics.win_rate * 100.0,
                report.benchmark_metrics.win_rate * 100.0,
            );
            println!(
                "\nReturn correlation with {}: {:.3}",
                benchmark, report.benchmark_correlation
            );
            println!(
                "Active periods: {} of {}",
                report.strategy_metrics.active_periods,
                report.strategy_returns.len().saturating_sub(1)
            );
        }
    }

    Ok(())
}

fn print_row(label: &str, strategy: f64, hold: f64, benchmark: f64) {
    println!(
        "{:<24} {:>10.2} {:>10.2} {:>10.2}",
        label, strategy, hold, benchmark
    );
}

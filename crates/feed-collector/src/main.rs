//! 장 마감 후 가격 갱신 CLI.

use clap::Parser;

use feed_collector::{modules, modules::UpdateOutcome, CollectorConfig};
use feed_core::logging::{init_logging, LogConfig};
use feed_core::InstrumentRegistry;
use feed_data::YahooChartClient;

#[derive(Parser)]
#[command(name = "feed-collector")]
#[command(about = "한국장/미국장 종료 후 가격 데이터 갱신", long_about = None)]
#[command(version)]
struct Cli {
    /// 수집 범위 (kr, us, both). 미지정 시 MARKET 환경변수, 기본 both
    #[arg(long)]
    market: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(LogConfig::new(&cli.log_level))?;

    let config = CollectorConfig::from_env()?;
    let scope = config.resolve_scope(cli.market.as_deref())?;
    let registry = InstrumentRegistry::default();

    // 시세 조회 능력이 없으면 어떤 작업도 시작하기 전에 중단
    let provider = YahooChartClient::new()?;

    match modules::run_update(&config, &registry, provider, scope).await? {
        UpdateOutcome::Updated { rows, end } => {
            tracing::info!(rows = rows, end = %end, "prices.json 갱신됨");
        }
        UpdateOutcome::NoNewData => {
            tracing::info!("새 데이터 없음; prices.json 유지");
        }
    }

    Ok(())
}

use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{EnvFilter, fmt};

use synthflow::{AppConfig, OrderStreamGenerator, StopSignal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logger
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,synthflow=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    tracing::info!("🦀 SynthFlow starting (synthetic order stream generator)...");

    // 2. Load and validate configuration
    let config = AppConfig::load_default();
    config.validate()?;

    println!("==================================================");
    println!("📈 SynthFlow Continuous Order Stream 📈");
    println!("==================================================");
    println!("Sink: {}", config.sink.path);
    println!("Press ENTER to stop and print the run summary");
    println!("--------------------------------------------------");

    // 3. Wire the stop flag to Enter and Ctrl-C
    let stop = StopSignal::new();

    let enter_stop = stop.clone();
    tokio::spawn(async move {
        let mut line = String::new();
        let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let _ = stdin.read_line(&mut line).await;
        enter_stop.set();
    });

    let interrupt_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt_stop.set();
        }
    });

    // 4. Produce until stopped
    let mut generator = OrderStreamGenerator::initialize(&config)?;
    generator.run(&stop).await?;

    tracing::info!("Stopped after {} rows", generator.row_count());
    Ok(())
}

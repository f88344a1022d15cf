use std::sync::Arc;

use anyhow::Context;
use bluebliss::core::session::InMemorySessionStore;
use bluebliss::domain::ports::ConfigProvider;
use bluebliss::utils::{logger, validation::Validate};
use bluebliss::{CartAnalyzer, ComboCatalog, ServiceConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "analyze-cart")]
#[command(about = "Analyze a cart JSON file against the combo catalog")]
struct Args {
    /// Path to a JSON file shaped like {"cartItems": [...]}
    #[arg(required_unless_present = "list")]
    cart: Option<String>,

    /// Path to the service TOML configuration (catalog and trending list)
    #[arg(short, long)]
    config: Option<String>,

    /// Print the combo catalog instead of analyzing
    #[arg(long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            ServiceConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => ServiceConfig::with_defaults(),
    };

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let catalog = match config.catalog_path() {
        Some(path) => ComboCatalog::from_file(path),
        None => Ok(ComboCatalog::sample()),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if args.list {
        for combo in catalog.combos() {
            println!(
                "{:<10} {:<26} ₹{:<6} (save ₹{}) [{}]",
                combo.id,
                combo.name,
                combo.combo_price,
                combo.savings_potential(),
                combo.restaurants.join(", ")
            );
        }
        return Ok(());
    }

    let Some(cart_path) = args.cart.as_deref() else {
        anyhow::bail!("a cart file is required unless --list is given");
    };
    let content = tokio::fs::read_to_string(cart_path)
        .await
        .with_context(|| format!("failed to read cart file '{}'", cart_path))?;
    let body: serde_json::Value =
        serde_json::from_str(&content).context("cart file is not valid JSON")?;

    // 離線分析不呼叫 LLM
    let analyzer = CartAnalyzer::new(
        Arc::new(catalog),
        config.trending_dishes().to_vec(),
        None,
        Arc::new(InMemorySessionStore::default()),
    );

    match analyzer.analyze(&body).await {
        Ok(analysis) => {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Err(e) => {
            tracing::error!("❌ Analysis failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

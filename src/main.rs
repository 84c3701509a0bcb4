mod api;
mod chat;
mod common;
mod config;
mod storage;
mod ui;

use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::mpsc;

use chat::ChatClient;
use storage::LocalStore;
use ui::FinanceApp;

#[derive(Parser)]
#[command(
    name = "finmate",
    version,
    about = "Desktop client for the FinMate personal-finance platform"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);
    if !std::path::Path::new(&cli.config).exists() {
        if let Err(err) = config::save_config(&cli.config, &app_config) {
            log::warn!("could not write default config to {}: {err}", cli.config);
        }
    }

    let store = match storage::store_path(&app_config.data_dir)
        .map_err(|err| err.to_string())
        .and_then(|path| LocalStore::open(path).map_err(|err| err.to_string()))
    {
        Ok(store) => store,
        Err(err) => {
            // A broken store is not fatal; fall back to a throwaway one.
            log::error!("could not open local store: {err}");
            LocalStore::in_memory().expect("sqlite should open in memory")
        }
    };

    // UI -> chat task
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // chat task -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let client = ChatClient::new(&app_config, event_tx, cmd_rx);
    tokio::spawn(async move {
        if let Err(err) = client.run().await {
            log::error!("chat task terminated: {err}");
        }
    });

    let rt = tokio::runtime::Handle::current();
    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let api_base = app_config.api_base.clone();

    eframe::run_native(
        "FinMate",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("FinanceApp should only be initialized once");

            log::info!("client started against {api_base}");

            Ok(Box::new(FinanceApp::new(
                cc,
                &api_base,
                store,
                rt.clone(),
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )
}

use chrono::Utc;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::sync::Arc;

use tg_promo::app::App;
use tg_promo::config::AppConfig;
use tg_promo::countdown::Ticker;
use tg_promo::localization::Lang;
use tg_promo::pages::{ClaimOutcome, ConfirmationOutcome};
use tg_promo::router::Page;
use tg_promo::storage::{FileStorage, MemoryStorage};
use tg_promo::telegram::{StaticWebApp, TelegramBridge, WebAppHost};
use tg_promo::tracker::LogAnalytics;
use tg_promo::utils::PageFormatter;

#[derive(Parser)]
#[command(name = "tg-promo")]
#[command(about = "Launch countdown and reward redemption for the Telegram promo page")]
struct Args {
    /// Telegram WebApp initDataUnsafe JSON, e.g. '{"user":{"id":42,"language_code":"es"}}'
    #[arg(long, global = true, env = "TG_INIT_DATA")]
    init_data: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the countdown to launch
    Countdown {
        /// Print a single value instead of ticking every second
        #[arg(long)]
        once: bool,
        /// Language for labels
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Resolve the locale and redirect for a location like /es/confirmation?lang=pt
    Route { location: String },
    /// Run the landing page claim and show the confirmation page
    Claim {
        /// Location the page is opened at
        #[arg(long, default_value = "/")]
        location: String,
        /// Print the Telegram user and the outbound API call log
        #[arg(long)]
        debug: bool,
    },
}

fn build_bridge(init_data: Option<&str>) -> Result<TelegramBridge, Box<dyn std::error::Error + Send + Sync>> {
    match init_data {
        Some(json) => {
            let host: Arc<dyn WebAppHost> = Arc::new(StaticWebApp::from_json(json)?);
            Ok(TelegramBridge::new(Some(host)))
        }
        None => {
            info!("No Telegram init data, running outside Telegram");
            Ok(TelegramBridge::detached())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // load .env file if it exists
    if let Err(e) = dotenvy::dotenv() {
        match e {
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file not found, which is fine
            }
            _ => {
                eprintln!("warning: failed to load .env file: {}", e);
            }
        }
    }

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env()?;

    match args.command {
        Command::Countdown { once, lang } => {
            let lang = Lang::parse(&lang).unwrap_or_default();
            if once {
                let time = config.launch.countdown_at(Utc::now());
                println!("{}", PageFormatter::countdown(lang, &time));
                return Ok(());
            }

            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
            let ticker = Ticker::spawn(config.launch.clone(), move |time| {
                let _ = tx.send(time);
            });

            loop {
                tokio::select! {
                    tick = rx.recv() => {
                        let Some(time) = tick else { break };
                        println!("{}", PageFormatter::countdown(lang, &time));
                        if time.is_expired {
                            break;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Interrupted");
                        break;
                    }
                }
            }
            ticker.stop();
        }
        Command::Route { location } => {
            let app = App::new(
                config.clone(),
                Arc::new(FileStorage::open(&config.preferences_file)),
                Arc::new(MemoryStorage::new()),
                build_bridge(args.init_data.as_deref())?,
                Arc::new(LogAnalytics),
            )?;
            let navigation = app.navigate(&location);
            println!(
                "{} -> {} (lang {}, page {:?}{})",
                location,
                navigation.location,
                navigation.lang,
                navigation.page,
                if navigation.redirected { ", redirected" } else { "" }
            );
        }
        Command::Claim { location, debug } => {
            let mut app = App::new(
                config.clone(),
                Arc::new(FileStorage::open(&config.preferences_file)),
                Arc::new(MemoryStorage::new()),
                build_bridge(args.init_data.as_deref())?,
                Arc::new(LogAnalytics),
            )?;
            app.start();

            let navigation = app.navigate(&location);
            if navigation.page == Page::Confirmation {
                warn!("Claim started from the confirmation page, showing the landing page instead");
            }

            let landing = app.landing(navigation.lang);
            landing.on_ready();
            println!("{}\n", PageFormatter::landing(&landing.view(Utc::now())));

            match landing.claim().await {
                ClaimOutcome::Navigate(target) => {
                    let navigation = app.navigate(&target);
                    match app.confirmation(navigation.lang) {
                        ConfirmationOutcome::Show(page) => {
                            println!("{}", PageFormatter::confirmation(&page.view()));
                        }
                        ConfirmationOutcome::Redirect(target) => {
                            println!("Nothing to confirm, back to {}", target);
                        }
                    }
                }
                ClaimOutcome::InlineError(message) => println!("⚠️ {}", message),
                ClaimOutcome::Busy => println!("A claim is already in progress"),
            }

            if debug {
                println!("\n--- debug ---");
                println!("{}", PageFormatter::user(app.bridge().get_user().as_ref()));
                println!("{}", PageFormatter::api_calls(&app.call_log().entries()));
            }
        }
    }

    Ok(())
}

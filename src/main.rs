use anyhow::Context;
use clap::Parser;
use landing_gate::api::server::{self, AppState};
use landing_gate::config::cli::{Command, ConsentAction};
use landing_gate::core::{
    ConsentStorage, CookieCategory, WaitlistStore, WaitlistSubmission, CONSENT_DATE_KEY, CONSENT_KEY,
};
use landing_gate::utils::error::ErrorCategory;
use landing_gate::utils::{logger, validation::Validate};
use landing_gate::{
    AnalyticsLoader, CliConfig, ConsentGate, DocumentHead, FileConsentStorage, LandingConfig,
    LandingError, MemoryStore, SupabaseStore, WaitlistClient, WaitlistService,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    let config = LandingConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match cli.command {
        Command::Serve { memory, listen } => serve(&config, memory, listen).await?,
        Command::Sitemap { output } => {
            let (xml, count) = config.build_sitemap().render(chrono::Utc::now().date_naive())?;
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, xml)?;
            tracing::info!("✅ Sitemap generated with {} URLs", count);
            println!("📁 Sitemap written to: {}", output.display());
        }
        Command::Join {
            endpoint,
            name,
            email,
            practice,
            role,
            interests,
        } => {
            let client = WaitlistClient::new(&endpoint)?;
            let submission = WaitlistSubmission {
                name,
                email,
                practice,
                role,
                interests: Some(interests),
            };
            match client.submit(&submission).await {
                Ok(id) => println!("✅ Joined waitlist (id {})", id),
                Err(e) => exit_with(&e),
            }
        }
        Command::Consent { action } => consent(&config, action)?,
        Command::CheckConfig => {
            println!("✅ {} is valid", cli.config.display());
        }
    }

    Ok(())
}

async fn serve(config: &LandingConfig, memory: bool, listen: Option<String>) -> anyhow::Result<()> {
    let store: Arc<dyn WaitlistStore> = if memory {
        tracing::warn!("⚠️ Using in-memory waitlist store, entries are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let datastore = config.datastore()?;
        datastore.validate()?;
        Arc::new(SupabaseStore::from_config(datastore)?)
    };

    let state = AppState::new(WaitlistService::new(store), config.build_sitemap());
    let listen_addr = listen.unwrap_or_else(|| config.server.listen_addr.clone());
    server::serve(&listen_addr, state).await?;
    Ok(())
}

fn consent(config: &LandingConfig, action: ConsentAction) -> anyhow::Result<()> {
    let now = chrono::Utc::now();
    let storage = FileConsentStorage::open(&config.consent.storage_path)?;
    let mut gate = ConsentGate::new(
        storage,
        DocumentHead::new(),
        AnalyticsLoader::new(config.analytics.measurement_id.clone()),
    );
    gate.load(now)?;

    match action {
        ConsentAction::Status => {}
        ConsentAction::Accept => gate.accept_all(now)?,
        ConsentAction::Reject => gate.reject_all(now)?,
        ConsentAction::Custom {
            analytics,
            marketing,
        } => {
            gate.open_preferences();
            if gate.preference().analytics != analytics {
                gate.toggle(CookieCategory::Analytics);
            }
            if gate.preference().marketing != marketing {
                gate.toggle(CookieCategory::Marketing);
            }
            gate.save_custom(now)?;
        }
        ConsentAction::Reset => {
            let (mut storage, _) = gate.into_parts();
            storage.remove(CONSENT_KEY)?;
            storage.remove(CONSENT_DATE_KEY)?;
            println!("🍪 Consent cleared");
            return Ok(());
        }
    }

    let preference = gate.preference();
    println!(
        "🍪 banner: {}, necessary: {}, analytics: {}, marketing: {}",
        if gate.banner_visible() { "shown" } else { "hidden" },
        preference.necessary,
        preference.analytics,
        preference.marketing
    );
    let head = gate.host().render();
    if !head.is_empty() {
        println!("{}", head);
    }
    Ok(())
}

fn exit_with(e: &LandingError) -> ! {
    tracing::error!("❌ Waitlist submission failed: {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());

    // 依錯誤類別決定退出碼
    let exit_code = match e.category() {
        ErrorCategory::Validation => 2,
        ErrorCategory::Conflict => 3,
        ErrorCategory::Backend => 1,
        ErrorCategory::Config => 4,
    };
    std::process::exit(exit_code);
}

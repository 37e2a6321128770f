use clap::Parser;
use inbox_sorter::{
    categories::CategoryRegistry,
    cli::Args,
    config::AppConfig,
    documents::PdfExtractor,
    llm,
    utils::init_logger,
    watcher::{Dispatcher, FolderWatcher},
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    // Load configuration; flags override the environment
    let mut config = AppConfig::from_env()?;
    args.apply(&mut config);

    let _log_guard = init_logger(&config.logging)?;
    debug!("Configuration loaded: {:?}", config);

    config.validate()?;

    let registry = Arc::new(CategoryRegistry::load(&config.watch.categories_path())?);
    let extractor = Arc::new(PdfExtractor::new(config.classification.max_pdf_pages));
    let adapter = llm::adapter_for(&config.llm)?;
    info!(model = %config.llm.model, base_url = %config.llm.base_url, "Using LLM endpoint");

    let (watcher, events) = FolderWatcher::start(&config.watch.folder)?;

    println!("Watching inbox: {}", watcher.folder().display());
    println!("Categories: {}", registry.names().join(", "));
    println!("Press Ctrl+C to stop.");

    let dispatcher = Dispatcher::new(&config, registry, extractor, adapter);
    let shutdown = async {
        // An unavailable signal handler means we simply run until the channel closes
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    dispatcher
        .run(events, shutdown, |report| println!("{}", report))
        .await;

    println!("Stopped.");
    Ok(())
}

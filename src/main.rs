use clap::Parser;
use recipe_finder::{
    api::{handlers::AppState, routes},
    cli::{commands, Cli, Commands},
    config::Settings,
    finder::{SharedSession, Threshold},
    loader, Error, Result,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipe_finder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Search {
            query,
            min_match,
            catalog,
        } => {
            override_source(&mut settings, catalog);
            let threshold = match min_match {
                Some(value) => Threshold::new(value)?,
                None => settings.search.default_threshold()?,
            };
            commands::search(&settings.loader, &query, threshold).await?;
        }
        Commands::Show { recipe, catalog } => {
            override_source(&mut settings, catalog);
            commands::show(&settings.loader, &recipe).await?;
        }
        Commands::Validate { catalog } => {
            override_source(&mut settings, catalog);
            commands::validate(&settings.loader).await?;
        }
    }

    Ok(())
}

fn override_source(settings: &mut Settings, catalog: Option<String>) {
    if let Some(source) = catalog {
        settings.loader.source = source;
    }
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting Recipe Finder server");
    info!("Catalog: {}", settings.loader.source);
    info!("Server: {}:{}", settings.server.host, settings.server.port);

    // Searches are refused until the background load settles
    let session = SharedSession::new();
    {
        let session = session.clone();
        let loader_config = settings.loader.clone();
        tokio::spawn(async move {
            loader::load_into(&session, &loader_config).await;
        });
    }

    let state = AppState {
        session,
        settings: settings.clone(),
    };
    let app = routes::create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Recipe Finder");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("Catalog: {}", settings.loader.source);
    println!("Default minimum match: {}%", settings.search.default_min_match);
    println!("\nAPI Endpoints:");
    println!("  GET  /api/search?q=<ingredients>&min_match=<0-100>");
    println!("  GET  /api/recipes/:id");
    println!("  GET  /api/status");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

use anyhow::Context;
use chrono::Utc;
use genres::{
    AppConfig, AppState, DatabaseProvider,
    api::routes::create_app,
    cli::{
        Cli, Commands,
        init::{self, InitConfig, InitResult},
        output::Output,
    },
};
use std::{path::Path, process::ExitCode, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = Output::for_flag(cli.no_color);

    match cli.command {
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => {
            let result = init::run(
                InitConfig {
                    path,
                    force,
                    host,
                    port,
                },
                &output,
            );
            Ok(match result {
                InitResult::Success => ExitCode::SUCCESS,
                InitResult::AlreadyExists | InitResult::Error(_) => ExitCode::FAILURE,
            })
        }
        Some(Commands::Config { full, validate }) => {
            Ok(show_config(&cli.config, full, validate, &output))
        }
        Some(Commands::Prune) => {
            let Some(config) = load_config(&cli.config, &output) else {
                return Ok(ExitCode::FAILURE);
            };
            init_tracing(&config.server.log_level, cli.verbose);
            prune(config, &output).await
        }
        None => {
            let Some(config) = load_config(&cli.config, &output) else {
                return Ok(ExitCode::FAILURE);
            };
            init_tracing(&config.server.log_level, cli.verbose);
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(log_level: &str, verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("genres=debug,tower_http=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("genres={log_level},tower_http={log_level}").into()
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Loads and validates the config, reporting any failure through `output`.
fn load_config(path: &Path, output: &Output) -> Option<AppConfig> {
    match AppConfig::load(path) {
        Ok(config) => Some(config),
        Err(e) => {
            output.error(&format!("{}: {}", path.display(), e));
            if !path.exists() {
                output.hint("Run 'genre-server init' to create a configuration");
            }
            None
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let db = DatabaseProvider::from_config(&config.database)
        .create_client()
        .await
        .context("opening database")?;
    tracing::info!(url = %config.database.url, "database ready");

    let addr = config.bind_address();
    let cleanup_every = config.auth.blacklist_cleanup_interval;
    let state = AppState::from_parts(config, db)?;

    let cleanup = (cleanup_every > 0).then(|| {
        state
            .auth_service
            .start_blacklist_cleanup(Duration::from_secs(cleanup_every))
    });

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("genre-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = cleanup {
        handle.abort();
    }
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

async fn prune(config: AppConfig, output: &Output) -> anyhow::Result<ExitCode> {
    let db = DatabaseProvider::from_config(&config.database)
        .create_client()
        .await
        .context("opening database")?;
    let state = AppState::from_parts(config, db)?;

    let removed = state
        .auth_service
        .prune_blacklist(Utc::now().timestamp())
        .await?;
    output.pruned(removed);

    Ok(ExitCode::SUCCESS)
}

fn show_config(path: &Path, full: bool, validate: bool, output: &Output) -> ExitCode {
    output.section("Configuration");
    output.field("File", &path.display().to_string());

    let config = match AppConfig::load_unvalidated(path) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    output.field("Bind address", &config.bind_address());
    output.field("Database", &config.database.url);

    if full {
        output.field("Log level", &config.server.log_level);
        output.field(
            "Max body",
            &format!("{} bytes", config.server.max_body_bytes),
        );
        output.field("JWT secret env", &config.auth.jwt_secret_env);
        output.field("Token expiry", &format!("{}s", config.auth.token_expiry));
        output.field(
            "Blacklist cleanup",
            &match config.auth.blacklist_cleanup_interval {
                0 => "disabled".to_string(),
                secs => format!("every {}s", secs),
            },
        );
        if let Some(ref env) = config.database.turso_url_env {
            output.field("Turso URL env", env);
        }
    }

    if validate {
        println!();
        match config.validate() {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use taskboard::{
    Config, Database, Profile, api,
    cli::{self, Cli, Commands},
    utils,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps a separate config and database from the default profile
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(&utils::expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };
    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }

    init_tracing(&config.log_filter);

    let db = open_database(&config)?;
    let mut stdout = std::io::stdout().lock();

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(&config, db)?;
        }
        Commands::AddTask { title, due } => cli::handle_add_task(title, due, &db, &mut stdout)?,
        Commands::List => cli::handle_list(&db, &mut stdout)?,
        Commands::Done { id } => cli::handle_done(id, &db, &mut stdout)?,
        Commands::Undone { id } => cli::handle_undone(id, &db, &mut stdout)?,
        Commands::DeleteTask { id } => cli::handle_delete_task(id, &db, &mut stdout)?,
    }

    Ok(())
}

/// Logs go to stderr so CLI command output on stdout stays clean.
fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_database(config: &Config) -> Result<Database> {
    if config.database_path == ":memory:" {
        tracing::warn!("Using an in-memory database; tasks are lost on exit");
        return Ok(Database::in_memory()?);
    }

    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| eyre!("Database path contains invalid UTF-8"))?,
    )?;
    Ok(db)
}

fn serve(config: &Config, db: Database) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        tracing::info!(address = %config.socket_address(), "Starting taskboard");
        let router = api::create_router(api::AppState::new(db));
        api::server::run(&config.socket_address(), router).await
    })?;

    Ok(())
}

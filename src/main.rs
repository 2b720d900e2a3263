//! taxi-glance - A small analytic dashboard over NYC taxi trips.

use taxi_glance::cli::{Cli, OutputFormat};
use taxi_glance::config::Config;
use taxi_glance::db::{create_client, BackendKind};
use taxi_glance::error::Result;
use taxi_glance::logging;
use taxi_glance::output::{format_query_list, QueryOutput};
use taxi_glance::query::QueryExecutor;
use taxi_glance::web;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init_stderr_logging();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

/// Runs the selected mode. Returns false when a headless query failed.
async fn run() -> Result<bool> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config)?;

    match config.backend.kind {
        BackendKind::SingleStore => {
            info!("Backend: SingleStore ({})", config.singlestore.display_string())
        }
        BackendKind::Druid => info!("Backend: Druid ({})", config.druid.base_url()),
        BackendKind::Mock => info!("Backend: in-memory sample data"),
    }

    let executor = QueryExecutor::for_backend(create_client(&config)?);

    if cli.list {
        print!("{}", format_query_list(&executor.registry().keys()));
        return Ok(true);
    }

    if let Some(name) = &cli.query {
        let model = executor.run(name).await;
        print!("{}", QueryOutput::new(cli.output).format(&model));
        if cli.output == OutputFormat::Json {
            println!();
        }
        return Ok(!model.is_error());
    }

    let listener = web::bind(&config.server.bind).await?;
    web::serve(listener, executor).await?;
    Ok(true)
}

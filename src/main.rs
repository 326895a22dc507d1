use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use tulip::config::Config;
use tulip::error::Error;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    // a missing .env file is fine; the environment may already be populated
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    let config = Config::from_env()?;

    tulip::run(config).await
}

use actix_cors::Cors;
use actix_web::web::{self, Data, JsonConfig, PathConfig, ServiceConfig};
use actix_web::{get, App, HttpServer};
use mongodb::Client;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod auth;
pub mod campaign;
pub mod config;
pub mod database;
pub mod donation;
pub mod error;
pub mod fields;
pub mod person;
pub mod response;
pub mod typedid;
pub mod user;

use auth::{FirebaseVerifier, IdentityVerifier};
use config::Config;
use database::{Database, MongoDatabase};
use error::Error;

#[get("/")]
pub async fn index() -> &'static str {
    "Hello World!"
}

/// Registers every route and the extractor error formats. The caller provides
/// `Data<Box<dyn Database>>` and `Data<Box<dyn IdentityVerifier>>`.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .service(index)
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::get_campaigns_by_user)
    .service(campaign::endpoints::delete_campaign)
    .service(campaign::endpoints::update_campaign)
    .service(person::endpoints::get_people)
    .service(donation::endpoints::create_donation)
    .service(donation::endpoints::get_donations_by_user)
    .default_service(web::to(|| async {
        Err::<&'static str, _>(Error::PathNotFound)
    }));
}

pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to db: {}", config.database_name);
    let client = Client::with_uri_str(&config.mongodb_uri).await?;
    let db = MongoDatabase::initialize(client.database(&config.database_name)).await?;
    let db = Data::new(Box::new(db) as Box<dyn Database>);

    info!(
        "verifying tokens for firebase project: {}",
        config.firebase_project_id
    );
    let verifier = FirebaseVerifier::new(config.firebase_project_id.clone());
    let verifier = Data::new(Box::new(verifier) as Box<dyn IdentityVerifier>);

    info!("listening on: {}", config.listen_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .app_data(verifier.clone())
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .configure(configure)
    })
    .bind(&config.listen_addr)?
    .run()
    .await?;

    Ok(())
}

use news_api::config::AppConfig;
use news_api::{db, logging};
use std::process;
use tracing::{error, info};

#[rocket::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            process::exit(1);
        }
    };
    logging::init(config.log_format);

    let pool = match db::init_pool(&config) {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "failed to create database pool");
            process::exit(1);
        }
    };
    info!(pool_size = config.pool_size, "database pool ready");

    if let Err(e) = news_api::rocket(pool).launch().await {
        error!(error = %e, "server terminated");
        process::exit(1);
    }
}

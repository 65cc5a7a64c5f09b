use std::env;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method};
use dotenv::dotenv;
use log::info;
use tower_http::cors::{AllowOrigin, CorsLayer, MaxAge};

use tollway::server::RouteService;
use tollway::toll::TollDataset;
use tollway::track::TokioScheduler;
use tollway::Config;

fn cors(origins: &str) -> CorsLayer {
    CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST])
        .allow_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(
            origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok()),
        ))
        .max_age(MaxAge::exact(Duration::from_secs(3600)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load `.env` file, if present
    dotenv().ok();

    #[cfg(feature = "tracing")]
    tollway::util::trace::initialize_tracer();
    #[cfg(not(feature = "tracing"))]
    env_logger::init();

    let config = Config::from_env()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();

    let scheduler = TokioScheduler::current().ok_or("server must run inside a tokio runtime")?;
    let service = RouteService::from_config(&config, TollDataset::default(), scheduler)?;

    let app = Arc::new(service).router().layer(cors(&allowed_origins));

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    info!("Terminating server");
    Ok(())
}

// src/main.rs
use actix_web::{middleware, web, App, HttpServer};
use quiz_solver::api::{configure_routes, AppState};
use quiz_solver::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Warning: Could not load .env file: {}", e);
        eprintln!("   Falling back to the process environment");
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = config::AppConfig::from_env().map_err(|e| {
        log::error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let bind = (app_config.host.clone(), app_config.port);
    log::info!(
        "Loaded {} caller credential(s), model {}, deadline {}s",
        app_config.credentials.len(),
        app_config.openai.model,
        app_config.effective_deadline().as_secs()
    );

    let state = AppState::new(app_config);

    log::info!("🚀 Starting server on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}

use astra::Server;
use std::net::SocketAddr;

use crate::app::App;
use crate::config::AppConfig;
use crate::db::init_db;
use crate::responses::error_to_response;
use crate::router::handle;

mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod forms;
mod geocode;
mod mailer;
mod marketplace;
mod responses;
mod router;
mod storage;
mod templates;
mod util;

#[cfg(test)]
mod tests;

fn main() {
    let config = AppConfig::from_env();
    let app = App::from_config(&config);

    if let Err(e) = init_db(&app.db, "sql/schema.sql") {
        eprintln!("database initialization failed: {e}");
        std::process::exit(1);
    }
    if let Err(e) = app.images.ensure_dir() {
        eprintln!("upload dir initialization failed: {e}");
        std::process::exit(1);
    }

    if config.geocoding.is_none() {
        println!("GEOCODING_API_KEY not set; listing forms take manual coordinates");
    }
    if config.google.is_none() {
        println!("Google OAuth not configured; email/password sign-in only");
    }
    if config.mail.is_none() {
        println!("BREVO_API_KEY not set; password reset links are logged to stdout");
    }

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("invalid BIND_ADDR {}: {e}", config.bind_addr);
            std::process::exit(1);
        }
    };
    println!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}

#![deny(warnings)]

mod analytics;
mod config;
mod errors;
mod logging;
mod model;
mod narrative;
mod risk;
mod web;

use errors::Error;
type Result<T> = std::result::Result<T, Error>;

#[tokio::main]
async fn main() {
    use logging::*;

    let log = DEFAULT.new(o!("function" => "main"));
    info!(log, "Starting up");

    if let Err(e) = web::run().await {
        crit!(log, "Server terminated"; "error" => %e);
    }
}

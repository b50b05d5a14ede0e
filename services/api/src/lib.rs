mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use rhu_placement::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

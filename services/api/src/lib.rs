mod batch;
mod cli;
mod infra;
mod routes;
mod server;

use cv_shortlist::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

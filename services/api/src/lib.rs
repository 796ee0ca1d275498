mod cli;
mod infra;
mod predict;
mod routes;
mod server;

use preflist::error::AppError;

pub use infra::AppState;
pub use routes::api_router;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

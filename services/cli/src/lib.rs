mod cli;
mod commands;
mod render;

use rebate_qualifier::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}

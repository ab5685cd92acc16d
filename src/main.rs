use std::process::ExitCode;

use clap::Parser;

use rest_api_template::bootstrap::{self, Outcome};
use rest_api_template::cli::Cli;
use rest_api_template::lifecycle::Application;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let app = Application::new();

    let outcome: Outcome = bootstrap::execute(&cli, app, &mut std::io::stdout()).await;
    outcome.exit_code()
}

use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use tracing::info;

use signup::{
    app::App,
    cli::{Cli, Cmd},
    errors, logging, validate,
};
use user_form::FormConfig;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    errors::init()?;
    let _guard = logging::init()?;

    let args = Cli::parse();
    let config = match &args.config {
        Some(dir) => FormConfig::from_dir(dir)?,
        None => FormConfig::load()?,
    };
    info!(?config, "configuration loaded");

    match args.cmd.unwrap_or(Cmd::Run) {
        Cmd::Run => {
            let mut app = App::new(config)?;
            app.run().await?;
            if let Some(json) = app.page.submitted() {
                println!("{json}");
            }
        }
        Cmd::Validate { set, json } => {
            let outcome = validate::run(user_form::UserInfoForm::new(config)?, &set)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", validate::render(&outcome));
            }
            // returned rather than `process::exit` so the log guard flushes on drop
            return Ok(ExitCode::from(outcome.exit_status()));
        }
    }
    Ok(ExitCode::SUCCESS)
}

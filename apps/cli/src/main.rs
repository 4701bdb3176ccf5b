use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{FormController, HttpProcessClient, SelectedFile};
use shared::domain::{Operation, ParamField};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;
use render::{render_fields, render_view};

#[derive(Parser, Debug)]
#[command(name = "pixform", about = "Send images to an image processing server")]
struct Cli {
    /// Overrides the configured server, e.g. http://127.0.0.1:5000
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one image and print the resulting previews and metadata.
    Process(ProcessArgs),
    /// List the parameter fields each operation uses.
    Fields {
        #[arg(long)]
        operation: Option<Operation>,
    },
    /// List the operations the server understands.
    Operations,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long)]
    operation: Option<Operation>,
    #[arg(long)]
    factor: Option<String>,
    #[arg(long)]
    antialias: Option<String>,
    #[arg(long)]
    scale: Option<String>,
    #[arg(long)]
    method: Option<String>,
    #[arg(long)]
    amount: Option<String>,
    #[arg(long)]
    radius: Option<String>,
    #[arg(long)]
    alpha: Option<String>,
    #[arg(long)]
    beta: Option<String>,
    /// Write the server's copy of the input image here.
    #[arg(long)]
    save_input: Option<PathBuf>,
    /// Write the processed image here.
    #[arg(long)]
    save_output: Option<PathBuf>,
}

impl ProcessArgs {
    fn param_values(&self) -> Vec<(ParamField, &str)> {
        [
            (ParamField::Factor, &self.factor),
            (ParamField::Antialias, &self.antialias),
            (ParamField::Scale, &self.scale),
            (ParamField::Method, &self.method),
            (ParamField::Amount, &self.amount),
            (ParamField::Radius, &self.radius),
            (ParamField::Alpha, &self.alpha),
            (ParamField::Beta, &self.beta),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = load_settings()?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Operations => {
            for operation in Operation::ALL {
                println!("{operation}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Fields { operation } => {
            match operation {
                Some(operation) => println!("{}", render_fields(operation)),
                None => Operation::ALL
                    .into_iter()
                    .for_each(|operation| println!("{}", render_fields(operation))),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Process(args) => {
            let client = HttpProcessClient::new(&settings.server_url)
                .with_context(|| format!("invalid server url '{}'", settings.server_url))?
                .with_process_path(settings.process_path.clone());
            let operation = args.operation.unwrap_or(settings.default_operation);
            run_process(FormController::with_operation(client, operation), &args).await
        }
    }
}

async fn run_process(
    mut controller: FormController<HttpProcessClient>,
    args: &ProcessArgs,
) -> Result<ExitCode> {
    for (field, value) in args.param_values() {
        controller.set_field(field, value);
    }
    if let Some(path) = &args.file {
        let file = SelectedFile::from_path(path)
            .await
            .with_context(|| format!("failed to read image '{}'", path.display()))?;
        controller.select_file(file);
    }

    let result = controller.process().await;
    print!("{}", render_view(controller.view()));

    let Ok(images) = result else {
        return Ok(ExitCode::FAILURE);
    };

    let downloads = [
        (&args.save_input, &images.input_url),
        (&args.save_output, &images.output_url),
    ];
    for (target, url) in downloads {
        let Some(target) = target else {
            continue;
        };
        let bytes = controller
            .fetch_preview(url)
            .await
            .with_context(|| format!("failed to download preview '{url}'"))?;
        tokio::fs::write(target, &bytes)
            .await
            .with_context(|| format!("failed to write '{}'", target.display()))?;
        info!(url = %url, path = %target.display(), "saved preview");
    }

    Ok(ExitCode::SUCCESS)
}

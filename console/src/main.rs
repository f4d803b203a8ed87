use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use horarios_console::{actions, render};
use horarios_core::{ApiClient, ClientConfig, ResourceId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "horarios-console", version)]
#[command(about = "Administración del sistema de horarios académicos")]
struct Cli {
    /// Backend API root, e.g. http://localhost:8000/api/
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the page at a path such as /profesores or /horarios/bd.
    View {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Ask the backend to generate the schedule.
    Generate,
    /// Delete every schedule entry.
    DeleteAll,
    /// Upload an .xls or .xlsx spreadsheet of schedules.
    Import { file: PathBuf },
    /// Save the current schedule as a named version.
    SaveVersion { name: String },
    /// Replace the current schedule with a saved version.
    RestoreVersion { id: ResourceId },
}

fn client_config(api_url: Option<&str>) -> anyhow::Result<ClientConfig> {
    ClientConfig::from_env_with_url(api_url).context("loading client configuration")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "horarios_console=info,horarios_core=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(client_config(cli.api_url.as_deref())?);

    let output = match cli.command {
        Command::View { path } => render(&client, &path),
        Command::Generate => actions::generate(&client).context("generating schedules")?,
        Command::DeleteAll => actions::delete_all(&client).context("deleting schedules")?,
        Command::Import { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("{} has no usable file name", file.display()))?;
            actions::import(&client, filename, &bytes)
                .with_context(|| format!("importing {filename}"))?
        }
        Command::SaveVersion { name } => {
            actions::save_version(&client, &name).context("saving version")?
        }
        Command::RestoreVersion { id } => actions::restore_version(&client, &id)
            .with_context(|| format!("restoring version {id}"))?,
    };
    println!("{output}");
    Ok(())
}

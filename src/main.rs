use clap::{Parser, Subcommand};
use email_preview::config::ENDPOINT_ENV;
use email_preview::{
    BackendClient, Config, EmailPreviewRequester, FilePreview, FilePrompt, PreviewError,
    PreviewSurface, PromptSource, StdoutPreview,
};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "email-preview",
    version,
    about = "Generate an HTML email from a prompt and preview the result"
)]
struct Cli {
    /// URL the prompt is posted to
    #[arg(long, env = ENDPOINT_ENV, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a prompt and write the returned HTML
    Generate {
        /// Prompt text; read from stdin when neither this nor --prompt-file is given
        #[arg(long, conflicts_with = "prompt_file")]
        prompt: Option<String>,

        /// File holding the prompt text
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// File the HTML preview is written to; stdout when absent
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Check that the backend is up
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "email_preview=info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Preview not updated ({}): {e}", e.kind());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), PreviewError> {
    let endpoint = cli.endpoint.ok_or_else(|| {
        PreviewError::Config(format!("pass --endpoint or set {ENDPOINT_ENV}"))
    })?;
    let config = Config::new(&endpoint)?;
    let client = BackendClient::new(&config);

    match cli.command {
        Command::Status => {
            let status = client.status().await?;
            if !status.is_ok() {
                warn!("Backend reported status {:?}", status.status);
            }
            println!(
                "{}: {}",
                status.status,
                status.msg.as_deref().unwrap_or("no message")
            );
            Ok(())
        }
        Command::Generate {
            prompt,
            prompt_file,
            out,
        } => {
            let prompt = match (prompt, prompt_file) {
                (Some(text), _) => PromptInput::Text(text),
                (None, Some(path)) => PromptInput::File(FilePrompt::new(path)),
                (None, None) => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text)?;
                    PromptInput::Text(text)
                }
            };

            match out {
                Some(path) => generate(client, prompt, FilePreview::new(path)).await,
                None => generate(client, prompt, StdoutPreview).await,
            }
        }
    }
}

async fn generate<P: PreviewSurface>(
    client: BackendClient,
    prompt: PromptInput,
    preview: P,
) -> Result<(), PreviewError> {
    info!("Requesting preview from {}", client.endpoint());
    let requester = EmailPreviewRequester::new(client, prompt, preview);
    requester.generate_email().await?;
    info!("Preview updated");
    Ok(())
}

/// Prompt chosen on the command line.
enum PromptInput {
    Text(String),
    File(FilePrompt),
}

impl PromptSource for PromptInput {
    fn read_prompt(&self) -> email_preview::Result<String> {
        match self {
            PromptInput::Text(text) => text.read_prompt(),
            PromptInput::File(file) => file.read_prompt(),
        }
    }
}

use std::{env, fs, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use scribe_core::{
    FsTranscriptSaver, HttpScribeApi, MissingClipboard, MissingTranscriptSaver, SessionController,
    TranscriptSaver,
};
use shared::domain::AudioFile;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Parser, Debug)]
#[command(name = "scribe", about = "Transcribe an audio file and optionally fix its grammar")]
struct Args {
    /// Audio file to upload.
    file: PathBuf,
    /// Base URL of the transcription service. Falls back to SCRIBE_API_URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Also run the transcript through the grammar endpoint.
    #[arg(long)]
    fix_grammar: bool,
    /// Save the displayed transcript as <name>-<view>.txt in this directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let server_url = args
        .server_url
        .or_else(|| env::var("SCRIBE_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let bytes = fs::read(&args.file)
        .with_context(|| format!("failed reading audio file {}", args.file.display()))?;
    let name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("audio")
        .to_string();

    let saver: Arc<dyn TranscriptSaver> = match &args.out_dir {
        Some(dir) => Arc::new(FsTranscriptSaver::new(dir)),
        None => Arc::new(MissingTranscriptSaver),
    };
    let controller = SessionController::new_with_dependencies(
        Arc::new(HttpScribeApi::new(server_url)),
        Arc::new(MissingClipboard),
        saver,
    );

    controller.select_file(AudioFile::new(name, bytes)).await;
    if let Some(err) = controller.snapshot().await.error_message {
        bail!(err);
    }

    controller.submit_transcription().await;
    let snapshot = controller.snapshot().await;
    if let Some(err) = snapshot.error_message {
        bail!(err);
    }
    println!("{}", snapshot.displayed_text().unwrap_or_default());

    if args.fix_grammar {
        controller.submit_grammar_fix().await;
        let snapshot = controller.snapshot().await;
        if let Some(err) = snapshot.error_message {
            bail!(err);
        }
        println!("--- corrected ---");
        println!("{}", snapshot.displayed_text().unwrap_or_default());
    }

    if args.out_dir.is_some() {
        if let Some(path) = controller.download_current_text().await {
            println!("saved {}", path.display());
        }
    }

    Ok(())
}

//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::commands::build_provider;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use scriptmind_domain::MemoryStore;
use scriptmind_extractor::{ExtractorConfig, Pipeline};
use scriptmind_store::JsonFileStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let script = fs::read_to_string(&args.script)?;
    let extractor_config = extractor_config(&config.extractor, &args);
    let provider = build_provider(&config.provider, &args.provider)?;

    info!(
        script = %args.script.display(),
        chars = script.chars().count(),
        chunk_size = extractor_config.chunk_size,
        "Extracting memories"
    );

    let show_progress = formatter.format() != OutputFormat::Quiet;
    let pipeline = Pipeline::new(provider, extractor_config)?.with_progress(|message: &str, percent: u8| {
        if show_progress {
            eprintln!("{}", formatter.progress(message, percent));
        }
    });

    let outcome = pipeline.run_until(&script, shutdown_signal()).await?;

    let source = args
        .script
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.script.display().to_string());

    let saved = match &args.output {
        Some(path) => {
            let store = JsonFileStore::new(parent_dir(path))?.with_source(source);
            store.save_to(path, &outcome.memories)?;
            path.clone()
        }
        None => {
            let store = JsonFileStore::new(&config.settings.output_dir)?.with_source(source);
            store.save(&outcome.memories)?
        }
    };

    println!("{}", formatter.format_summary(&outcome)?);

    let failures = outcome.metadata.total_failures();
    if failures > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} chunk extraction(s) failed; see the placeholder entries", failures))
        );
    }
    eprintln!("{}", formatter.success(&format!("Saved memories to {}", saved.display())));

    Ok(())
}

/// Apply command-line overrides to the configured extractor settings.
pub fn extractor_config(base: &ExtractorConfig, args: &ExtractArgs) -> ExtractorConfig {
    let mut config = base.clone();
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(overlap) = args.overlap {
        config.chunk_overlap = overlap;
    }
    if let Some(concurrency) = args.concurrency {
        config.max_concurrency = concurrency;
    }
    if let Some(timeout) = args.timeout {
        config.extraction_timeout_secs = timeout;
    }
    config
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

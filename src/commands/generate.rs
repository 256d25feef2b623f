use crate::cli::OutputFormat;
use crate::config::Config;
use crate::content::{self, GeneratedImage, StudyContent};
use crate::error::{BibliaError, Result};
use crate::facade::OrchestrationFacade;
use crate::illustrations::Liveness;
use base64::Engine as _;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How a generated study is presented
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub no_images: bool,
    pub images_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Options for the `generate` command
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub topic: String,
    pub save: bool,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    study: &'a StudyContent,
    images: &'a [GeneratedImage],
}

/// Generate a study and print it
///
/// # Errors
///
/// Returns an error for a blank topic, a failed generation, or when
/// illustrations cannot be written to `images_dir`.
pub async fn run_generate(config: Config, options: GenerateOptions) -> Result<()> {
    let topic = options.topic.trim();
    if topic.is_empty() {
        return Err(BibliaError::Config("Topic must not be empty".to_string()).into());
    }

    let facade = OrchestrationFacade::from_config(&config)?;
    tracing::info!(capability = facade.capability_name(), "Generating study");

    let study = facade.generate(topic).await?;

    if options.save {
        let message = save_study(&facade, &study)?;
        eprintln!("{}", message.green());
    }

    present(&facade, &study, &options.output).await
}

/// Generate a new study from the history entry matching `id_prefix`
///
/// # Errors
///
/// Returns an error when no single entry matches, the generation fails,
/// or illustrations cannot be written.
pub async fn run_open(config: Config, id_prefix: &str, output: OutputOptions) -> Result<()> {
    let facade = OrchestrationFacade::from_config(&config)?;
    let study = facade.reopen(id_prefix).await?;
    present(&facade, &study, &output).await
}

/// Explicitly record `study`, describing what happened
fn save_study(facade: &OrchestrationFacade, study: &StudyContent) -> Result<&'static str> {
    let added = facade.save_to_history(study)?;
    Ok(match (added, facade.records_on_generate()) {
        (true, _) => "Study saved to history.",
        (false, true) => "Study recorded in history.",
        (false, false) => "Study already in history.",
    })
}

async fn present(
    facade: &OrchestrationFacade,
    study: &StudyContent,
    output: &OutputOptions,
) -> Result<()> {
    let images = if output.no_images {
        Vec::new()
    } else {
        fetch_images(facade, study).await
    };

    let written = match &output.images_dir {
        Some(dir) => write_images(dir, &images)?,
        None => Vec::new(),
    };

    match output.format {
        OutputFormat::Markdown => print_markdown(study, &images, &written),
        OutputFormat::Json => {
            let rendered = GenerateOutput {
                study,
                images: &images,
            };
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        OutputFormat::Share => println!("{}", content::share_text(study)),
    }

    Ok(())
}

/// Fetch the illustration batch, dropping it if interrupted with Ctrl-C
async fn fetch_images(facade: &OrchestrationFacade, study: &StudyContent) -> Vec<GeneratedImage> {
    let liveness = Liveness::new();
    let watcher = {
        let liveness = liveness.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted; illustrations will be discarded");
                liveness.teardown();
            }
        })
    };

    let mut images = Vec::new();
    facade
        .fetch_illustrations(study, &liveness, |batch| images = batch)
        .await;
    watcher.abort();

    images
}

/// Decode data-URI illustrations into `dir`
///
/// Remote URLs and undecodable payloads are skipped with a warning.
///
/// # Returns
///
/// Paths of the files written, in image order.
pub fn write_images(dir: &Path, images: &[GeneratedImage]) -> Result<Vec<PathBuf>> {
    if images.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (idx, image) in images.iter().enumerate() {
        let Some((_, payload)) = image.data_uri_parts() else {
            tracing::warn!(index = idx, "Skipping illustration without inline data");
            continue;
        };

        let bytes = match base64::engine::general_purpose::STANDARD.decode(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(index = idx, "Failed to decode illustration: {}", e);
                continue;
            }
        };

        let extension = image::guess_format(&bytes)
            .ok()
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("bin");

        let path = dir.join(format!("ilustracao-{}.{}", idx + 1, extension));
        std::fs::write(&path, &bytes)?;
        tracing::debug!(path = %path.display(), "Wrote illustration");
        written.push(path);
    }

    Ok(written)
}

fn print_markdown(study: &StudyContent, images: &[GeneratedImage], written: &[PathBuf]) {
    println!("{}", content::to_markdown(study));

    let links: Vec<String> = study
        .hymns
        .iter()
        .filter_map(|hymn| {
            content::hymn_search_url(hymn)
                .map(|url| format!("- {}: {}", hymn.title, url))
                .ok()
        })
        .collect();
    if !links.is_empty() {
        println!("## Ouvir\n");
        println!("{}\n", links.join("\n"));
    }

    if !images.is_empty() {
        println!("## Ilustrações\n");
        for (idx, image) in images.iter().enumerate() {
            match written.get(idx) {
                Some(path) => println!("- {} ({})", image.prompt, path.display()),
                None => println!("- {}", image.prompt),
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FakeCapability;
    use crate::test_utils::{memory_store, sample_study_value};
    use std::sync::Arc;
    use tempfile::tempdir;

    // 1x1 transparent PNG
    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_write_images_sniffs_extension() {
        let dir = tempdir().unwrap();
        let images = vec![GeneratedImage {
            url: format!("data:image/png;base64,{}", PNG_1X1),
            prompt: "dove".to_string(),
        }];

        let written = write_images(dir.path(), &images).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].extension().unwrap(), "png");
        assert!(written[0].exists());
    }

    #[test]
    fn test_write_images_skips_remote_and_invalid() {
        let dir = tempdir().unwrap();
        let images = vec![
            GeneratedImage {
                url: "https://example.com/a.png".to_string(),
                prompt: "remote".to_string(),
            },
            GeneratedImage {
                url: "data:image/png;base64,!!!not-base64".to_string(),
                prompt: "broken".to_string(),
            },
        ];

        let written = write_images(dir.path(), &images).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_write_images_unknown_format_uses_bin() {
        let dir = tempdir().unwrap();
        let images = vec![GeneratedImage {
            url: "data:application/octet-stream;base64,AAECAw==".to_string(),
            prompt: "bytes".to_string(),
        }];

        let written = write_images(dir.path(), &images).unwrap();
        assert_eq!(written[0].extension().unwrap(), "bin");
    }

    #[tokio::test]
    async fn test_run_generate_rejects_blank_topic() {
        let options = GenerateOptions {
            topic: "   ".to_string(),
            save: false,
            output: OutputOptions {
                no_images: true,
                images_dir: None,
                format: OutputFormat::Markdown,
            },
        };
        let result = run_generate(Config::default(), options).await;
        crate::test_utils::assert_biblia_error_contains(result, "Topic must not be empty");
    }

    fn facade(config: &Config) -> OrchestrationFacade {
        let fake = Arc::new(FakeCapability::new().with_content(sample_study_value().to_string()));
        OrchestrationFacade::new(fake, memory_store(), config).unwrap()
    }

    #[tokio::test]
    async fn test_save_after_auto_record_reports_recorded() {
        let facade = facade(&Config::default());
        let study = facade.generate("A Graça").await.unwrap();

        assert_eq!(save_study(&facade, &study).unwrap(), "Study recorded in history.");
        assert_eq!(facade.history().len(), 1);
    }

    #[tokio::test]
    async fn test_save_without_auto_record() {
        let mut config = Config::default();
        config.history.record_on_generate = false;
        let facade = facade(&config);
        let study = facade.generate("A Graça").await.unwrap();

        assert_eq!(save_study(&facade, &study).unwrap(), "Study saved to history.");
        assert_eq!(save_study(&facade, &study).unwrap(), "Study already in history.");
    }
}

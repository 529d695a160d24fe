use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::PathBuf;

use crate::app_config::Config;
use crate::document::DocumentKind;
use crate::file_utils::FileManager;
use crate::pipeline::{DocumentPipeline, ProgressObserver};
use crate::translation_client::TranslationClient;

// @module: Application controller for document translation

/// Progress observer backed by an indicatif bar.
struct BarProgress {
    bar: ProgressBar,
    unit_name: &'static str,
}

impl ProgressObserver for BarProgress {
    fn unit_completed(&self, completed: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(completed as u64);
        self.bar
            .set_message(format!("{} {}/{}", self.unit_name, completed, total));
    }
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the main workflow: translate one document file into the output
    /// directory, deriving the output name from the target language.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        target_language: &str,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow::anyhow!(
                "Input file does not exist: {:?}",
                input_file
            ));
        }
        FileManager::ensure_dir(&output_dir)?;

        let output_path =
            FileManager::generate_output_path(&input_file, &output_dir, target_language);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(());
        }

        // File-type dispatch happens here, before the pipeline is involved.
        let kind = FileManager::detect_document_kind(&input_file)?;
        let bytes = FileManager::read_bytes(&input_file)?;

        info!(
            "Translating {:?} to {} ({})",
            input_file.file_name().unwrap_or_default(),
            target_language,
            self.config.translation.model
        );

        let client = TranslationClient::from_config(&self.config.translation);
        let pipeline = DocumentPipeline::new(client);

        let progress = self.make_progress_bar(kind);
        let translated = pipeline
            .convert_bytes(kind, &bytes, target_language, &progress)
            .await
            .with_context(|| format!("Failed to convert {:?}", input_file))?;
        progress.bar.finish_and_clear();

        FileManager::write_bytes(&output_path, &translated)?;
        info!(
            "Wrote {:?} in {:.1}s",
            output_path,
            start_time.elapsed().as_secs_f64()
        );
        Ok(())
    }

    fn make_progress_bar(&self, kind: DocumentKind) -> BarProgress {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        BarProgress {
            bar,
            unit_name: kind.unit_name(),
        }
    }
}

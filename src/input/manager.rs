//! Input manager for reading resumes and job descriptions from disk

use crate::config::ExtractionConfig;
use crate::error::{CandidateFitError, Result};
use crate::input::text_extractor::DocumentTextExtractor;
use crate::processing::analyzer::JobRequirement;
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    extractor: DocumentTextExtractor,
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new(limits: ExtractionConfig) -> Self {
        Self {
            extractor: DocumentTextExtractor::new(limits),
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a document and extract its text.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        // Check cache first
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        let bytes = self.read_file(path).await?;
        let text = self.extractor.extract(&bytes, &path_str)?;

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Load a job from disk.
    ///
    /// `.toml` files carry `title`, `location` and `requirements` keys; any
    /// other document is read as the requirements text alone.
    pub async fn load_job(&mut self, path: &Path) -> Result<JobRequirement> {
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

        if !is_toml {
            let requirement_text = self.extract_text(path).await?;
            return Ok(JobRequirement::new("", "", requirement_text));
        }

        let bytes = self.read_file(path).await?;
        let content = String::from_utf8(bytes).map_err(|e| {
            CandidateFitError::InvalidInput(format!("Job file '{}' is not valid UTF-8: {}", path.display(), e))
        })?;
        let job: JobRequirement = toml::from_str(&content).map_err(|e| {
            CandidateFitError::InvalidInput(format!("Invalid job file '{}': {}", path.display(), e))
        })?;

        info!("Loaded job '{}' from {}", job.title, path.display());
        Ok(job)
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(CandidateFitError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        Ok(fs::read(path).await?)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

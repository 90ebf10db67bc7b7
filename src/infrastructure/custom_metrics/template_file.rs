use crate::domain::errors::CustomMetricsError;
use crate::domain::fragment::clean_lines;
use crate::domain::ports::CustomMetricsProvider;
use crate::domain::template::Template;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::sync::Arc;

/// Environment handed to templates as `.Env`.
#[derive(Clone)]
pub enum EnvSource {
    /// Fresh snapshot of the process environment on every render.
    Process,
    Fixed(Arc<HashMap<String, String>>),
}

impl EnvSource {
    pub fn snapshot(&self) -> HashMap<String, String> {
        match self {
            // Entries that are not valid unicode are skipped.
            EnvSource::Process => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
            EnvSource::Fixed(map) => map.as_ref().clone(),
        }
    }
}

/// Re-reads and re-renders a template file on every cycle.
pub struct TemplateFileMetrics {
    path: String,
    env: EnvSource,
}

impl TemplateFileMetrics {
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_env(path, EnvSource::Process)
    }

    pub fn with_env(path: impl Into<String>, env: EnvSource) -> Self {
        Self {
            path: path.into(),
            env,
        }
    }
}

#[async_trait]
impl CustomMetricsProvider for TemplateFileMetrics {
    async fn fragment(&self) -> Result<Vec<u8>, CustomMetricsError> {
        if self.path.is_empty() {
            return Ok(Vec::new());
        }

        let source = match tokio::fs::read_to_string(&self.path).await {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(CustomMetricsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let rendered = Template::parse(&source)?.render(&self.env.snapshot())?;
        Ok(clean_lines(&rendered))
    }

    fn describe(&self) -> String {
        format!("template file {}", self.path)
    }
}

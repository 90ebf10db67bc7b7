use thiserror::Error;

/// Errors from the GET against the metrics source
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("scrape: build request: {reason}")]
    BuildRequest { reason: String },

    #[error("scrape: {reason}")]
    Transport { reason: String },

    #[error("read: {reason}")]
    ReadBody { reason: String },
}

/// Errors from the POST against the push target
#[derive(Debug, Error)]
pub enum PushError {
    #[error("push: build request: {reason}")]
    BuildRequest { reason: String },

    #[error("push: {reason}")]
    Transport { reason: String },
}

/// Errors while parsing or executing a custom metrics template
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template: metrics:{line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("template: metrics:{line}: executing: {reason}")]
    Exec { line: usize, reason: String },
}

/// Errors that leave the current cycle without a custom fragment
#[derive(Debug, Error)]
pub enum CustomMetricsError {
    #[error("read metrics file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_error_formatting() {
        let error = ScrapeError::Transport {
            reason: "connection refused".to_string(),
        };
        assert_eq!(error.to_string(), "scrape: connection refused");
    }

    #[test]
    fn test_template_error_formatting() {
        let error = TemplateError::Parse {
            line: 3,
            reason: "unclosed action".to_string(),
        };
        let msg = CustomMetricsError::from(error).to_string();
        assert!(msg.contains("metrics:3"));
        assert!(msg.contains("unclosed action"));
    }
}

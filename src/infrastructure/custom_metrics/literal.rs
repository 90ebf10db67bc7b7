use crate::domain::errors::CustomMetricsError;
use crate::domain::fragment::literal_line;
use crate::domain::ports::CustomMetricsProvider;
use async_trait::async_trait;

/// A single `<name> <value>` line fixed at startup.
pub struct LiteralMetric {
    name: String,
    value: f64,
    line: Vec<u8>,
}

impl LiteralMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        let name = name.into();
        let line = literal_line(&name, value);
        Self { name, value, line }
    }
}

#[async_trait]
impl CustomMetricsProvider for LiteralMetric {
    async fn fragment(&self) -> Result<Vec<u8>, CustomMetricsError> {
        Ok(self.line.clone())
    }

    fn describe(&self) -> String {
        if self.name.is_empty() {
            "no custom metric".to_string()
        } else {
            format!("literal metric {}={}", self.name, self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_literal_fragment_is_stable() {
        let provider = LiteralMetric::new("build_number", 412.0);
        assert_eq!(provider.fragment().await.unwrap(), b"build_number 412\n");
        assert_eq!(provider.fragment().await.unwrap(), b"build_number 412\n");
    }

    #[tokio::test]
    async fn test_empty_name_is_permanently_empty() {
        let provider = LiteralMetric::new("", 1.5);
        assert!(provider.fragment().await.unwrap().is_empty());
    }
}

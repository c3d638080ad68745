//! Process metrics registry.
//!
//! Every counter/histogram in `chain::archive` and `jobs::apply_weights`
//! registers itself against the global `prometheus::default_registry()` on
//! first use; this module only owns the `/metrics` text-encoding.

use prometheus::{Encoder, TextEncoder};

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),
    #[error("metrics output was not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render every registered metric in Prometheus text exposition format.
pub fn render() -> Result<String, MetricsError> {
    let metric_families = prometheus::gather();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_never_fails_on_an_empty_registry() {
        assert!(render().is_ok());
    }
}

//! # eproc-scraper
//!
//! Browser-driven extraction of judicial process records from the eproc
//! public consultation portal. Submits party-name queries, follows exact
//! matches into case detail pages, and aggregates labeled fields into a
//! JSON snapshot.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eproc_scraper::{output, Config, Scraper};
//!
//! # #[tokio::main]
//! # async fn main() -> eproc_scraper::Result<()> {
//! let config = Config::load("configs/example.yaml")?;
//! let mut scraper = Scraper::launch(&config).await?;
//! let summary = scraper.run().await?;
//! println!("Extracted {} records", summary.records);
//! let path = output::write_snapshot(&config.output, &scraper.snapshot())?;
//! println!("Saved to {}", path.display());
//! scraper.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod output;
pub mod pipeline;
pub mod portal;
pub mod store;

pub use config::{BrowserConfig, Config, OutputConfig, PortalConfig, Timeouts, Viewport};
pub use pipeline::{RunSummary, Scraper};
pub use store::{CaseRecord, Metadata, ResultStore, Snapshot};

/// Result type for eproc-scraper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or a scrape run.
///
/// The navigation/structure/element trio mirrors the containment levels of
/// the pipeline: element failures are contained to one row or field block,
/// structure failures to one case or one query's results page, navigation
/// failures to one query. Only browser launch failure aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("unexpected page structure: {0}")]
    Structure(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("persistence failed: {0}")]
    Persistence(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names:
  - "ADILSON DA SILVA"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.portal.url, "https://eproc.example.gov.br/consulta");
        assert_eq!(config.names, vec!["ADILSON DA SILVA"]);
        assert!(!config.browser.headless);
        assert!(config.browser.viewport.is_none());
    }

    #[test]
    fn test_parse_browser_config() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names:
  - "ADILSON DA SILVA"
browser:
  headless: true
  proxy: "http://localhost:8080"
  user_agent: "Custom UA"
"#;
        let config = Config::parse(yaml).unwrap();
        assert!(config.browser.headless);
        assert_eq!(config.browser.proxy, Some("http://localhost:8080".into()));
        assert_eq!(config.browser.user_agent, Some("Custom UA".into()));
    }

    #[test]
    fn test_parse_viewport_config() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names:
  - "ADILSON DA SILVA"
browser:
  headless: true
  viewport:
    width: 1366
    height: 768
"#;
        let config = Config::parse(yaml).unwrap();
        let viewport = config.browser.viewport.unwrap();
        assert_eq!(viewport.width, 1366);
        assert_eq!(viewport.height, 768);
    }

    #[test]
    fn test_parse_timeouts() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names:
  - "ADILSON DA SILVA"
timeouts:
  element_ms: 5000
  query_pause_ms: 500
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.timeouts.element_ms, 5000);
        assert_eq!(config.timeouts.query_pause_ms, 500);
    }

    #[test]
    fn test_parse_output_config() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names:
  - "ADILSON DA SILVA"
output:
  dir: "saida"
  file: "processos.json"
  failure_screenshots: true
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.output.dir, "saida");
        assert_eq!(config.output.file, Some("processos.json".into()));
        assert!(config.output.failure_screenshots);
    }

    #[test]
    fn test_default_values() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names:
  - "ADILSON DA SILVA"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.timeouts.element_ms, 15_000); // default
        assert_eq!(config.timeouts.query_pause_ms, 2_000); // default
        assert_eq!(config.output.dir, "resultados"); // default
        assert_eq!(config.output.file, None);
        assert!(!config.output.failure_screenshots);
    }

    #[test]
    fn test_names_order_preserved() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names:
  - "CAROLINA DIAS"
  - "ADILSON DA SILVA"
  - "BRUNO ROCHA"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(
            config.names,
            vec!["CAROLINA DIAS", "ADILSON DA SILVA", "BRUNO ROCHA"]
        );
    }

    #[test]
    fn test_validation_empty_url() {
        let yaml = r#"
portal:
  url: ""
names:
  - "ADILSON DA SILVA"
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("portal.url"));
    }

    #[test]
    fn test_validation_no_names() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names: []
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("names"));
    }

    #[test]
    fn test_validation_blank_name() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names:
  - "ADILSON DA SILVA"
  - "   "
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("blank"));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let yaml = r#"
portal:
  url: "https://eproc.example.gov.br/consulta"
names:
  - "ADILSON DA SILVA"
timeouts:
  element_ms: 0
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("element_ms"));
    }

    #[test]
    fn test_load_example_config() {
        let config = Config::load("configs/example.yaml").unwrap();
        assert!(config.portal.url.starts_with("https://"));
        assert!(!config.names.is_empty());
        assert!(config.browser.headless);
    }
}

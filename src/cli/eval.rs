//! `short eval`: evaluate module files and print the resolved resources.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::{EngineConfig, OutputFormat};
use crate::module::EvalContext;
use crate::value::{Map, Value};

/// Evaluate module files.
///
/// Every document section of every file is evaluated with the same
/// parameters and printed in order.
#[derive(Args, Debug)]
pub struct EvalCommand {
    /// Module files to evaluate
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Parameter for the root modules; VALUE is parsed as YAML
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, Value)>,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,
}

impl EvalCommand {
    /// Evaluate the files and format the results.
    pub fn render(&self, config: &EngineConfig) -> Result<String> {
        let ctx = config.apply(EvalContext::for_files(to_json));
        let params: Map = self.params.iter().cloned().collect();

        let mut resources = Vec::new();
        for file in &self.files {
            let path = file.to_string_lossy();
            let modules = ctx
                .evaluate(&path, &params)
                .with_context(|| format!("Failed to evaluate {}", file.display()))?;

            for module in modules {
                let module_path = module.path.clone();
                let resource = module
                    .into_typed()
                    .with_context(|| format!("Failed to convert a resource of {module_path}"))?;
                resources.push(resource);
            }
        }

        if let Some(stats) = ctx.cache_stats() {
            tracing::debug!(
                "Document cache: {} hits, {} misses ({:.1}% hit rate)",
                stats.hits,
                stats.misses,
                stats.hit_rate()
            );
        }

        format_resources(&resources, self.output.unwrap_or(config.output))
    }
}

/// The CLI's raw-to-typed conversion.
fn to_json(raw: &Map) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(raw)?)
}

fn format_resources(resources: &[serde_json::Value], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            let documents = resources
                .iter()
                .map(serde_yaml::to_string)
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to serialize resources as YAML")?;
            Ok(documents.join("---\n"))
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(resources)
                .context("Failed to serialize resources as JSON")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Parse `KEY=VALUE`, reading VALUE as YAML (`3` is a number, `[a, b]` a list).
fn parse_param(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{s}'"));
    }

    let value = if raw.is_empty() {
        Value::String(String::new())
    } else {
        serde_yaml::from_str(raw).map_err(|e| format!("invalid value for '{key}': {e}"))?
    };
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("replicas=3").unwrap(), ("replicas".to_string(), Value::from(3)));
        assert_eq!(parse_param("name=web").unwrap().1, Value::from("web"));
        assert_eq!(parse_param("tag=").unwrap().1, Value::from(""));
        assert_eq!(parse_param("url=a=b").unwrap().1, Value::from("a=b"));
        assert_eq!(
            parse_param("ports=[80, 443]").unwrap().1,
            Value::List(vec![Value::from(80), Value::from(443)])
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=3").is_err());
    }

    #[test]
    fn test_format_yaml_documents() {
        let resources = vec![serde_json::json!({"pod": {"name": "a"}}), serde_json::json!({"svc": 1})];
        let out = format_resources(&resources, OutputFormat::Yaml).unwrap();
        assert_eq!(out, "pod:\n  name: a\n---\nsvc: 1\n");
    }

    #[test]
    fn test_format_json_array() {
        let resources = vec![serde_json::json!({"svc": 1})];
        let out = format_resources(&resources, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!([{"svc": 1}]));
    }
}

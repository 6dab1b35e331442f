#![deny(missing_docs)]

//! # Generate Command
//!
//! Reads a definition file and writes the OpenAPI document as JSON or YAML.

use crate::config::DefinitionFile;
use crate::error::CliResult;
use oasgen_core::OpenApiDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Output encoding.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the definition file (.yaml, .yml or .json).
    #[clap(long, short, env = "OASGEN_INPUT")]
    pub input: PathBuf,

    /// Output path for the document.
    /// If not provided, prints to stdout.
    #[clap(long, short, env = "OASGEN_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format. Defaults to the output extension (.yaml/.yml), else JSON.
    #[clap(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl GenerateArgs {
    fn resolved_format(&self) -> OutputFormat {
        if let Some(format) = self.format {
            return format;
        }
        match self.output.as_deref().and_then(extension) {
            Some("yaml") | Some("yml") => OutputFormat::Yaml,
            _ => OutputFormat::Json,
        }
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Renders the document described by `args.input`.
pub fn render(args: &GenerateArgs) -> CliResult<String> {
    let content = fs::read_to_string(&args.input)?;
    let definition = DefinitionFile::parse(&args.input, &content)?;
    let document = definition.into_document()?;
    encode(&document, args.resolved_format())
}

fn encode(document: &OpenApiDocument, format: OutputFormat) -> CliResult<String> {
    let rendered = match format {
        OutputFormat::Json => document.to_json_pretty()?,
        OutputFormat::Yaml => document.to_yaml()?,
    };
    Ok(rendered)
}

/// Executes the generate command.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let output = render(args)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, output)?;
            info!(input = ?args.input, output = ?path, "wrote OpenAPI document");
        }
        None => println!("{}", output),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    const DEFINITION: &str = r#"
info:
  title: Todo
  version: 1.0.0
securitySchemes:
  auth:
    kind: bearer
apis:
  - scheme: auth
    endpoints:
      - method: get
        path: /todos
        alias: getTodos
        description: List todos
        response:
          type: array
          items: { type: string }
"#;

    fn args(input: PathBuf, output: Option<PathBuf>, format: Option<OutputFormat>) -> GenerateArgs {
        GenerateArgs {
            input,
            output,
            format,
        }
    }

    #[test]
    fn test_generate_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("api.yaml");
        let output = dir.path().join("out/openapi.json");
        fs::write(&input, DEFINITION).unwrap();

        execute(&args(input, Some(output.clone()), None)).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["openapi"], json!("3.0.0"));
        assert_eq!(
            written["paths"]["/todos"]["get"]["security"],
            json!([{ "auth": [] }])
        );
        assert_eq!(
            written["paths"]["/todos"]["get"]["summary"],
            json!("List todos")
        );
    }

    #[test]
    fn test_format_follows_output_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("api.yaml");
        let output = dir.path().join("openapi.yml");
        fs::write(&input, DEFINITION).unwrap();

        execute(&args(input, Some(output.clone()), None)).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(serde_json::from_str::<Value>(&written).is_err());
        let parsed: Value = serde_yaml::from_str(&written).unwrap();
        assert_eq!(parsed["info"]["title"], json!("Todo"));
    }

    #[test]
    fn test_explicit_format_wins() {
        let a = args(
            PathBuf::from("api.yaml"),
            Some(PathBuf::from("openapi.yaml")),
            Some(OutputFormat::Json),
        );
        assert_eq!(a.resolved_format(), OutputFormat::Json);
        let b = args(PathBuf::from("api.yaml"), None, None);
        assert_eq!(b.resolved_format(), OutputFormat::Json);
    }

    #[test]
    fn test_render_to_string() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("api.yaml");
        fs::write(&input, DEFINITION).unwrap();

        let rendered = render(&args(input, None, Some(OutputFormat::Json))).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            parsed["components"]["securitySchemes"]["auth"]["scheme"],
            json!("bearer")
        );
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(&args(dir.path().join("nope.yaml"), None, None)).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}

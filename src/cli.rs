//! Minimal CLI: check documents against a descriptor, or argument sets against a signature
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use arg_types::config::{self, Config};
use arg_types::descriptor::dsl::{ClassRegistry, parse_descriptor, parse_signature};
use arg_types::matcher::matches;
use arg_types::value::{ClassRef, Value};

// ------------------------------- Types ------------------------------------ //

/// validate JSON documents against type descriptors and argument signatures
#[derive(Parser, Debug)]
#[command(name = "arg-types", version, about)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// match every document against a descriptor
    Check(CheckOut),
    /// treat every document as an argument set and validate it against a signature
    Args(ArgsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// class names that `instanceOf` may refer to, as `Name` or `Name:Parent`
    #[arg(long = "class")]
    classes: Vec<String>,

    /// validation config file (enforcement, whitelist)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// descriptor file in the declarative JSON form
    #[arg(long, short)]
    descriptor: PathBuf,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ArgsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// signature file: {"owner", "arguments", "required"}
    #[arg(long, short)]
    signature: PathBuf,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// One validated unit: a file, an NDJSON line or a jq output.
struct Document {
    source: String,
    value: serde_json::Value,
}

// --------------------------- Implementation ------------------------------- //

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;

            let mut raw = Vec::new();
            if self.ndjson {
                for (i, line) in source.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
                    let value = serde_json::from_str::<serde_json::Value>(line)
                        .with_context(|| format!("failed to parse JSON ({source_path_str}:{})", i + 1))?;
                    raw.push((format!("{source_path_str}:{}", i + 1), value));
                }
            } else {
                let value = serde_json::from_str::<serde_json::Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                raw.push((source_path_str.clone(), value));
            }

            for (label, value) in raw {
                out.extend(self.select(label, value)?);
            }
        }
        tracing::debug!(documents = out.len(), "loaded input documents");
        Ok(out)
    }

    fn select(&self, label: String, value: serde_json::Value) -> Result<Vec<Document>> {
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(pointer) => value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("json pointer {pointer} selects nothing in {label}"))?,
        };
        match self.jq_expr.as_deref() {
            None => Ok(vec![Document { source: label, value }]),
            Some(jq_expr) => {
                let outputs = crate::jq_exec::run_jaq(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression to {label}"))?;
                Ok(outputs
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| Document { source: format!("{label}#{i}"), value })
                    .collect())
            }
        }
    }

    fn class_registry(&self) -> Result<ClassRegistry> {
        let mut registry = ClassRegistry::new();
        for spec in &self.classes {
            let class = match spec.split_once(':') {
                None => ClassRef::new(spec.as_str()),
                Some((name, parent)) => {
                    let parent = registry
                        .get(parent)
                        .ok_or_else(|| anyhow!("class {name} extends unknown class {parent}"))?;
                    parent.extend(name)
                }
            };
            registry.register(class);
        }
        Ok(registry)
    }

    fn install_config(&self) -> Result<&'static Config> {
        if let Some(path) = self.config.as_ref() {
            config::install(Config::load(path)?)?;
        }
        Ok(config::global())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Returns `false` when any document failed validation.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Check(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(true);
                }
                let settings = &target.input_settings;
                settings.install_config()?;
                let classes = settings.class_registry()?;
                let descriptor = parse_descriptor(&read_json(&target.descriptor)?, &classes)
                    .with_context(|| format!("invalid descriptor ({})", target.descriptor.display()))?;
                tracing::info!(%descriptor, "checking documents");

                let documents = settings.load_documents()?;
                let results: Vec<Vec<String>> = documents
                    .par_iter()
                    .map(|doc| match matches(&Value::from(doc.value.clone()), &descriptor) {
                        Ok(()) => Vec::new(),
                        Err(mismatch) => vec![mismatch.to_string()],
                    })
                    .collect();
                Ok(report(&documents, &results))
            }
            Command::Args(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(true);
                }
                let settings = &target.input_settings;
                let config = settings.install_config()?;
                let classes = settings.class_registry()?;
                let signature = parse_signature(&read_json(&target.signature)?, &classes)
                    .with_context(|| format!("invalid signature ({})", target.signature.display()))?;
                tracing::info!(owner = signature.owner(), "checking argument sets");

                let documents = settings.load_documents()?;
                let results: Vec<Vec<String>> = documents
                    .par_iter()
                    .map(|doc| match Value::from(doc.value.clone()) {
                        Value::Object(supplied) => signature
                            .check_arguments(&supplied, config)
                            .iter()
                            .map(ToString::to_string)
                            .collect(),
                        other => vec![format!(
                            "an argument set must be an object, found {}",
                            arg_types::diagnostic::describe_value(&other)
                        )],
                    })
                    .collect();
                Ok(report(&documents, &results))
            }
        }
    }
}

// -------------------------- Internal helpers ------------------------------ //

fn report(documents: &[Document], results: &[Vec<String>]) -> bool {
    let mut failed = 0usize;
    for (doc, problems) in documents.iter().zip(results) {
        if problems.is_empty() {
            println!("{} {}", "ok".green().bold(), doc.source);
        } else {
            failed += 1;
            println!("{} {}", "FAIL".red().bold(), doc.source);
            for problem in problems {
                println!("    {problem}");
            }
        }
    }
    eprintln!("{} checked, {} failed", documents.len(), failed);
    failed == 0
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let src = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    arg_types::path_de::from_str_with_path(&src).with_context(|| format!("failed to parse {}", path.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

//! Minimal CLI: schema + JSON values → HTML tables
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use tracing::info;

use crate::render::{HtmlTable, Layout, RenderOptions};
use crate::schema::{Schema, Shape};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// render schema-described JSON values as nested HTML tables
#[derive(Parser, Debug)]
#[command(name = "schema-tables")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// render each input document as an HTML table fragment
    Render(RenderOut),
    /// print the column list of the schema's record type
    Columns(ColumnsOut),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// schema document (.json)
    #[arg(long, short)]
    schema: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct RenderSettings {
    /// table layout
    #[arg(long, value_enum, default_value_t = Layout::Column)]
    layout: Layout,

    /// top-level field name (header text for bare scalar arrays)
    #[arg(long, default_value = "response")]
    name: String,

    /// render options file (.json); flags below override it
    #[arg(long)]
    options: Option<PathBuf>,

    /// omit header cells
    #[arg(long, default_value_t = false)]
    no_header: bool,

    /// omit the field-name attribute on cells
    #[arg(long, default_value_t = false)]
    no_field_name_attr: bool,

    /// omit the type-name attribute on cells
    #[arg(long, default_value_t = false)]
    no_field_type_name_attr: bool,
}

#[derive(clap::Parser, Debug)]
struct RenderOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    #[command(flatten)]
    render_settings: RenderSettings,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// output directory, one `<stem>.html` per input (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ColumnsOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl RenderSettings {
    fn load_options(&self) -> Result<RenderOptions> {
        let mut options = match &self.options {
            Some(path) => crate::path_de::read_json_file::<RenderOptions>(path)
                .with_context(|| format!("failed to load render options from {}", path.display()))?,
            None => RenderOptions::default(),
        };
        if self.no_header {
            options = options.without_header();
        }
        if self.no_field_name_attr {
            options = options.without_field_name_attr();
        }
        if self.no_field_type_name_attr {
            options = options.without_field_type_name_attr();
        }
        Ok(options)
    }
}

impl SchemaSettings {
    fn load(&self) -> Result<Schema> {
        crate::lower::load_schema(&self.schema)
            .with_context(|| format!("failed to load schema from {}", self.schema.display()))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Render(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                // 1) schema + options
                let schema = target.schema_settings.load()?;
                let options = target.render_settings.load_options()?;
                let table = HtmlTable::new(target.render_settings.layout, options);
                let name = target.render_settings.name.as_str();

                // 2) render every input independently
                let source_paths = resolve_file_path_patterns(&target.input)?;
                info!(inputs = source_paths.len(), layout = %table.layout(), "rendering");
                let rendered: Vec<(PathBuf, Result<String>)> = source_paths
                    .par_iter()
                    .map(|path| (path.clone(), render_file(&table, &schema, path, name)))
                    .collect();

                // 3) emit
                if let Some(out) = target.out.as_ref() {
                    std::fs::create_dir_all(out)
                        .with_context(|| format!("failed to create {}", out.display()))?;
                }
                let mut failed = 0usize;
                for (path, result) in &rendered {
                    match result {
                        Ok(html) => {
                            emit(target.out.as_deref(), path, html)?;
                            eprintln!("{} {}", "✅".green(), path.display());
                        }
                        Err(error) => {
                            failed += 1;
                            eprintln!("{} {}: {error:#}", "❌ failed".red(), path.display());
                        }
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} inputs failed to render", rendered.len());
                }
                Ok(())
            }
            Command::Columns(target) => {
                let schema = target.schema_settings.load()?;
                let record = match &schema.shape {
                    Shape::Complex(ty) => ty,
                    Shape::Array(arr) => match &arr.item.shape {
                        Shape::Complex(ty) => ty,
                        _ => bail!("schema items are {}, not records", arr.item.describe()),
                    },
                    Shape::Primitive(kind) => bail!("schema is a bare {kind}, not a record"),
                };
                for column in record.column_names().iter() {
                    println!("{column}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn render_file(table: &HtmlTable, schema: &Schema, path: &Path, name: &str) -> Result<String> {
    let json: serde_json::Value = crate::path_de::read_json_file(path)
        .with_context(|| format!("failed to parse JSON source file ({})", path.display()))?;
    let value = crate::decode::decode(&json, schema)?;
    Ok(table.render_to_string(schema, &value, name)?)
}

fn emit(out_dir: Option<&Path>, source: &Path, html: &str) -> Result<()> {
    match out_dir {
        Some(dir) => {
            let stem = source.file_stem().map(|s| s.to_string_lossy()).unwrap_or_else(|| "out".into());
            let target = dir.join(format!("{stem}.html"));
            std::fs::write(&target, html).with_context(|| format!("failed to write {}", target.display()))
        }
        None => {
            println!("{html}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

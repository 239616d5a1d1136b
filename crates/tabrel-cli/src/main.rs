//! tabrel CLI: run, check, and explain YAML pipelines; sort and convert CSV.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tabrel_core::config::{single_char, IoConfig};
use tabrel_core::relation::Relation;
use tabrel_io::{CsvWriter, JsonlWriter};
use tabrel_operators::{sorted, SortSpec};
use tabrel_planner::{describe, parse_yaml_pipeline, Pipeline, PipelineConfig, Planner};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "tabrel")]
#[command(about = "Lazy relational algebra over typed delimited tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Jsonl,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a pipeline from a YAML file
    Run {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Write results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column delimiter (overrides config)
        #[arg(long)]
        delimiter: Option<String>,

        /// Read typed `name:type` headers (overrides config)
        #[arg(long)]
        typed: bool,

        /// Write a plain header even when the input was typed
        #[arg(long)]
        untyped_output: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Omit the CSV header line
        #[arg(long)]
        no_header: bool,
    },

    /// Validate a pipeline YAML file (parse and construct every operator)
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Show the steps and output schema of a pipeline
    Explain {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Load a CSV file, optionally sort it, and write it back out
    Cat {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Read typed `name:type` headers
        #[arg(long)]
        typed: bool,

        /// Comma-separated sort key columns
        #[arg(long, value_delimiter = ',')]
        sort_by: Vec<String>,

        /// Sort in descending order
        #[arg(long)]
        reverse: bool,

        /// Column delimiter
        #[arg(long)]
        delimiter: Option<String>,

        /// Omit the CSV header line
        #[arg(long)]
        no_header: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pipeline,
            output,
            delimiter,
            typed,
            untyped_output,
            format,
            no_header,
        } => {
            let opts = RunOptions {
                output,
                delimiter,
                typed,
                untyped_output,
                format,
                header: !no_header,
            };
            if let Err(e) = run_pipeline(&pipeline, &opts) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { pipeline } => {
            if let Err(e) = validate_pipeline(&pipeline) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Pipeline is valid");
        }
        Commands::Explain { pipeline } => {
            if let Err(e) = explain_pipeline(&pipeline) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Cat {
            input,
            typed,
            sort_by,
            reverse,
            delimiter,
            no_header,
        } => {
            let sort = SortSpec {
                by: (!sort_by.is_empty()).then_some(sort_by),
                reverse,
            };
            if let Err(e) = cat_file(&input, typed, sort, delimiter.as_deref(), !no_header) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

struct RunOptions {
    output: Option<PathBuf>,
    delimiter: Option<String>,
    typed: bool,
    untyped_output: bool,
    format: Format,
    header: bool,
}

/// Command-line flags as pipeline-config overrides; unset flags stay `None`.
fn flag_overrides(delimiter: Option<&str>, typed: bool) -> CliResult<PipelineConfig> {
    Ok(PipelineConfig {
        delimiter: delimiter.map(single_char).transpose()?,
        type_delimiter: None,
        typed: typed.then_some(true),
    })
}

fn load_pipeline(path: &Path) -> CliResult<(Pipeline, Planner)> {
    let yaml_content = fs::read_to_string(path)?;
    let pipeline = parse_yaml_pipeline(&yaml_content)?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let planner = Planner::new(IoConfig::from_env()).with_base_dir(base_dir);
    Ok((pipeline, planner))
}

fn run_pipeline(pipeline_path: &Path, opts: &RunOptions) -> CliResult<()> {
    let (pipeline, planner) = load_pipeline(pipeline_path)?;
    let planner = planner.with_overrides(flag_overrides(opts.delimiter.as_deref(), opts.typed)?);

    let mut out_cfg = planner.io_config(&pipeline);
    if opts.untyped_output {
        out_cfg.typed = false;
    }

    let relation = planner.build(&pipeline)?;
    let rows = emit(relation, opts.output.as_deref(), opts.format, &out_cfg, opts.header)?;

    if let Some(path) = &opts.output {
        println!("✓ Wrote {} rows to {}", rows, path.display());
    }
    Ok(())
}

fn validate_pipeline(pipeline_path: &Path) -> CliResult<()> {
    let (pipeline, planner) = load_pipeline(pipeline_path)?;
    let _ = planner.build(&pipeline)?;
    Ok(())
}

fn explain_pipeline(pipeline_path: &Path) -> CliResult<()> {
    let (pipeline, planner) = load_pipeline(pipeline_path)?;
    let io = planner.io_config(&pipeline);
    let relation = planner.build(&pipeline)?;

    println!("Pipeline");
    println!("========");
    println!(
        "Input: delimiter {:?}, type delimiter {:?}, typed {}",
        io.delimiter, io.type_delimiter, io.typed
    );
    println!();
    println!("Steps:");
    for line in describe(&pipeline) {
        println!("  {}", line);
    }
    println!();
    println!("Output schema:");
    for field in relation.schema().fields() {
        println!("  {}: {}", field.name, field.data_type);
    }
    Ok(())
}

fn cat_file(
    input: &Path,
    typed: bool,
    sort: SortSpec,
    delimiter: Option<&str>,
    header: bool,
) -> CliResult<()> {
    let cfg = flag_overrides(delimiter, typed)?.apply(&IoConfig::from_env());
    let source = tabrel_io::stream(input, &cfg)?;

    if sort.by.is_none() && !sort.reverse {
        emit(source, None, Format::Csv, &cfg, header)?;
        return Ok(());
    }
    let table = sorted(source, &sort)?;
    emit(table, None, Format::Csv, &cfg, header)?;
    Ok(())
}

/// Drain `relation` to `output` (stdout when `None`). `header` only affects CSV.
fn emit<R: Relation>(
    relation: R,
    output: Option<&Path>,
    format: Format,
    cfg: &IoConfig,
    header: bool,
) -> CliResult<usize> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let rows = match format {
        Format::Csv => {
            let mut w = CsvWriter::to_writer(sink, cfg)?;
            let n = if header {
                w.write_relation(relation)?
            } else {
                w.write_rows(relation)?
            };
            w.flush()?;
            n
        }
        Format::Jsonl => JsonlWriter::to_writer(sink).write_relation(relation)?,
    };
    Ok(rows)
}

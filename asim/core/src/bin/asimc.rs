use anyhow::{Context, Result};
use asim_core::{MachineConfig, ProgramEmitter, ProgramImage, ProgramSource};
use clap::{ArgAction, Parser};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "asimc")]
#[command(about = "Expand ASIM program source into labeled target code", long_about = None)]
struct Args {
    /// Program source (or JSON / image, see --json and --from-image)
    input: PathBuf,

    /// Write the emitted program here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input is a JSON document: {"config": {...}, "items": [...]}
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "from_image")]
    json: bool,

    /// Input is a program image saved with --image
    #[arg(long, action = ArgAction::SetTrue)]
    from_image: bool,

    /// Data memory size in cells (overrides source directives)
    #[arg(long)]
    data_mem: Option<usize>,

    /// Stack capacity in elements (overrides source directives)
    #[arg(long)]
    stack_size: Option<usize>,

    /// Number of general-purpose registers (overrides source directives)
    #[arg(long)]
    n_gpr: Option<usize>,

    /// Instruction memory size in cells (overrides source directives)
    #[arg(long)]
    inst_mem: Option<usize>,

    /// Fail when the program has no items
    #[arg(long, action = ArgAction::SetTrue)]
    require_items: bool,

    /// Also save the parsed program as an image archive
    #[arg(long)]
    image: Option<PathBuf>,

    /// Log progress to stderr (also enabled by ASIM_DEBUG)
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Deserialize)]
struct JsonInput {
    #[serde(default)]
    config: MachineConfig,
    #[serde(default)]
    labels: BTreeMap<String, usize>,
    #[serde(default)]
    include_files: Vec<String>,
    items: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let verbose = args.verbose || env::var("ASIM_DEBUG").is_ok();
    let log = |msg: String| {
        if verbose {
            eprintln!("[asimc] {msg}");
        }
    };

    log(format!("input: {}", args.input.display()));
    let mut image = if args.from_image {
        ProgramImage::load(&args.input)
            .with_context(|| format!("failed to load image {}", args.input.display()))?
    } else {
        let text = fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?;
        if args.json {
            let input: JsonInput = serde_json::from_str(&text)
                .with_context(|| format!("invalid JSON in {}", args.input.display()))?;
            ProgramImage::new(input.config, input.labels, input.items)
                .with_include_files(input.include_files)
        } else {
            ProgramSource::parse(&text)
                .with_context(|| format!("failed to parse {}", args.input.display()))?
                .into()
        }
    };

    let config = &mut image.metadata.config;
    if let Some(value) = args.data_mem {
        config.data_mem = value;
    }
    if let Some(value) = args.stack_size {
        config.stack_size = value;
    }
    if let Some(value) = args.n_gpr {
        config.n_gpr = value;
    }
    if let Some(value) = args.inst_mem {
        config.inst_mem = value;
    }

    let emitter = ProgramEmitter::new(image.config())
        .context("invalid machine configuration")?
        .require_items(args.require_items);
    let config = emitter.config();
    log(format!(
        "config: data_mem={} stack_size={} n_gpr={} inst_mem={}",
        config.data_mem, config.stack_size, config.n_gpr, config.inst_mem
    ));
    log(format!(
        "items: {} labels: {} includes: {}",
        image.items.len(),
        image.metadata.labels.len(),
        image.metadata.include_files.len()
    ));
    let text = emitter.emit(&image.items)?;

    // A failed image save must not leave a fresh output file behind.
    if let Some(path) = args.image.as_ref() {
        image
            .save(path)
            .with_context(|| format!("failed to save image {}", path.display()))?;
        log(format!("saved image {}", path.display()));
    }

    match args.output.as_ref() {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log(format!("wrote {}", path.display()));
        }
        None => io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}

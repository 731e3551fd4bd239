use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{bail, Context, Result};
use cirview::{import_from_str, render, report, Config, Error, VirtualWireStyle};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented outline of the display tree
    Tree,
    /// Display tree as JSON (`name` + `children`)
    Json,
    /// IR printed as code
    Cir,
    /// Structural path and name of every node
    Paths,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Inspect circuit IR as a display tree")]
struct Args {
    /// IR JSON file, `-` reads stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Label virtual wires with their index and value
    #[arg(long)]
    verbose_virtual_wires: bool,

    /// Print the tree digest after the output
    #[arg(long)]
    digest: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String> {
    let src = read_input(&args.input)?;
    let conf = Config {
        virtual_wire: if args.verbose_virtual_wires {
            VirtualWireStyle::Verbose
        } else {
            VirtualWireStyle::Macro
        },
    };

    let ir = match import_from_str(&src, conf) {
        Ok(ir) => ir,
        Err(Error::MalformedInput(e)) => {
            eprint!("{}", report::malformed_input(&src, &e));
            bail!("{} is not valid JSON", args.input.display());
        }
        Err(e) => return Err(e.into()),
    };

    let tree = ir.tree();
    let stats = tree.stats();
    tracing::debug!(
        nodes = stats.nodes,
        leaves = stats.leaves,
        depth = stats.depth,
        "built display tree"
    );

    let mut out = match args.format {
        Format::Tree => render::render_text(&tree),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&tree)?;
            json.push('\n');
            json
        }
        Format::Cir => {
            let mut cir = ir.code_ir();
            cir.push('\n');
            cir
        }
        Format::Paths => render::render_paths(&tree),
    };

    if args.digest {
        out.push_str(&tree.digest());
        out.push('\n');
    }

    Ok(out)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        tracing::debug!("reading IR from stdin");
        let mut src = String::new();
        io::stdin()
            .read_to_string(&mut src)
            .context("Failed to read stdin")?;
        return Ok(src);
    }

    tracing::debug!(path = %path.display(), "reading IR");
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

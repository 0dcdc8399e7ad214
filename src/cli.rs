// src/cli.rs

use crate::common::TRANS_SIGN;
use crate::config::GeneratorConfig;
use crate::pipeline::{self, PipelineGraph};
use crate::{fixed, float, vector_io};
use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed-point format of the `idft_*` reference programs.
pub type RefFixed = fixed::FixedComplex<32, 8>;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "idft_gen")]
#[command(about = "Generate a pipelined radix-2 DFT module as SystemVerilog on stdout")]
pub struct GenArgs {
    /// Transform size, a power of two (default 32)
    #[arg(long = "N", value_name = "N")]
    pub n: Option<usize>,
    /// Top-level module name (default idft_comp_N<N>)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct RefArgs {
    /// Input vector file, one `real[, imag]` sample per line
    #[arg(long)]
    pub src: PathBuf,
    /// Output file
    #[arg(long)]
    pub dst: PathBuf,
}

impl GenArgs {
    /// Parses the process arguments, ignoring any flag it does not know.
    pub fn from_env() -> Self {
        Self::parse_from(filter_known_flags(std::env::args_os(), &["--N", "--name"]))
    }
}

impl RefArgs {
    pub fn from_env() -> Self {
        Self::parse_from(filter_known_flags(std::env::args_os(), &["--src", "--dst"]))
    }
}

/// Keeps the program name, the known `--flag=value` / `--flag value` forms
/// and the help flags; everything else is dropped.
pub fn filter_known_flags<I, T>(args: I, known: &[&str]) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut args = args.into_iter().map(Into::into);
    if let Some(program) = args.next() {
        out.push(program);
    }

    let mut take_value = false;
    for arg in args {
        let text = arg.to_string_lossy().into_owned();
        if take_value && !text.starts_with("--") {
            out.push(arg);
            take_value = false;
            continue;
        }
        take_value = false;

        let flag = text.split('=').next().unwrap_or_default();
        if known.contains(&flag) {
            take_value = !text.contains('=');
            out.push(arg);
        } else if flag == "--help" || flag == "-h" {
            out.push(arg);
        } else {
            log::debug!("ignoring argument {:?}", text);
        }
    }
    out
}

/// Logs to stderr at `warn` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok();
}

/// Resolves the configuration (defaults, then `DFTGEN_*` from `.env` and the
/// process environment, then flags).
pub fn generator_config(args: &GenArgs) -> Result<GeneratorConfig> {
    let mut vars = collect_env_file(dotenvy::dotenv_iter())?;
    // Process variables come last so they override the file
    vars.extend(std::env::vars());
    generator_config_from(args, vars)
}

/// Key/value pairs of a dotenv file in file order. A missing file yields
/// nothing.
pub fn env_file_vars<P: AsRef<Path>>(path: P) -> Result<Vec<(String, String)>> {
    collect_env_file(dotenvy::from_path_iter(path.as_ref()))
}

fn collect_env_file(file: dotenvy::Result<dotenvy::Iter<File>>) -> Result<Vec<(String, String)>> {
    match file {
        Ok(iter) => {
            let vars = iter
                .collect::<dotenvy::Result<Vec<_>>>()
                .context("Unable to parse the .env file")?;
            log::debug!("{} settings from .env", vars.len());
            Ok(vars)
        }
        Err(e) if e.not_found() => Ok(Vec::new()),
        Err(e) => Err(e).context("Unable to read the .env file"),
    }
}

pub fn generator_config_from<I, K, V>(args: &GenArgs, vars: I) -> Result<GeneratorConfig>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut config = GeneratorConfig::default()
        .apply_vars(vars)
        .context("Invalid generator settings in the environment")?;

    if let Some(n) = args.n {
        config.n = n;
        config.name = GeneratorConfig::default_name(n);
    }
    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    config.validate().context("Invalid generator arguments")?;
    Ok(config)
}

/// Builds the pipeline described by `config` and writes its text to `out`.
pub fn run_generator<O: Write>(config: &GeneratorConfig, out: &mut O) -> Result<PipelineGraph> {
    let graph = PipelineGraph::build(config)?;
    pipeline::emit(&graph, out).context("Unable to write the generated module")?;
    out.flush().context("Unable to write the generated module")?;

    log::info!(
        "generated '{}' for N={} in {} ({} nodes, latency {} clocks)",
        graph.name(),
        graph.n(),
        graph.format(),
        graph.node_count(),
        graph.latency()
    );
    Ok(graph)
}

/// The reference programs, one per binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// `dft_brute_force`
    BruteForce,
    /// `dft_brute_force_w`
    BruteForceTable,
    /// `dft_recurse`
    Recurse,
    /// `dft_rustfft`, the library transform used as an outside check
    Library,
    /// `idft_brute_force`, fixed point
    FixedBruteForce,
    /// `idft_recurse`, fixed point
    FixedRecurse,
}

impl Reference {
    pub fn bin_name(self) -> &'static str {
        match self {
            Reference::BruteForce => "dft_brute_force",
            Reference::BruteForceTable => "dft_brute_force_w",
            Reference::Recurse => "dft_recurse",
            Reference::Library => "dft_rustfft",
            Reference::FixedBruteForce => "idft_brute_force",
            Reference::FixedRecurse => "idft_recurse",
        }
    }
}

/// Reads `--src`, runs the transform and writes `--dst`.
pub fn run_reference(args: &RefArgs, reference: Reference) -> Result<usize> {
    let src = vector_io::read_file(&args.src)
        .with_context(|| format!("Unable to open input file {}", args.src.display()))?;
    anyhow::ensure!(!src.is_empty(), "No samples in input file {}", args.src.display());
    log::info!(
        "{}: {} samples from {}",
        reference.bin_name(),
        src.len(),
        args.src.display()
    );

    let open_err = || format!("Unable to open output file {}", args.dst.display());
    match reference {
        Reference::BruteForce => {
            let dst = float::brute_force(&src, TRANS_SIGN)?;
            vector_io::write_file(&args.dst, &dst).with_context(open_err)?;
        }
        Reference::BruteForceTable => {
            let dst = float::brute_force_table(&src, TRANS_SIGN)?;
            vector_io::write_file(&args.dst, &dst).with_context(open_err)?;
        }
        Reference::Recurse => {
            let dst = float::recurse(&src, TRANS_SIGN)?;
            vector_io::write_file(&args.dst, &dst).with_context(open_err)?;
        }
        Reference::Library => {
            let dst = float::library_fft(&src, TRANS_SIGN)?;
            vector_io::write_file(&args.dst, &dst).with_context(open_err)?;
        }
        Reference::FixedBruteForce => {
            let src = fixed::quantize::<32, 8>(&src)?;
            let dst: Vec<RefFixed> = fixed::brute_force_table(&src, TRANS_SIGN)?;
            vector_io::write_fixed_file(&args.dst, &dst).with_context(open_err)?;
        }
        Reference::FixedRecurse => {
            let src = fixed::quantize::<32, 8>(&src)?;
            let dst: Vec<RefFixed> = fixed::recurse(&src, TRANS_SIGN)?;
            vector_io::write_fixed_file(&args.dst, &dst).with_context(open_err)?;
        }
    }
    Ok(src.len())
}

/// Shared `main` body of the reference binaries.
pub fn reference_main(reference: Reference) -> Result<()> {
    init_logging();
    let args = RefArgs::from_env();
    run_reference(&args, reference)?;
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

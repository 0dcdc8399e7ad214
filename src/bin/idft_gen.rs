use anyhow::Result;
use dft_pipeline::cli::{self, GenArgs};

fn main() -> Result<()> {
    cli::init_logging();
    let args = GenArgs::from_env();
    let config = cli::generator_config(&args)?;

    let stdout = std::io::stdout();
    cli::run_generator(&config, &mut stdout.lock())?;
    Ok(())
}

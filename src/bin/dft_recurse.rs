use dft_pipeline::cli::{reference_main, Reference};

fn main() -> anyhow::Result<()> {
    reference_main(Reference::Recurse)
}

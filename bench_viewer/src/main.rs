use anyhow::Result;
use bench_viewer::cli;

fn main() -> Result<()> {
    cli::handle_calls()
}

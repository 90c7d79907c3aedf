use anyhow::Result;

fn main() -> Result<()> {
    modernize_reporter::cli::run()
}

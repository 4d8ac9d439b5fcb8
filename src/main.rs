use element_embeddings::cli;

fn main() -> anyhow::Result<()> {
    cli::run()
}

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    slimshot::run().context("slimshot exited with an error")
}

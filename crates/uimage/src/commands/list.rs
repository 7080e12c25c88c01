use std::fs;
use std::io;
use std::io::Write;

use anyhow::Context;
use anyhow::Result;
use uio_cli::Command;

use super::Manifest;

pub fn command() -> Command {
    let mut cmd = Command::new("list")
        .with_short("list uimage")
        .with_aliases(["ls", "l"]);
    let verbose = uio_log::register_debug_flag(cmd.flags(), "v");
    cmd.with_run(move |paths| {
        uio_log::init(verbose.level());
        for path in paths {
            if let Err(err) = list(path) {
                tracing::error!("list: {err:#}");
            }
        }
    })
}

fn list(path: &str) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let manifest = Manifest::parse(&text).with_context(|| format!("{path} is not an image"))?;
    tracing::debug!(path, files = manifest.files.len(), "listing image");

    let mut stdout = io::stdout().lock();
    for file in &manifest.files {
        writeln!(stdout, "{}\t{file}", manifest.name)?;
    }
    Ok(())
}

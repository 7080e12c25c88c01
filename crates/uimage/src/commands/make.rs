use std::fs;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use uio_cli::Command;
use uio_cli::Flag;
use uio_log::VerboseFlag;

use super::Manifest;

pub fn command() -> Command {
    let mut cmd = Command::new("make").with_short("create uimage");
    let make = Make {
        output: cmd
            .flags()
            .string("o", "", "write the image manifest to `file`"),
        name: cmd.flags().string("name", "uimage", "image name"),
        verbose: uio_log::register_debug_flag(cmd.flags(), "v"),
    };
    cmd.with_run(move |files| make.run(files))
}

struct Make {
    output: Flag<String>,
    name: Flag<String>,
    verbose: VerboseFlag,
}

impl Make {
    fn run(&self, files: &[String]) {
        uio_log::init(self.verbose.level());
        if let Err(err) = self.make(files) {
            tracing::error!("make: {err:#}");
        }
    }

    fn make(&self, files: &[String]) -> Result<()> {
        let output = self.output.get();
        if output.is_empty() {
            bail!("no output file, use -o");
        }

        let manifest = Manifest {
            name: self.name.get(),
            files: files.to_vec(),
        };
        fs::write(&output, manifest.render())
            .with_context(|| format!("failed to write {output}"))?;

        tracing::info!(%output, files = files.len(), "wrote image manifest");
        Ok(())
    }
}

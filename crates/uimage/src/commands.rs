mod list;
mod make;

use anyhow::bail;
use anyhow::Result;
use uio_cli::App;

const MAGIC: &str = "uimage";

pub fn app() -> App {
    App::from_iter([make::command(), list::command()])
}

/// The on-disk image description: a `uimage <name>` header line followed by
/// one file per line.
#[derive(Debug, PartialEq)]
struct Manifest {
    name: String,
    files: Vec<String>,
}

impl Manifest {
    fn render(&self) -> String {
        let mut out = format!("{MAGIC} {}\n", self.name);
        for file in &self.files {
            out.push_str(file);
            out.push('\n');
        }
        out
    }

    fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let Some(name) = lines
            .next()
            .and_then(|header| header.strip_prefix(MAGIC))
            .and_then(|rest| rest.strip_prefix(' '))
        else {
            bail!("missing `{MAGIC}` header");
        };

        Ok(Self {
            name: name.to_string(),
            files: lines
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

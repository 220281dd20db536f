use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Install the global logger. `RUST_LOG` overrides `level` when set.
pub fn init(level: LevelFilter, logfile: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .parse_env(Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} PID {} {} - {}",
                buf.timestamp_millis(),
                record.target(),
                std::process::id(),
                record.level(),
                record.args()
            )
        });

    if let Some(path) = logfile {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;
    Ok(())
}

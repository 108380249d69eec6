use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::errors::ParserError;

/// Copies every formatted log line to stderr and to the log file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Installs the process-wide logger. `RUST_LOG` overrides the default `info` level.
pub fn init(log_file: &Path) -> Result<(), ParserError> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    Builder::new()
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .try_init()
        .map_err(|e| ParserError::Logger(e.to_string()))?;

    log::info!("Logger initialized, writing to {}", log_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tee_writer_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parser.log");
        let file = OpenOptions::new().create(true).append(true).open(&path).unwrap();

        let mut tee = TeeWriter { file };
        tee.write_all(b"first line\n").unwrap();
        tee.write_all(b"second line\n").unwrap();
        tee.flush().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "first line\nsecond line\n");
    }
}

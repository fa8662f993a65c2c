/// Log setup.
///
/// The game owns the terminal (raw mode, alternate screen), so records go
/// to a file instead of stderr. Nothing is set up unless `RUST_LOG` is
/// present; the file defaults to `blastgrid.log` and can be moved with
/// `BLASTGRID_LOG_FILE`.

use std::fs::File;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

pub const LOG_FILE_ENV: &str = "BLASTGRID_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "blastgrid.log";

pub fn init() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let path = log_path(std::env::var_os(LOG_FILE_ENV).map(PathBuf::from));
    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Could not open log file {}: {e}", path.display());
            return;
        }
    };

    let result = Builder::from_env(Env::default())
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}

fn log_path(from_env: Option<PathBuf>) -> PathBuf {
    from_env
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_when_unset_or_empty() {
        assert_eq!(log_path(None), PathBuf::from("blastgrid.log"));
        assert_eq!(log_path(Some(PathBuf::new())), PathBuf::from("blastgrid.log"));
        assert_eq!(log_path(Some("/tmp/x.log".into())), PathBuf::from("/tmp/x.log"));
    }
}

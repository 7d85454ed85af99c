use bpaf::*;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Options {
    /// Workspace to open before the first request arrives.
    pub workspace: Option<PathBuf>,
    pub log_level: LevelFilter,
}

pub fn options() -> OptionParser<Options> {
    let workspace = long("workspace")
        .short('w')
        .help("Directory holding gradebook.sqlite3; created if missing")
        .argument::<PathBuf>("PATH")
        .optional();

    let log_level = long("log-level")
        .help("Log verbosity on stderr: off, error, warn, info, debug, trace")
        .argument::<LevelFilter>("LEVEL")
        .fallback(LevelFilter::INFO);

    construct!(Options {
        workspace,
        log_level
    })
    .to_options()
    .descr("Gradebook sidecar: JSON requests on stdin, one JSON response per line on stdout")
    .version(env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_workspace_and_info() {
        let empty: &[&str] = &[];
        let opts = options().run_inner(empty).expect("parse");
        assert!(opts.workspace.is_none());
        assert_eq!(opts.log_level, LevelFilter::INFO);
    }

    #[test]
    fn reads_workspace_and_level() {
        let opts = options()
            .run_inner(&["--workspace", "/tmp/gb", "--log-level", "debug"])
            .expect("parse");
        assert_eq!(opts.workspace, Some(PathBuf::from("/tmp/gb")));
        assert_eq!(opts.log_level, LevelFilter::DEBUG);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(options().run_inner(&["--log-level", "loud"]).is_err());
    }
}

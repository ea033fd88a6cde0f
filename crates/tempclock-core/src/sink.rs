//! Report sinks
//!
//! Every trigger publishes the same rendered text to each sink. With the `std`
//! feature this module also provides the log file and console sinks.

use crate::error::SinkError;

/// Destination for rendered reports.
pub trait ReportSink {
    fn publish(&mut self, report: &str) -> Result<(), SinkError>;
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn publish(&mut self, report: &str) -> Result<(), SinkError> {
        (**self).publish(report)
    }
}

/// Publishes to both sinks. Both are attempted; the first error is returned.
impl<A: ReportSink, B: ReportSink> ReportSink for (A, B) {
    fn publish(&mut self, report: &str) -> Result<(), SinkError> {
        let first = self.0.publish(report);
        let second = self.1.publish(report);
        first.and(second)
    }
}

#[cfg(feature = "std")]
pub use host::*;

#[cfg(feature = "std")]
mod host {
    use std::fs::File;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use log::debug;

    use super::ReportSink;
    use crate::error::{SinkError, details};

    /// Default log file name, relative to the working directory.
    pub const LOG_FILE_NAME: &str = "log.txt";

    /// ANSI erase display and cursor home.
    pub const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

    /// Rewrites one file from scratch on every report.
    #[derive(Debug, Clone)]
    pub struct LogFileSink {
        path: PathBuf,
    }

    impl LogFileSink {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Default for LogFileSink {
        fn default() -> Self {
            Self::new(LOG_FILE_NAME)
        }
    }

    impl ReportSink for LogFileSink {
        fn publish(&mut self, report: &str) -> Result<(), SinkError> {
            let write_err = |e: std::io::Error| SinkError::Write {
                sink: "log file",
                details: details(e),
            };

            let mut file = File::create(&self.path).map_err(write_err)?;
            file.write_all(report.as_bytes()).map_err(write_err)?;
            file.flush().map_err(write_err)?;

            debug!("Wrote {} bytes to {}", report.len(), self.path.display());
            Ok(())
        }
    }

    /// Clears the terminal, then prints the report.
    pub struct ConsoleSink<W> {
        out: W,
    }

    impl ConsoleSink<std::io::Stdout> {
        pub fn stdout() -> Self {
            Self::new(std::io::stdout())
        }
    }

    impl<W: Write> ConsoleSink<W> {
        pub fn new(out: W) -> Self {
            Self { out }
        }

        pub fn into_inner(self) -> W {
            self.out
        }
    }

    impl<W: Write> ReportSink for ConsoleSink<W> {
        fn publish(&mut self, report: &str) -> Result<(), SinkError> {
            let write_err = |e: std::io::Error| SinkError::Write {
                sink: "console",
                details: details(e),
            };

            self.out
                .write_all(CLEAR_SCREEN.as_bytes())
                .map_err(write_err)?;
            self.out.write_all(report.as_bytes()).map_err(write_err)?;
            self.out.flush().map_err(write_err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::details;

    #[derive(Default)]
    struct Collect(std::vec::Vec<std::string::String>);

    impl ReportSink for Collect {
        fn publish(&mut self, report: &str) -> Result<(), SinkError> {
            self.0.push(report.into());
            Ok(())
        }
    }

    struct Broken;

    impl ReportSink for Broken {
        fn publish(&mut self, _report: &str) -> Result<(), SinkError> {
            Err(SinkError::Write {
                sink: "broken",
                details: details("disk full"),
            })
        }
    }

    #[test]
    fn test_pair_publishes_to_both_even_when_first_fails() {
        let mut pair = (Broken, Collect::default());
        assert!(pair.publish("20°C\n").is_err());
        assert_eq!(pair.1.0, ["20°C\n"]);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_log_file_is_truncated_each_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let mut sink = LogFileSink::new(&path);

        sink.publish("first report that is fairly long\n").unwrap();
        sink.publish("second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_log_file_error_names_sink() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = LogFileSink::new(dir.path().join("missing").join("log.txt"));

        assert!(matches!(
            sink.publish("x"),
            Err(SinkError::Write {
                sink: "log file",
                ..
            })
        ));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_console_clears_before_report() {
        let mut sink = ConsoleSink::new(std::vec::Vec::new());
        sink.publish("21°C\n").unwrap();

        let written = std::string::String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, format!("{CLEAR_SCREEN}21°C\n"));
    }
}

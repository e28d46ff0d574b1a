//! Purpose: Run the launcher: report whether the engine library exists, then call it.
//! Exports: `Launcher`, `LaunchReport`, `LibraryProbe`, `FsProbe`.
//! Role: Sequences the two launcher steps over injected probe and loader seams.
//! Invariants: Exactly one existence check and exactly one foreign call per run.
//! Invariants: The existence result is reported but never gates the call.
//! Invariants: The report line is `true` or `false` followed by a newline.
//! Invariants: An `int` return value is observed and discarded, never an exit code.
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::binding::EngineLoader;
use crate::config::LauncherConfig;
use crate::core::entry::EntryPoint;
use crate::core::error::{Error, ErrorKind};

pub trait LibraryProbe {
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FsProbe;

impl LibraryProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchReport {
    pub library: PathBuf,
    pub library_found: bool,
    pub entry: EntryPoint,
    pub returned: Option<i32>,
}

pub struct Launcher<P, L> {
    config: LauncherConfig,
    probe: P,
    loader: L,
}

impl<P: LibraryProbe, L: EngineLoader> Launcher<P, L> {
    pub fn new(config: LauncherConfig, probe: P, loader: L) -> Self {
        Self {
            config,
            probe,
            loader,
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<LaunchReport, Error> {
        let library = self.config.library();
        let entry = self.config.entry();

        let library_found = self.probe.exists(library);
        writeln!(out, "{library_found}")
            .and_then(|()| out.flush())
            .map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to write library status")
                    .with_source(err)
            })?;
        if !library_found {
            warn!(library = %library.display(), "engine library missing; calling anyway");
        }

        let outcome = self.loader.call_entry(library, library_found, entry)?;
        if let Some(code) = outcome.returned {
            debug!(symbol = entry.symbol(), code, "entry returned (ignored)");
        }

        Ok(LaunchReport {
            library: library.to_path_buf(),
            library_found,
            entry: entry.clone(),
            returned: outcome.returned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Launcher, LibraryProbe};
    use crate::binding::{CallOutcome, DylibLoader, EngineLoader};
    use crate::config::LauncherConfig;
    use crate::core::entry::{EntryPoint, EntrySignature};
    use crate::core::error::{Error, ErrorKind};
    use std::cell::Cell;
    use std::io;
    use std::path::{Path, PathBuf};

    struct CountingProbe {
        found: bool,
        checks: Cell<usize>,
    }

    impl CountingProbe {
        fn new(found: bool) -> Self {
            Self {
                found,
                checks: Cell::new(0),
            }
        }
    }

    impl LibraryProbe for CountingProbe {
        fn exists(&self, _path: &Path) -> bool {
            self.checks.set(self.checks.get() + 1);
            self.found
        }
    }

    #[derive(Default)]
    struct RecordingLoader {
        calls: Vec<(PathBuf, bool, EntryPoint)>,
        returned: Option<i32>,
        fail_with: Option<ErrorKind>,
    }

    impl EngineLoader for RecordingLoader {
        fn call_entry(
            &mut self,
            library: &Path,
            library_found: bool,
            entry: &EntryPoint,
        ) -> Result<CallOutcome, Error> {
            self.calls.push((library.to_path_buf(), library_found, entry.clone()));
            match self.fail_with {
                Some(kind) => Err(Error::new(kind).with_path(library)),
                None => Ok(CallOutcome {
                    returned: self.returned,
                }),
            }
        }
    }

    fn config(signature: EntrySignature) -> LauncherConfig {
        let symbol = match signature {
            EntrySignature::IntReturn => "main",
            _ => "say_hello",
        };
        LauncherConfig::new(
            "/opt/engine/libengine.so",
            EntryPoint::new(symbol, signature).expect("entry"),
        )
    }

    #[test]
    fn found_library_prints_true_and_calls_once() {
        let mut launcher = Launcher::new(
            config(EntrySignature::NoArgs),
            CountingProbe::new(true),
            RecordingLoader::default(),
        );
        let mut out = Vec::new();

        let report = launcher.run(&mut out).expect("run");

        assert_eq!(out, b"true\n");
        assert!(report.library_found);
        assert_eq!(report.returned, None);
        assert_eq!(launcher.probe().checks.get(), 1);
        assert_eq!(launcher.loader().calls.len(), 1);
        let (path, found, entry) = &launcher.loader().calls[0];
        assert_eq!(path, Path::new("/opt/engine/libengine.so"));
        assert!(*found);
        assert_eq!(entry.symbol(), "say_hello");
    }

    #[test]
    fn missing_library_still_attempts_the_call() {
        let mut launcher = Launcher::new(
            config(EntrySignature::NullPointer),
            CountingProbe::new(false),
            RecordingLoader {
                fail_with: Some(ErrorKind::NotFound),
                ..RecordingLoader::default()
            },
        );
        let mut out = Vec::new();

        let err = launcher.run(&mut out).unwrap_err();

        assert_eq!(out, b"false\n");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(launcher.probe().checks.get(), 1);
        assert_eq!(launcher.loader().calls.len(), 1);
        assert!(!launcher.loader().calls[0].1);
    }

    #[test]
    fn dylib_loader_trusts_the_single_existence_check() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("libengine.so");
        // The check reports the file present; a loader that re-checked the
        // file system would classify the failure as NotFound instead.
        let mut launcher = Launcher::new(
            LauncherConfig::new(&missing, EntryPoint::default()),
            CountingProbe::new(true),
            DylibLoader::new(),
        );

        let err = launcher.run(&mut io::sink()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Load);
        assert_eq!(err.path(), Some(missing.as_path()));
        assert_eq!(launcher.probe().checks.get(), 1);
    }

    #[test]
    fn int_return_is_reported_not_acted_on() {
        let mut launcher = Launcher::new(
            config(EntrySignature::IntReturn),
            CountingProbe::new(true),
            RecordingLoader {
                returned: Some(42),
                ..RecordingLoader::default()
            },
        );
        let mut out = Vec::new();

        let report = launcher.run(&mut out).expect("run");

        assert_eq!(out, b"true\n");
        assert_eq!(report.returned, Some(42));
        assert_eq!(report.entry.signature(), EntrySignature::IntReturn);
    }

    #[test]
    fn symbol_failure_is_not_retried() {
        let mut launcher = Launcher::new(
            config(EntrySignature::NoArgs),
            CountingProbe::new(true),
            RecordingLoader {
                fail_with: Some(ErrorKind::Symbol),
                ..RecordingLoader::default()
            },
        );

        let err = launcher.run(&mut io::sink()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Symbol);
        assert_eq!(launcher.loader().calls.len(), 1);
    }

    struct BrokenPipe;

    impl io::Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn report_write_failure_is_io_error() {
        let mut launcher = Launcher::new(
            config(EntrySignature::NoArgs),
            CountingProbe::new(true),
            RecordingLoader::default(),
        );

        let err = launcher.run(&mut BrokenPipe).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(launcher.loader().calls.is_empty());
    }
}

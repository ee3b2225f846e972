//! Output modes
//!
//! A [`ModeHandler`] receives every file the traversal yields, in order.
//! Check only verifies the file can be opened, collate streams it into one
//! document and list records its position as a numbered link. Any handler
//! failure ends the run.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use colette_fs::ProjectPath;

use crate::config::{Mode, Padding, ProjectConfig};
use crate::report::{Detail, Diagnostic, Operation};
use crate::traversal::ResolvedEntry;

/// Size of the collate copy buffer.
pub const COPY_BUF_SIZE: usize = 8192;

/// Written after every collated file.
pub const SEPARATOR: &[u8] = b"\n";

/// The handler for one run's mode.
#[derive(Debug)]
pub enum ModeHandler {
    Check,
    Collate(CollateSink),
    List(ListSink),
}

impl ModeHandler {
    /// Prepare the output of the configured mode.
    pub fn open(config: &ProjectConfig) -> Result<Self, Diagnostic> {
        Ok(match config.mode {
            Mode::Check => Self::Check,
            Mode::Collate => {
                let path = config
                    .collate_path()
                    .map_err(|e| output_error(e, config.title.collate_file_name()))?;
                Self::Collate(CollateSink::create(path)?)
            }
            Mode::List => {
                let dir = config
                    .list_path()
                    .map_err(|e| output_error(e, config.title.stem()))?;
                Self::List(ListSink::create(dir, config.padding)?)
            }
        })
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Check => Mode::Check,
            Self::Collate(_) => Mode::Collate,
            Self::List(_) => Mode::List,
        }
    }

    /// Process one traversed file.
    pub fn handle(&mut self, entry: &ResolvedEntry) -> Result<(), Diagnostic> {
        match self {
            Self::Check => check(entry),
            Self::Collate(sink) => sink.append(entry),
            Self::List(sink) => sink.record(entry),
        }
    }

    /// Complete the output. Returns where it was written, if anywhere.
    pub fn finish(self) -> Result<Option<ProjectPath>, Diagnostic> {
        match self {
            Self::Check => Ok(None),
            Self::Collate(sink) => sink.finish().map(Some),
            Self::List(sink) => sink.finish().map(Some),
        }
    }
}

fn output_error(err: crate::Error, name: impl std::fmt::Display) -> Diagnostic {
    match err {
        crate::Error::Fs(colette_fs::Error::Path(e)) => {
            Diagnostic::path(Operation::CtxOutput, e).at(name)
        }
        other => Diagnostic::new(Operation::CtxOutput, Detail::InvalidOutput)
            .at(name)
            .caused_by(other),
    }
}

fn check(entry: &ResolvedEntry) -> Result<(), Diagnostic> {
    File::open(entry.path.to_native())
        .map(drop)
        .map_err(|e| {
            let detail = Detail::for_open(&e);
            Diagnostic::io(Operation::HandleCheck, detail, e).at(&entry.path)
        })
}

/// The collated document being written.
#[derive(Debug)]
pub struct CollateSink {
    path: ProjectPath,
    writer: BufWriter<File>,
    buffer: Box<[u8]>,
    files: usize,
}

impl CollateSink {
    /// Create or truncate the document at `path`.
    pub fn create(path: ProjectPath) -> Result<Self, Diagnostic> {
        let native = path.to_native();
        if is_symlink(&native) {
            return Err(Diagnostic::new(Operation::CtxOutput, Detail::InvalidLink).at(&path));
        }

        let file = File::create(&native).map_err(|e| {
            let detail = match e.kind() {
                io::ErrorKind::PermissionDenied => Detail::AccessDenied,
                _ => Detail::InvalidOutput,
            };
            Diagnostic::io(Operation::CtxOutput, detail, e).at(&path)
        })?;
        tracing::debug!(path = %path, "Collating into");

        Ok(Self {
            path,
            writer: BufWriter::with_capacity(COPY_BUF_SIZE, file),
            buffer: vec![0; COPY_BUF_SIZE].into_boxed_slice(),
            files: 0,
        })
    }

    fn append(&mut self, entry: &ResolvedEntry) -> Result<(), Diagnostic> {
        let mut input = File::open(entry.path.to_native()).map_err(|e| {
            let detail = Detail::for_open(&e);
            Diagnostic::io(Operation::HandleCollate, detail, e).at(&entry.path)
        })?;

        loop {
            let n = match input.read(&mut self.buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(
                        Diagnostic::io(Operation::HandleCollate, Detail::ReadFile, e).at(&entry.path)
                    );
                }
            };
            self.writer
                .write_all(&self.buffer[..n])
                .map_err(|e| self.write_error(e))?;
        }
        self.writer
            .write_all(SEPARATOR)
            .map_err(|e| self.write_error(e))?;

        self.files += 1;
        Ok(())
    }

    fn write_error(&self, err: io::Error) -> Diagnostic {
        Diagnostic::io(Operation::HandleCollate, Detail::WriteFile, err).at(&self.path)
    }

    fn finish(mut self) -> Result<ProjectPath, Diagnostic> {
        self.writer.flush().map_err(|e| self.write_error(e))?;
        tracing::info!(path = %self.path, files = self.files, "Wrote collated document");
        Ok(self.path)
    }
}

/// The numbered link directory being populated.
///
/// Each file becomes a link named `<position>_<basename>`. Links whose
/// target is unchanged are left alone, so repeated runs over the same
/// project do not touch the directory. Links the run did not produce are
/// removed at the end; anything that is not a link is never modified.
#[derive(Debug)]
pub struct ListSink {
    dir: ProjectPath,
    padding: Padding,
    position: u64,
    produced: HashSet<String>,
}

impl ListSink {
    /// Use `dir` as the link directory, creating it if absent.
    pub fn create(dir: ProjectPath, padding: Padding) -> Result<Self, Diagnostic> {
        let native = dir.to_native();
        match fs::symlink_metadata(&native) {
            Ok(meta) if meta.file_type().is_dir() => {}
            Ok(_) => {
                return Err(Diagnostic::new(Operation::CtxOutput, Detail::InvalidOutput).at(&dir));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&native).map_err(|e| {
                    let detail = match e.kind() {
                        io::ErrorKind::PermissionDenied => Detail::AccessDenied,
                        _ => Detail::WriteFile,
                    };
                    Diagnostic::io(Operation::CtxOutput, detail, e).at(&dir)
                })?;
                tracing::debug!(dir = %dir, "Created list directory");
            }
            Err(e) => {
                return Err(Diagnostic::io(Operation::CtxOutput, Detail::for_open(&e), e).at(&dir));
            }
        }

        Ok(Self {
            dir,
            padding,
            position: 0,
            produced: HashSet::new(),
        })
    }

    fn record(&mut self, entry: &ResolvedEntry) -> Result<(), Diagnostic> {
        self.position += 1;
        if self.position > self.padding.max_position() {
            return Err(Diagnostic::new(Operation::HandleList, Detail::TooManyFiles).at(&entry.path));
        }

        let basename = entry
            .path
            .basename()
            .map_err(|e| Diagnostic::path(Operation::HandleList, e).at(&entry.path))?;
        let link_name = format!("{}_{}", self.padding.format(self.position), basename);
        let link = self
            .dir
            .join(&link_name)
            .map_err(|e| Diagnostic::path(Operation::HandleList, e).at(&link_name))?;
        let native = link.to_native();
        let target = entry.path.to_native();

        match fs::symlink_metadata(&native) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let current = fs::read_link(&native).map_err(|e| self.list_error(&link, e))?;
                if current == target {
                    tracing::trace!(link = %link, "Link up to date");
                } else {
                    fs::remove_file(&native).map_err(|e| self.list_error(&link, e))?;
                    create_link(&target, &native).map_err(|e| self.list_error(&link, e))?;
                    tracing::debug!(link = %link, "Replaced stale link");
                }
            }
            Ok(_) => {
                return Err(Diagnostic::new(Operation::HandleList, Detail::InvalidOutput).at(&link));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                create_link(&target, &native).map_err(|e| self.list_error(&link, e))?;
                tracing::debug!(link = %link, "Created link");
            }
            Err(e) => return Err(self.list_error(&link, e)),
        }

        self.produced.insert(link_name);
        Ok(())
    }

    fn list_error(&self, link: &ProjectPath, err: io::Error) -> Diagnostic {
        let detail = match err.kind() {
            io::ErrorKind::PermissionDenied => Detail::AccessDenied,
            _ => Detail::WriteFile,
        };
        Diagnostic::io(Operation::HandleList, detail, err).at(link)
    }

    /// Remove links left over from earlier runs.
    fn finish(self) -> Result<ProjectPath, Diagnostic> {
        let read_error =
            |e: io::Error| Diagnostic::io(Operation::HandleList, Detail::ReadDirectory, e).at(&self.dir);

        let mut pruned = 0usize;
        for entry in fs::read_dir(self.dir.to_native()).map_err(read_error)? {
            let entry = entry.map_err(read_error)?;
            if !entry.file_type().map_err(read_error)?.is_symlink() {
                continue;
            }
            let name = entry.file_name();
            let keep = name.to_str().is_some_and(|n| self.produced.contains(n));
            if !keep {
                fs::remove_file(entry.path()).map_err(|e| {
                    Diagnostic::io(Operation::HandleList, Detail::WriteFile, e)
                        .at(entry.path().display())
                })?;
                pruned += 1;
            }
        }

        tracing::info!(
            dir = %self.dir,
            links = self.produced.len(),
            pruned,
            "Wrote file listing"
        );
        Ok(self.dir)
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

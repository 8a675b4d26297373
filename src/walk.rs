//! Depth-first walk of a directory tree.

use std::fs;
use std::ffi::{OsStr};
use std::os::unix::ffi::{OsStrExt};
use std::os::unix::fs::{FileTypeExt};
use std::path::{Path, PathBuf};
use log::{debug};
use crate::defs::{EntryKind, OwnedDirent};
use crate::error::{Result};
use crate::read_dir::{ReadDirIter, ReadDirer};

/// An entry found by `WalkDir`, with its path joined onto the base path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WalkEntry {
  pub path: PathBuf,
  pub ino: u64,
  pub kind: EntryKind,
  /// 0 for entries of the root directory.
  pub depth: usize,
}

impl WalkEntry {
  pub fn is_dir(&self) -> bool {
    self.kind == EntryKind::Directory
  }
}

/// Opens subdirectories met during a walk.
pub trait OpenDir {
  type Reader: ReadDirer<Entry = OwnedDirent>;

  fn open_dir(&mut self, path: &Path) -> Result<Self::Reader>;
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use self::linux::{FsOpener};

#[cfg(any(target_os = "linux", target_os = "android"))]
mod linux {
  use std::fs;
  use std::os::unix::fs::{OpenOptionsExt};
  use std::path::{Path};
  use crate::defs::{make_buffer};
  use crate::dirents::{Dirents};
  use crate::error::{Error, ErrorKind, Result};
  use crate::read_dir::{DirentBatches};
  use crate::stream::{OwnedDirStream};
  use super::{OpenDir};

  /// Opens directories from the filesystem, each with its own scratch buffer
  /// of `buffer_size` bytes. The descriptors are closed when the walk leaves
  /// the directory.
  #[derive(Copy, Clone, Debug)]
  pub struct FsOpener {
    pub buffer_size: usize,
  }

  impl OpenDir for FsOpener {
    type Reader = DirentBatches<OwnedDirStream, Vec<u8>>;

    fn open_dir(&mut self, path: &Path) -> Result<Self::Reader> {
      let file = fs::OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_DIRECTORY)
        .open(path)
        .map_err(|err| Error::with_cause(ErrorKind::Open,
          format!("Cannot open directory {}", path.display()), err))?;
      let dirents = Dirents::new(OwnedDirStream(file), make_buffer(self.buffer_size))?;
      Ok(DirentBatches::new(dirents))
    }
  }
}

struct Level<R: ReadDirer> {
  path: PathBuf,
  iter: ReadDirIter<R>,
}

/// Walks the tree below a root directory, depth first, reporting every entry
/// before the contents of the directory it names.
///
/// The root reader belongs to the caller's directory handle; only the
/// subdirectories are opened (and closed) by the walk. Symlinks are reported
/// but never followed. After receiving a directory entry, `skip_dir` keeps the
/// walk from descending into it. Entries tagged `Unknown` are resolved with
/// `lstat`, and `WalkEntry::kind` holds the resolved type. The first error ends
/// the walk.
pub struct WalkDir<R: ReadDirer, O: OpenDir> {
  root: Level<R>,
  opened: Vec<Level<O::Reader>>,
  opener: O,
  n: usize,
  pending: Option<PathBuf>,
  finished: bool,
}

impl<R: ReadDirer<Entry = OwnedDirent>, O: OpenDir> WalkDir<R, O> {
  /// `n` is the batch size passed to every `ReadDirer::read_dir`.
  pub fn new<P: Into<PathBuf>>(base: P, root: R, n: usize, opener: O) -> WalkDir<R, O> {
    WalkDir {
      root: Level { path: base.into(), iter: ReadDirIter::new(root, n) },
      opened: Vec::new(),
      opener: opener,
      n: n,
      pending: None,
      finished: false,
    }
  }

  /// Do not descend into the directory returned by the last call to `next`.
  pub fn skip_dir(&mut self) {
    self.pending = None;
  }

  fn descend(&mut self) -> Result<()> {
    if let Some(path) = self.pending.take() {
      let reader = self.opener.open_dir(&path)?;
      debug!("opened directory {}", path.display());
      self.opened.push(Level { path: path, iter: ReadDirIter::new(reader, self.n) });
    }
    Ok(())
  }

  fn next_entry(&mut self) -> Option<Result<WalkEntry>> {
    loop {
      let depth = self.opened.len();
      let (base, next) = match self.opened.last_mut() {
        Some(level) => (&level.path, level.iter.next()),
        None => (&self.root.path, self.root.iter.next()),
      };
      match next {
        Some(Ok(entry)) => {
          let path = base.join(OsStr::from_bytes(&entry.name[..]));
          let kind = match entry.kind {
            EntryKind::Unknown => resolve_kind(&path),
            kind => kind,
          };
          if kind == EntryKind::Directory {
            self.pending = Some(path.clone());
          }
          return Some(Ok(WalkEntry { path: path, ino: entry.ino, kind: kind, depth: depth }))
        },
        Some(Err(err)) => return Some(Err(err)),
        None => match self.opened.pop() {
          Some(level) => debug!("closed directory {}", level.path.display()),
          None => return None,
        },
      }
    }
  }
}

/// Asks `lstat` for the type of an entry the filesystem reported as unknown.
/// Stays `Unknown` if the entry vanished in the meantime.
fn resolve_kind(path: &Path) -> EntryKind {
  let file_type = match fs::symlink_metadata(path) {
    Ok(metadata) => metadata.file_type(),
    Err(err) => {
      debug!("cannot resolve type of {}: {}", path.display(), err);
      return EntryKind::Unknown
    },
  };
  if file_type.is_dir() {
    EntryKind::Directory
  } else if file_type.is_file() {
    EntryKind::RegularFile
  } else if file_type.is_symlink() {
    EntryKind::Symlink
  } else if file_type.is_fifo() {
    EntryKind::NamedPipe
  } else if file_type.is_socket() {
    EntryKind::Socket
  } else if file_type.is_char_device() {
    EntryKind::CharDevice
  } else if file_type.is_block_device() {
    EntryKind::BlockDevice
  } else {
    EntryKind::Unknown
  }
}

impl<R: ReadDirer<Entry = OwnedDirent>, O: OpenDir> Iterator for WalkDir<R, O> {
  type Item = Result<WalkEntry>;

  fn next(&mut self) -> Option<Result<WalkEntry>> {
    if self.finished {
      return None
    }
    let res = match self.descend() {
      Ok(()) => self.next_entry(),
      Err(err) => Some(Err(err)),
    };
    match res {
      Some(Ok(_)) => {},
      _ => self.finished = true,
    }
    res
  }
}

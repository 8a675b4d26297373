use std::{fmt, iter};

/// Size of the scratch buffer used when the caller does not pick one.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// File type tag of a directory entry, as reported by the OS.
///
/// The discriminants are the host `DT_*` values. The tag is not validated
/// against the file itself: `Unknown` means the filesystem did not say, and
/// resolving it (usually with `lstat`) is up to the caller.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EntryKind {
  Unknown = 0,
  NamedPipe = 1,
  CharDevice = 2,
  Directory = 4,
  BlockDevice = 6,
  RegularFile = 8,
  Symlink = 10,
  Socket = 12,
}

impl EntryKind {
  /// Maps a raw type tag. Tags outside the enumeration (e.g. `DT_WHT`) decode
  /// as `Unknown`.
  pub fn from_raw(tag: u8) -> EntryKind {
    match tag {
      1 => EntryKind::NamedPipe,
      2 => EntryKind::CharDevice,
      4 => EntryKind::Directory,
      6 => EntryKind::BlockDevice,
      8 => EntryKind::RegularFile,
      10 => EntryKind::Symlink,
      12 => EntryKind::Socket,
      _ => EntryKind::Unknown,
    }
  }

  pub fn as_raw(self) -> u8 {
    self as u8
  }
}

/// A decoded directory entry.
///
/// `name` points into the scratch buffer of the `Dirents` that produced it and
/// is only valid until that buffer is refilled. Use `to_owned_dirent` to keep
/// the entry around.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct DirentInfo<'b> {
  pub ino: u64,
  pub kind: EntryKind,
  pub name: &'b [u8],
}

impl<'b> DirentInfo<'b> {
  pub fn to_owned_dirent(&self) -> OwnedDirent {
    OwnedDirent {
      ino: self.ino,
      kind: self.kind,
      name: self.name.to_vec(),
    }
  }
}

impl<'b> fmt::Debug for DirentInfo<'b> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("DirentInfo")
      .field("ino", &self.ino)
      .field("kind", &self.kind)
      .field("name", &String::from_utf8_lossy(self.name))
      .finish()
  }
}

/// A directory entry that owns its name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OwnedDirent {
  pub ino: u64,
  pub kind: EntryKind,
  pub name: Vec<u8>,
}

impl OwnedDirent {
  pub fn is_dir(&self) -> bool {
    self.kind == EntryKind::Directory
  }
}

pub fn make_buffer(size: usize) -> Vec<u8> {
  iter::repeat(0).take(size).collect()
}

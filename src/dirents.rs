use std::ops::{Range};
use log::{debug, trace};
use crate::decode::{decode_record, next_record};
use crate::defs::{DirentInfo, EntryKind, OwnedDirent};
use crate::error::{Error, ErrorKind, Result};
use crate::filter::{is_visible};
use crate::layout::{CheckedLayout};
use crate::stream::{DirStream};

/// A decoded entry that passed the filter, with its name located in the buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Visible {
  ino: u64,
  kind: EntryKind,
  name: Range<usize>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
  Reading,
  Yielding,
  Done,
  Failed,
}

/// Pull-driven sequence of the entries of one directory.
///
/// Every refill overwrites `buffer`, so an entry returned by `next_entry`
/// borrows the `Dirents` and must be dropped (or copied with
/// `DirentInfo::to_owned_dirent`) before the next pull. A read happens only
/// when the consumer pulls and the current segment has no entries left;
/// once the consumer stops pulling, nothing more is read. The stream is never
/// closed by this type.
///
/// Entries come in the order the OS returns them, which is unspecified.
pub struct Dirents<S, B> {
  stream: S,
  buffer: B,
  layout: CheckedLayout,
  filled: usize,
  pos: usize,
  state: State,
  reads: usize,
}

impl<S: DirStream, B: AsRef<[u8]> + AsMut<[u8]>> Dirents<S, B> {
  /// Checks the host record layout and prepares the sequence. No read is
  /// issued until the first pull.
  #[cfg(any(target_os = "linux", target_os = "android"))]
  pub fn new(stream: S, buffer: B) -> Result<Dirents<S, B>> {
    let layout = CheckedLayout::host()?;
    Ok(Dirents::with_layout(stream, buffer, layout))
  }

  pub fn with_layout(stream: S, buffer: B, layout: CheckedLayout) -> Dirents<S, B> {
    Dirents {
      stream: stream,
      buffer: buffer,
      layout: layout,
      filled: 0,
      pos: 0,
      state: State::Reading,
      reads: 0,
    }
  }

  /// Returns the next entry, `None` at the end of the directory. An error is
  /// returned once; the sequence is over after it.
  pub fn next_entry(&mut self) -> Option<Result<DirentInfo<'_>>> {
    loop {
      match self.state {
        State::Done | State::Failed => return None,
        State::Reading => match self.refill() {
          Ok(0) => {
            debug!("end of directory after {} reads", self.reads);
            self.state = State::Done;
            return None
          },
          Ok(_) => self.state = State::Yielding,
          Err(err) => {
            debug!("directory read failed: {}", err);
            self.state = State::Failed;
            return Some(Err(err))
          },
        },
        State::Yielding => match self.next_visible() {
          Some(visible) => return Some(Ok(DirentInfo {
            ino: visible.ino,
            kind: visible.kind,
            name: &self.buffer.as_ref()[visible.name],
          })),
          None => self.state = State::Reading,
        },
      }
    }
  }

  /// Turns the sequence into an `Iterator` of entries with owned names.
  pub fn into_owned(self) -> OwnedDirents<S, B> {
    OwnedDirents(self)
  }

  /// Number of raw reads issued so far.
  pub fn read_count(&self) -> usize {
    self.reads
  }

  pub fn into_parts(self) -> (S, B) {
    (self.stream, self.buffer)
  }

  fn refill(&mut self) -> Result<usize> {
    self.filled = 0;
    self.pos = 0;
    self.reads += 1;
    let capacity = self.buffer.as_ref().len();
    let n = self.stream.read_dirents(self.buffer.as_mut())?;
    if n > capacity {
      return Err(Error::new(ErrorKind::Read, format!(
        "directory stream reported {} bytes for a {} byte buffer", n, capacity)));
    }
    trace!("read {} bytes of directory entries", n);
    self.filled = n;
    Ok(n)
  }

  fn next_visible(&mut self) -> Option<Visible> {
    let segment = &self.buffer.as_ref()[..self.filled];
    while let Some(record) = next_record(&self.layout, segment, &mut self.pos) {
      let bytes = &segment[record.offset..record.offset + record.len];
      let entry = match decode_record(&self.layout, bytes) {
        Some(entry) => entry,
        None => continue,
      };
      if is_visible(&entry) {
        let start = record.offset + self.layout.layout().name_offset;
        return Some(Visible {
          ino: entry.ino,
          kind: entry.kind,
          name: start..start + entry.name.len(),
        })
      }
    }
    None
  }
}

/// `Dirents` as a standard `Iterator`, copying every name out of the buffer.
pub struct OwnedDirents<S, B>(Dirents<S, B>);

impl<S: DirStream, B: AsRef<[u8]> + AsMut<[u8]>> Iterator for OwnedDirents<S, B> {
  type Item = Result<OwnedDirent>;

  fn next(&mut self) -> Option<Result<OwnedDirent>> {
    self.0.next_entry().map(|res| res.map(|entry| entry.to_owned_dirent()))
  }
}

/// Lists the directory open at `fd`, using `buffer` as the scratch buffer.
///
/// `fd` stays open; closing it is up to the caller.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn dirents<'fd, 'b>(fd: std::os::fd::BorrowedFd<'fd>, buffer: &'b mut [u8])
  -> Result<Dirents<crate::stream::FdDirStream<'fd>, &'b mut [u8]>>
{
  Dirents::new(crate::stream::FdDirStream(fd), buffer)
}

//! Iteration over sources that hand out directory entries in batches.

use std::vec;
use crate::defs::{OwnedDirent};
use crate::dirents::{Dirents};
use crate::error::{Error, Result};
use crate::stream::{DirStream};

/// One batch of entries. `eof` is set on the last batch, which may still hold
/// entries.
#[derive(Debug)]
pub struct Batch<E> {
  pub entries: Vec<E>,
  pub eof: bool,
}

/// A source of already decoded directory entries.
pub trait ReadDirer {
  type Entry;

  /// Reads at most `n` entries, or every remaining entry if `n` is 0.
  fn read_dir(&mut self, n: usize) -> Result<Batch<Self::Entry>>;
}

/// Flattens the batches of a `ReadDirer` into single entries.
///
/// A batch is read only after the previous one was consumed. Iteration ends
/// after a batch with `eof` set, after an empty batch when `n` is 0, or after
/// the first error.
pub struct ReadDirIter<R: ReadDirer> {
  reader: R,
  n: usize,
  pending: vec::IntoIter<R::Entry>,
  finished: bool,
}

impl<R: ReadDirer> ReadDirIter<R> {
  pub fn new(reader: R, n: usize) -> ReadDirIter<R> {
    ReadDirIter {
      reader: reader,
      n: n,
      pending: Vec::new().into_iter(),
      finished: false,
    }
  }

  pub fn into_inner(self) -> R {
    self.reader
  }
}

impl<R: ReadDirer> Iterator for ReadDirIter<R> {
  type Item = Result<R::Entry>;

  fn next(&mut self) -> Option<Result<R::Entry>> {
    loop {
      if let Some(entry) = self.pending.next() {
        return Some(Ok(entry))
      }
      if self.finished {
        return None
      }
      match self.reader.read_dir(self.n) {
        Ok(batch) => {
          if batch.eof || (self.n == 0 && batch.entries.is_empty()) {
            self.finished = true;
          }
          self.pending = batch.entries.into_iter();
        },
        Err(err) => {
          self.finished = true;
          return Some(Err(err))
        },
      }
    }
  }
}

/// Batches of owned entries decoded from a raw directory stream.
///
/// An error met after some entries of a batch were collected is held back and
/// returned by the following call, so no entry is lost.
pub struct DirentBatches<S, B> {
  dirents: Dirents<S, B>,
  deferred: Option<Error>,
}

impl<S: DirStream, B: AsRef<[u8]> + AsMut<[u8]>> DirentBatches<S, B> {
  pub fn new(dirents: Dirents<S, B>) -> DirentBatches<S, B> {
    DirentBatches { dirents: dirents, deferred: None }
  }
}

impl<S: DirStream, B: AsRef<[u8]> + AsMut<[u8]>> ReadDirer for DirentBatches<S, B> {
  type Entry = OwnedDirent;

  fn read_dir(&mut self, n: usize) -> Result<Batch<OwnedDirent>> {
    if let Some(err) = self.deferred.take() {
      return Err(err)
    }

    let mut entries = Vec::new();
    while n == 0 || entries.len() < n {
      match self.dirents.next_entry() {
        Some(Ok(entry)) => entries.push(entry.to_owned_dirent()),
        Some(Err(err)) => {
          if entries.is_empty() {
            return Err(err)
          }
          self.deferred = Some(err);
          return Ok(Batch { entries: entries, eof: false })
        },
        None => return Ok(Batch { entries: entries, eof: true }),
      }
    }
    Ok(Batch { entries: entries, eof: false })
  }
}

//! Decoding of the records in one filled segment of the scratch buffer.

use log::debug;
use crate::defs::{DirentInfo, EntryKind};
use crate::layout::{CheckedLayout};
use crate::read_int::{read_u8, read_u16, read_u64};

/// Position of one record within a filled segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RawRecord {
  pub offset: usize,
  pub len: usize,
}

/// Finds the record starting at `*pos` and moves `*pos` past it.
///
/// A record length of zero, one that runs past the end of the segment, or one
/// too short to hold the fixed fields ends the scan: `*pos` is moved to the end
/// of the segment and `None` is returned. Nothing is reported to the caller.
pub fn next_record(layout: &CheckedLayout, segment: &[u8], pos: &mut usize)
  -> Option<RawRecord>
{
  if *pos >= segment.len() {
    return None
  }

  let rest = &segment[*pos..];
  let reclen = match read_u16(rest, layout.layout().reclen_offset) {
    Some(reclen) => reclen as usize,
    None => {
      debug!("{} trailing bytes at offset {} hold no record length", rest.len(), *pos);
      *pos = segment.len();
      return None
    },
  };

  if reclen == 0 || reclen > rest.len() || reclen < layout.layout().name_offset {
    debug!("truncated directory record at offset {}: reclen {}, {} bytes left",
      *pos, reclen, rest.len());
    *pos = segment.len();
    return None
  }

  let record = RawRecord { offset: *pos, len: reclen };
  *pos += reclen;
  Some(record)
}

/// Decodes the fields of one record. `bytes` must be exactly the record.
pub fn decode_record<'b>(layout: &CheckedLayout, bytes: &'b [u8]) -> Option<DirentInfo<'b>> {
  let layout = layout.layout();
  let ino = read_u64(bytes, layout.ino_offset)?;
  let tag = read_u8(bytes, layout.type_offset)?;
  let name = bytes.get(layout.name_offset..)?;
  let name = match name.iter().position(|&b| b == 0) {
    Some(nul) => &name[..nul],
    None => name,
  };
  Some(DirentInfo { ino: ino, kind: EntryKind::from_raw(tag), name: name })
}

/// Decodes the record at `*pos` and advances past it.
pub fn decode_next<'b>(layout: &CheckedLayout, segment: &'b [u8], pos: &mut usize)
  -> Option<DirentInfo<'b>>
{
  let record = next_record(layout, segment, pos)?;
  decode_record(layout, &segment[record.offset..record.offset + record.len])
}

/// All records of a filled segment, in scan order and unfiltered.
pub struct Records<'b> {
  layout: CheckedLayout,
  segment: &'b [u8],
  pos: usize,
}

pub fn decode_segment<'b>(layout: CheckedLayout, segment: &'b [u8]) -> Records<'b> {
  Records { layout: layout, segment: segment, pos: 0 }
}

impl<'b> Iterator for Records<'b> {
  type Item = DirentInfo<'b>;

  fn next(&mut self) -> Option<DirentInfo<'b>> {
    decode_next(&self.layout, self.segment, &mut self.pos)
  }
}

#[cfg(test)]
pub mod test {
  use crate::defs::{EntryKind};
  use crate::layout::{CheckedLayout, Layout};
  use super::{decode_segment, next_record, RawRecord};

  pub fn layout() -> CheckedLayout {
    Layout::LINUX_DIRENT64.check().unwrap()
  }

  /// Appends one `linux_dirent64` record, NUL padded to 8 bytes like the
  /// kernel does.
  pub fn push_record(buf: &mut Vec<u8>, ino: u64, kind: EntryKind, name: &[u8]) {
    let layout = Layout::LINUX_DIRENT64;
    let reclen = (layout.name_offset + name.len() + 1 + 7) / 8 * 8;
    push_raw(buf, ino, reclen as u16, kind.as_raw(), name, reclen);
  }

  /// Appends `size` bytes laid out as a record with arbitrary field values.
  pub fn push_raw(buf: &mut Vec<u8>, ino: u64, reclen: u16, tag: u8,
    name: &[u8], size: usize)
  {
    let layout = Layout::LINUX_DIRENT64;
    let start = buf.len();
    buf.resize(start + size, 0);
    let rec = &mut buf[start..];
    rec[layout.ino_offset..layout.ino_offset + 8].copy_from_slice(&ino.to_ne_bytes());
    rec[8..16].copy_from_slice(&(start as i64 + size as i64).to_ne_bytes());
    rec[layout.reclen_offset..layout.reclen_offset + 2].copy_from_slice(&reclen.to_ne_bytes());
    rec[layout.type_offset] = tag;
    let name_end = layout.name_offset + name.len();
    rec[layout.name_offset..name_end].copy_from_slice(name);
  }

  fn names(segment: &[u8]) -> Vec<Vec<u8>> {
    decode_segment(layout(), segment).map(|e| e.name.to_vec()).collect()
  }

  #[test]
  fn test_decode_records_in_order() {
    let mut buf = Vec::new();
    push_record(&mut buf, 11, EntryKind::RegularFile, b"alpha");
    push_record(&mut buf, 12, EntryKind::Directory, b"a-much-longer-name-than-eight");
    push_record(&mut buf, 13, EntryKind::Symlink, b"z");

    let entries: Vec<_> = decode_segment(layout(), &buf[..]).collect();
    assert_eq!(entries.len(), 3);
    assert_eq!((entries[0].ino, entries[0].kind, entries[0].name),
      (11, EntryKind::RegularFile, &b"alpha"[..]));
    assert_eq!((entries[1].ino, entries[1].kind, entries[1].name),
      (12, EntryKind::Directory, &b"a-much-longer-name-than-eight"[..]));
    assert_eq!((entries[2].ino, entries[2].kind, entries[2].name),
      (13, EntryKind::Symlink, &b"z"[..]));
  }

  #[test]
  fn test_name_without_nul_runs_to_record_end() {
    let mut buf = Vec::new();
    push_raw(&mut buf, 5, 24, 8, b"abcde", 24);
    assert_eq!(names(&buf[..]), vec![b"abcde".to_vec()]);
  }

  #[test]
  fn test_decoder_does_not_filter() {
    let mut buf = Vec::new();
    push_record(&mut buf, 0, EntryKind::RegularFile, b"gone");
    push_record(&mut buf, 2, EntryKind::Directory, b".");
    assert_eq!(names(&buf[..]), vec![b"gone".to_vec(), b".".to_vec()]);
  }

  #[test]
  fn test_zero_reclen_stops_segment() {
    let mut buf = Vec::new();
    push_record(&mut buf, 1, EntryKind::RegularFile, b"first");
    push_raw(&mut buf, 2, 0, 8, b"broken", 32);
    push_record(&mut buf, 3, EntryKind::RegularFile, b"unreachable");
    assert_eq!(names(&buf[..]), vec![b"first".to_vec()]);
  }

  #[test]
  fn test_oversized_reclen_stops_segment() {
    let mut buf = Vec::new();
    push_record(&mut buf, 1, EntryKind::RegularFile, b"first");
    push_raw(&mut buf, 2, 4000, 8, b"broken", 32);
    assert_eq!(names(&buf[..]), vec![b"first".to_vec()]);
  }

  #[test]
  fn test_reclen_shorter_than_header_stops_segment() {
    let mut buf = Vec::new();
    push_raw(&mut buf, 2, 8, 8, b"", 24);
    assert!(names(&buf[..]).is_empty());
  }

  #[test]
  fn test_trailing_bytes_without_reclen() {
    let mut buf = Vec::new();
    push_record(&mut buf, 1, EntryKind::RegularFile, b"only");
    buf.extend_from_slice(&[0xff; 10]);
    assert_eq!(names(&buf[..]), vec![b"only".to_vec()]);
  }

  #[test]
  fn test_next_record_positions() {
    let mut buf = Vec::new();
    push_record(&mut buf, 1, EntryKind::RegularFile, b"a");
    push_record(&mut buf, 2, EntryKind::RegularFile, b"abcdefghij");
    let layout = layout();
    let mut pos = 0;
    assert_eq!(next_record(&layout, &buf[..], &mut pos), Some(RawRecord { offset: 0, len: 24 }));
    assert_eq!(next_record(&layout, &buf[..], &mut pos), Some(RawRecord { offset: 24, len: 32 }));
    assert_eq!(next_record(&layout, &buf[..], &mut pos), None);
    assert_eq!(pos, buf.len());
  }

  #[test]
  fn test_empty_segment() {
    assert!(names(&[]).is_empty());
  }
}

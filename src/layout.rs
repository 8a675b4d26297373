use crate::error::{Error, ErrorKind, Result};

pub const INO_WIDTH: usize = 8;
pub const RECLEN_WIDTH: usize = 2;
pub const TYPE_WIDTH: usize = 1;

/// Byte offsets and widths of the fields of one directory-entry record.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Layout {
  pub ino_offset: usize,
  pub ino_width: usize,
  pub reclen_offset: usize,
  pub reclen_width: usize,
  pub type_offset: usize,
  pub type_width: usize,
  pub name_offset: usize,
}

/// A `Layout` that passed `Layout::check`. The decoder only accepts these.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CheckedLayout(Layout);

impl Layout {
  /// `struct linux_dirent64`, identical on every Linux architecture.
  pub const LINUX_DIRENT64: Layout = Layout {
    ino_offset: 0,
    ino_width: 8,
    reclen_offset: 16,
    reclen_width: 2,
    type_offset: 18,
    type_width: 1,
    name_offset: 19,
  };

  /// The layout of `libc::dirent64` as compiled for this target.
  #[cfg(any(target_os = "linux", target_os = "android"))]
  pub fn host() -> Layout {
    use std::mem;

    // dirent64 holds only integers and a byte array, so all-zero is valid
    let probe: libc::dirent64 = unsafe { mem::MaybeUninit::zeroed().assume_init() };
    Layout {
      ino_offset: mem::offset_of!(libc::dirent64, d_ino),
      ino_width: mem::size_of_val(&probe.d_ino),
      reclen_offset: mem::offset_of!(libc::dirent64, d_reclen),
      reclen_width: mem::size_of_val(&probe.d_reclen),
      type_offset: mem::offset_of!(libc::dirent64, d_type),
      type_width: mem::size_of_val(&probe.d_type),
      name_offset: mem::offset_of!(libc::dirent64, d_name),
    }
  }

  /// Verifies the field widths the decoder hardcodes, and that every fixed
  /// field lies before the name and does not overlap another one.
  pub fn check(self) -> Result<CheckedLayout> {
    let widths = [
      ("inode", self.ino_width, INO_WIDTH),
      ("record length", self.reclen_width, RECLEN_WIDTH),
      ("type", self.type_width, TYPE_WIDTH),
    ];
    for &(field, width, expected) in widths.iter() {
      if width != expected {
        return Err(violation(format!(
          "{} field is {} bytes wide, expected {}", field, width, expected)));
      }
    }

    let mut fields = [
      ("inode", self.ino_offset, self.ino_offset.saturating_add(INO_WIDTH)),
      ("record length", self.reclen_offset, self.reclen_offset.saturating_add(RECLEN_WIDTH)),
      ("type", self.type_offset, self.type_offset.saturating_add(TYPE_WIDTH)),
    ];
    fields.sort_by_key(|&(_, start, _)| start);
    for pair in fields.windows(2) {
      if pair[0].2 > pair[1].1 {
        return Err(violation(format!(
          "{} field overlaps {} field", pair[0].0, pair[1].0)));
      }
    }
    let (last, _, end) = fields[2];
    if end > self.name_offset {
      return Err(violation(format!(
        "{} field ends at {}, past the name offset {}", last, end, self.name_offset)));
    }

    Ok(CheckedLayout(self))
  }
}

impl CheckedLayout {
  #[cfg(any(target_os = "linux", target_os = "android"))]
  pub fn host() -> Result<CheckedLayout> {
    Layout::host().check()
  }

  pub fn layout(&self) -> &Layout {
    &self.0
  }
}

fn violation(message: String) -> Error {
  Error::new(ErrorKind::LayoutAssumptionViolated,
    format!("Unsupported directory entry layout: {}", message))
}

#[cfg(test)]
mod test {
  use crate::error::{ErrorKind};
  use super::{Layout};

  #[cfg(any(target_os = "linux", target_os = "android"))]
  #[test]
  fn test_host_layout_is_linux_dirent64() {
    assert_eq!(Layout::host(), Layout::LINUX_DIRENT64);
    assert!(Layout::host().check().is_ok());
  }

  #[test]
  fn test_wrong_width_is_rejected() {
    let layout = Layout { ino_width: 4, .. Layout::LINUX_DIRENT64 };
    let err = layout.check().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LayoutAssumptionViolated);

    let layout = Layout { reclen_width: 4, .. Layout::LINUX_DIRENT64 };
    assert_eq!(layout.check().unwrap_err().kind(), ErrorKind::LayoutAssumptionViolated);

    let layout = Layout { type_width: 2, .. Layout::LINUX_DIRENT64 };
    assert_eq!(layout.check().unwrap_err().kind(), ErrorKind::LayoutAssumptionViolated);
  }

  #[test]
  fn test_overlapping_fields_are_rejected() {
    let layout = Layout { reclen_offset: 7, .. Layout::LINUX_DIRENT64 };
    assert_eq!(layout.check().unwrap_err().kind(), ErrorKind::LayoutAssumptionViolated);
  }

  #[test]
  fn test_field_past_name_is_rejected() {
    let layout = Layout { name_offset: 18, .. Layout::LINUX_DIRENT64 };
    assert_eq!(layout.check().unwrap_err().kind(), ErrorKind::LayoutAssumptionViolated);
  }
}

use crate::error::{Result};

/// Source of raw directory-entry records.
pub trait DirStream {
  /// Fills the front of `buffer` with whole records and returns the number of
  /// bytes written. `Ok(0)` means the end of the directory. Each call is a
  /// single attempt; failures are not retried.
  fn read_dirents(&mut self, buffer: &mut [u8]) -> Result<usize>;
}

impl<'a, S: DirStream + ?Sized> DirStream for &'a mut S {
  fn read_dirents(&mut self, buffer: &mut [u8]) -> Result<usize> {
    (**self).read_dirents(buffer)
  }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use self::linux::{FdDirStream, OwnedDirStream};

#[cfg(any(target_os = "linux", target_os = "android"))]
mod linux {
  use std::{fs, io};
  use std::os::fd::{AsRawFd, BorrowedFd, RawFd};
  use crate::error::{Error, ErrorKind, Result};
  use super::{DirStream};

  /// Reads with `getdents64` from a directory descriptor owned by someone else.
  #[derive(Debug)]
  pub struct FdDirStream<'fd>(pub BorrowedFd<'fd>);

  impl<'fd> DirStream for FdDirStream<'fd> {
    fn read_dirents(&mut self, buffer: &mut [u8]) -> Result<usize> {
      getdents64(self.0.as_raw_fd(), buffer)
    }
  }

  /// Reads with `getdents64` from a directory this stream owns and closes.
  #[derive(Debug)]
  pub struct OwnedDirStream(pub fs::File);

  impl DirStream for OwnedDirStream {
    fn read_dirents(&mut self, buffer: &mut [u8]) -> Result<usize> {
      getdents64(self.0.as_raw_fd(), buffer)
    }
  }

  fn getdents64(fd: RawFd, buffer: &mut [u8]) -> Result<usize> {
    let len = buffer.len().min(libc::c_uint::max_value() as usize);
    let ret = unsafe {
      libc::syscall(libc::SYS_getdents64, fd, buffer.as_mut_ptr(), len as libc::c_uint)
    };
    if ret < 0 {
      let cause = io::Error::last_os_error();
      return Err(Error::with_cause(ErrorKind::Read,
        format!("getdents64 on fd {} failed", fd), cause));
    }
    Ok(ret as usize)
  }
}

//! Directory listing straight from the raw `getdents64` record stream.
//!
//! `Dirents` reads directory records into a scratch buffer supplied by the
//! caller, decodes them in place and hands out entries whose names borrow that
//! buffer. `ReadDirIter` and `WalkDir` build plain and recursive iteration on
//! top of it.
pub use defs::{EntryKind, DirentInfo, OwnedDirent, DEFAULT_BUFFER_SIZE, make_buffer};
pub use error::{Error, ErrorKind, Result};
pub use layout::{Layout, CheckedLayout};
pub use decode::{RawRecord, Records, decode_segment};
pub use filter::{is_visible};
pub use stream::{DirStream};
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use stream::{FdDirStream, OwnedDirStream};
pub use dirents::{Dirents, OwnedDirents};
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use dirents::{dirents};
pub use read_dir::{Batch, ReadDirer, ReadDirIter, DirentBatches};
#[cfg(unix)]
pub use walk::{OpenDir, WalkDir, WalkEntry};
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use walk::{FsOpener};

mod decode;
mod defs;
mod dirents;
mod error;
mod filter;
mod layout;
mod read_dir;
mod read_int;
mod stream;
#[cfg(unix)]
mod walk;

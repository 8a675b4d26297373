use crate::defs::{DirentInfo};

/// Whether a decoded record should reach the consumer.
///
/// Records with inode 0 belong to files removed while the directory was being
/// listed. `.` and `..` are never reported.
pub fn is_visible(entry: &DirentInfo) -> bool {
  entry.ino != 0 && entry.name != b"." && entry.name != b".."
}

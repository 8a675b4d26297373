//! Native-endian field reads with bounds checks.
//!
//! Each function returns `None` if the field does not fit into `bytes` at
//! `offset`, so the caller never indexes past the end of a record.

pub fn read_u8(bytes: &[u8], offset: usize) -> Option<u8> {
  bytes.get(offset).cloned()
}

pub fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
  field::<2>(bytes, offset).map(u16::from_ne_bytes)
}

pub fn read_u64(bytes: &[u8], offset: usize) -> Option<u64> {
  field::<8>(bytes, offset).map(u64::from_ne_bytes)
}

fn field<const N: usize>(bytes: &[u8], offset: usize) -> Option<[u8; N]> {
  let end = offset.checked_add(N)?;
  let mut out = [0; N];
  out.copy_from_slice(bytes.get(offset..end)?);
  Some(out)
}

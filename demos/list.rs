extern crate rawdirents;

use std::{env, error, fs, process, str};
use std::os::fd::{AsFd};

fn mein() -> Result<(), rawdirents::Error> {
  let path = env::args().nth(1).unwrap_or_else(|| format!("."));
  let handle = fs::File::open(&path)?;

  let mut buffer = rawdirents::make_buffer(rawdirents::DEFAULT_BUFFER_SIZE);
  let mut dirents = rawdirents::dirents(handle.as_fd(), &mut buffer[..])?;
  while let Some(entry) = dirents.next_entry() {
    let entry = entry?;
    match str::from_utf8(entry.name) {
      Ok(name) => println!("{:>12} {:?} {}", entry.ino, entry.kind, name),
      Err(_) => println!("{:>12} {:?} {:?}", entry.ino, entry.kind, entry.name),
    }
  }
  println!("{} reads", dirents.read_count());
  Ok(())
}

fn main() {
  if let Err(err) = mein() {
    print_error(&err);
    process::exit(1);
  }
}

fn print_error(err: &dyn error::Error) {
  println!("Error: {}", err);
  if let Some(cause) = err.source() {
    print_error(cause);
  }
}

use std::{error, fmt, io, result};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
  /// The raw directory read failed.
  Read,
  /// The host directory-entry layout does not match the decoder.
  LayoutAssumptionViolated,
  /// A directory could not be opened while walking a tree.
  Open,
  Other,
}

#[derive(Debug)]
pub struct Error {
  kind: ErrorKind,
  message: String,
  cause: Option<Box<dyn error::Error + Send + Sync>>,
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
  pub fn new(kind: ErrorKind, message: String) -> Error {
    Error { kind: kind, message: message, cause: None }
  }

  pub fn with_cause<E>(kind: ErrorKind, message: String, cause: E) -> Error
    where E: Into<Box<dyn error::Error + Send + Sync>>
  {
    Error { kind: kind, message: message, cause: Some(cause.into()) }
  }

  pub fn kind(&self) -> ErrorKind {
    self.kind
  }

  /// The OS error number, if this error was caused by a failed system call.
  pub fn raw_os_error(&self) -> Option<i32> {
    self.cause.as_ref()
      .and_then(|e| e.downcast_ref::<io::Error>())
      .and_then(|e| e.raw_os_error())
  }
}

impl error::Error for Error {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    self.cause.as_ref().map(|e| &**e as &(dyn error::Error + 'static))
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&self.message[..])
  }
}

impl From<io::Error> for Error {
  fn from(err: io::Error) -> Error {
    Error::with_cause(ErrorKind::Other, format!("IO error"), err)
  }
}

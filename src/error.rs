//! IMAP message list error types.

use std::io::Error as IoError;
use std::result;
use std::str::Utf8Error;

use thiserror::Error;

use crate::types::MessageId;

/// A convenience wrapper around `Result` for `imap_msglist::Error`.
pub type Result<T> = result::Result<T, Error>;

/// A set of errors that can occur while building or mutating a message list.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An `io::Error` that occurred while trying to read or write to a network stream.
    #[error(transparent)]
    Io(#[from] IoError),
    /// A BAD response from the IMAP server.
    #[error("Bad Response: {0}")]
    Bad(String),
    /// A NO response from the IMAP server.
    #[error("No Response: {0}")]
    No(String),
    /// The connection was terminated unexpectedly.
    #[error("Connection Lost")]
    ConnectionLost,
    /// Error parsing a server response.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Command inputs were not valid [IMAP
    /// strings](https://tools.ietf.org/html/rfc3501#section-4.3).
    #[error(transparent)]
    Validate(#[from] ValidateError),
    /// The sort program names a key the server and the client sorter do not know.
    ///
    /// This is raised when the program is set, never when it is applied.
    #[error(transparent)]
    SortProgram(#[from] SortProgramError),
    /// The requested message is not in the FETCH response. Expunged and
    /// never-existing messages are reported alike.
    #[error("Message {0} not found")]
    MessageNotFound(MessageId),
    /// The message disappeared as a side effect of a flag change.
    #[error("Message {0} was expunged")]
    Expunged(MessageId),
}

/// An error occured while trying to parse a server response.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The client could not find or decode the server's response.
    #[error("Unable to parse response: {}", String::from_utf8_lossy(.0))]
    Invalid(Vec<u8>),
    /// A tagged completion arrived for a command we did not send.
    #[error("Unexpected tag in response: {0}")]
    UnexpectedTag(String),
    /// The server sent text that is not valid UTF-8.
    #[error("Unable to parse data as UTF-8 text")]
    DataNotUtf8(#[source] Utf8Error),
}

/// An [invalid character](https://tools.ietf.org/html/rfc3501#section-4.3) was found in a command
/// argument.
#[derive(Debug, Error)]
#[error("Invalid character in input: {0:?}")]
pub struct ValidateError(pub char);

/// A sort program could not be built from the given keys.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SortProgramError {
    /// The key is not one of ARRIVAL, CC, DATE, FROM, SIZE, SUBJECT, TO.
    #[error("Sort key unknown: {0:?}")]
    UnknownKey(String),
    /// The program has no keys at all.
    #[error("Sort program is empty")]
    Empty,
}

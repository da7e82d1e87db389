//! This module contains types used throughout the message list and its session.

/// From section [2.3.1.1 of RFC 3501](https://tools.ietf.org/html/rfc3501#section-2.3.1.1).
///
/// A 32-bit value assigned to each message. Unique identifiers are assigned in a strictly
/// ascending fashion in the mailbox, are not necessarily contiguous, and will not change during
/// the session.
pub type Uid = u32;

/// From section [2.3.1.2 of RFC 3501](https://tools.ietf.org/html/rfc3501#section-2.3.1.2).
///
/// A relative position from 1 to the number of messages in the mailbox. Message sequence numbers
/// can be reassigned during the session; when a message is expunged, the sequence number of every
/// subsequent message is decremented.
pub type Seq = u32;

/// The identifier a session hands out for messages in the selected folder.
///
/// Whether this is a [`Seq`] or a [`Uid`] is fixed when the session is created and never changes
/// afterwards. Within one folder snapshot it is unique.
pub type MessageId = u32;

mod flag;
pub use self::flag::{Flag, StoreMode};

mod capabilities;
pub use self::capabilities::Capabilities;

mod envelope;
pub use self::envelope::{Address, Envelope};

mod body;
pub use self::body::BodyStructure;

mod fetch;
pub use self::fetch::Fetch;

mod thread;
pub use self::thread::ThreadNode;

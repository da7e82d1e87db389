//! Which listing modes a server can produce itself.
//!
//! Servers may offer SORT ([RFC 5256](https://tools.ietf.org/html/rfc5256#section-3)) and THREAD
//! ([RFC 5256](https://tools.ietf.org/html/rfc5256#section-4)) on top of the baseline SEARCH.
//! Whatever is missing, the message list does on the client:
//!
//! ```text
//! +--------------+-----------------+-----------------+-----------------+-----------------+
//! | Display mode | (none)          | SORT            | THREAD          | SORT THREAD     |
//! +--------------+-----------------+-----------------+-----------------+-----------------+
//! | Threaded     | SEARCH, C sort* | SORT, C thread  | THREAD          | THREAD          |
//! | Sorted       | SEARCH, C sort  | SORT            | SEARCH, C sort  | SORT            |
//! | Unsorted     | SEARCH, C sort  | SORT            | SEARCH, C sort  | SORT            |
//! +--------------+-----------------+-----------------+-----------------+-----------------+
//!  * threaded display is never re-sorted; the client thread keeps the SEARCH order
//! ```

use std::fmt;

use bitflags::bitflags;

use crate::error::Result;
use crate::session::Session;

bitflags! {
    /// The listing modes a server supports natively. [`SearchCapabilities::UNSORTED`] is always
    /// present.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SearchCapabilities: u8 {
        /// SEARCH, part of the base protocol.
        const UNSORTED = 1 << 0;
        /// The SORT extension.
        const SORTED = 1 << 1;
        /// A THREAD extension.
        const THREADED = 1 << 2;
    }
}

/// How the caller wants the list presented.
///
/// The discriminants are the capability bundles each mode builds on: unsorted `1`, sorted `1|2`,
/// threaded `1|2|4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DisplayMode {
    /// Server order (still sorted by the program when SORT is used or no extension is present).
    Unsorted = 1,
    /// Ordered by the sort program.
    Sorted = 3,
    /// Grouped into conversations, indented by reply level.
    Threaded = 7,
}

impl DisplayMode {
    /// The capability bundle this mode corresponds to.
    pub fn capabilities(self) -> SearchCapabilities {
        SearchCapabilities::from_bits_truncate(self as u8)
    }

    /// Map the numeric constants (1, 3, 7) back to a mode.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(DisplayMode::Unsorted),
            3 => Some(DisplayMode::Sorted),
            7 => Some(DisplayMode::Threaded),
            _ => None,
        }
    }
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Sorted
    }
}

/// A [THREAD algorithm](https://tools.ietf.org/html/rfc5256#section-4) a server can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThreadAlgorithm {
    /// Threads by `References` / `In-Reply-To` headers.
    References,
    /// Groups by base subject, then orders by sent date.
    OrderedSubject,
}

impl ThreadAlgorithm {
    /// The capability name advertising this algorithm.
    pub fn capability(self) -> &'static str {
        match self {
            ThreadAlgorithm::References => "THREAD=REFERENCES",
            ThreadAlgorithm::OrderedSubject => "THREAD=ORDEREDSUBJECT",
        }
    }
}

impl fmt::Display for ThreadAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadAlgorithm::References => write!(f, "REFERENCES"),
            ThreadAlgorithm::OrderedSubject => write!(f, "ORDEREDSUBJECT"),
        }
    }
}

/// What a server can do for a message list, worked out once per folder session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListingCapabilities {
    modes: SearchCapabilities,
    thread_algorithm: Option<ThreadAlgorithm>,
}

impl ListingCapabilities {
    /// Baseline capabilities: plain SEARCH only.
    pub fn baseline() -> Self {
        ListingCapabilities {
            modes: SearchCapabilities::UNSORTED,
            thread_algorithm: None,
        }
    }

    /// Build from the presence of the SORT extension and the thread algorithm available, if any.
    pub fn new(sort: bool, thread_algorithm: Option<ThreadAlgorithm>) -> Self {
        let mut modes = SearchCapabilities::UNSORTED;
        modes.set(SearchCapabilities::SORTED, sort);
        modes.set(SearchCapabilities::THREADED, thread_algorithm.is_some());
        ListingCapabilities {
            modes,
            thread_algorithm,
        }
    }

    /// Ask the session which extensions the server has. REFERENCES threading is preferred over
    /// ORDEREDSUBJECT when both are offered.
    pub fn resolve<S: Session + ?Sized>(session: &mut S) -> Result<Self> {
        let sort = session.has_capability("SORT")?;
        let mut thread_algorithm = None;
        for algorithm in [ThreadAlgorithm::References, ThreadAlgorithm::OrderedSubject] {
            if session.has_capability(algorithm.capability())? {
                thread_algorithm = Some(algorithm);
                break;
            }
        }
        let resolved = ListingCapabilities::new(sort, thread_algorithm);
        log::debug!(
            "listing capabilities: {:?}, thread algorithm {:?}",
            resolved.modes,
            resolved.thread_algorithm
        );
        Ok(resolved)
    }

    /// The modes the server supports.
    pub fn modes(&self) -> SearchCapabilities {
        self.modes
    }

    /// Whether the server supports `mode` natively.
    pub fn supports(&self, mode: SearchCapabilities) -> bool {
        self.modes.contains(mode)
    }

    /// The THREAD algorithm to use, if the server can thread.
    pub fn thread_algorithm(&self) -> Option<ThreadAlgorithm> {
        self.thread_algorithm
    }
}

impl Default for ListingCapabilities {
    fn default() -> Self {
        ListingCapabilities::baseline()
    }
}

//! Sort programs for the IMAP SORT extension specified in [RFC
//! 5256](https://tools.ietf.org/html/rfc5256#section-3), and a client-side sorter that applies
//! them when the server lacks the extension.
//!
//! A sort program is an ordered list of sort keys, each of which may be reversed. Programs are
//! written the way users type them, `["-DATE", "FROM"]`, and go on the wire as
//! `(REVERSE DATE FROM)`.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

use crate::error::SortProgramError;
use crate::message::Message;
use crate::types::MessageId;
use crate::utils::iter_join;

/// The defined sort criteria. If the associated header for a particular criterion is absent, it
/// is treated as the empty string. The empty string always collates before non-empty strings.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum SortKey {
    /// Internal date and time of the message.
    Arrival,

    /// Short form of the "cc" addresses.
    Cc,

    /// Sent date and time, falling back to the internal date.
    Date,

    /// Short form of the "From" addresses.
    From,

    /// Size of the message in octets.
    Size,

    /// Subject text.
    Subject,

    /// Short form of the "To" addresses.
    To,
}

impl SortKey {
    /// Every key, in the order RFC 5256 lists them.
    pub const ALL: [SortKey; 7] = [
        SortKey::Arrival,
        SortKey::Cc,
        SortKey::Date,
        SortKey::From,
        SortKey::Size,
        SortKey::Subject,
        SortKey::To,
    ];

    fn extract(self, message: &Message) -> SortValue {
        match self {
            SortKey::Arrival => SortValue::Date(message.internal_date()),
            SortKey::Date => SortValue::Date(message.sent_date()),
            SortKey::Size => SortValue::Number(message.size()),
            SortKey::Subject => SortValue::Text(message.subject().to_string()),
            SortKey::From => SortValue::Text(message.envelope().from_short().join(", ")),
            SortKey::To => SortValue::Text(message.envelope().to_short().join(", ")),
            SortKey::Cc => SortValue::Text(message.envelope().cc_short().join(", ")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SortKey::*;

        match self {
            Arrival => write!(f, "ARRIVAL"),
            Cc => write!(f, "CC"),
            Date => write!(f, "DATE"),
            From => write!(f, "FROM"),
            Size => write!(f, "SIZE"),
            Subject => write!(f, "SUBJECT"),
            To => write!(f, "TO"),
        }
    }
}

impl FromStr for SortKey {
    type Err = SortProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .iter()
            .copied()
            .find(|k| k.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| SortProgramError::UnknownKey(s.to_string()))
    }
}

/// The value a [`SortKey`] extracts from a message for one sort pass.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Date(Option<DateTime<FixedOffset>>),
    Number(u32),
    Text(String),
}

/// One step of a sort program: a key, optionally in reverse (descending) order.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct SortCriterion {
    /// What to sort on.
    pub key: SortKey,
    /// Whether this pass sorts in descending order.
    pub reverse: bool,
}

impl SortCriterion {
    /// An ascending criterion.
    pub fn ascending(key: SortKey) -> Self {
        SortCriterion {
            key,
            reverse: false,
        }
    }

    /// A descending criterion.
    pub fn descending(key: SortKey) -> Self {
        SortCriterion { key, reverse: true }
    }
}

/// Parses the user form, `DATE` or `-date`.
impl FromStr for SortCriterion {
    type Err = SortProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (reverse, name) = match s.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, s),
        };
        if name.is_empty() {
            return Err(SortProgramError::UnknownKey(s.to_string()));
        }
        Ok(SortCriterion {
            key: name
                .parse()
                .map_err(|_| SortProgramError::UnknownKey(s.to_string()))?,
            reverse,
        })
    }
}

/// Wire form, `REVERSE DATE` or `DATE`.
impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reverse {
            write!(f, "REVERSE {}", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// A validated, non-empty sort program.
///
/// Its [`Display`](fmt::Display) is the parenthesized form the SORT command takes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortProgram(Vec<SortCriterion>);

impl SortProgram {
    /// Build a program from user-form keys such as `["-DATE", "from"]`.
    ///
    /// Every key is checked here; an unknown key fails the whole program.
    pub fn parse<I, S>(keys: I) -> Result<Self, SortProgramError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let criteria = keys
            .into_iter()
            .map(|k| k.as_ref().parse())
            .collect::<Result<Vec<SortCriterion>, _>>()?;
        SortProgram::new(criteria)
    }

    /// Build a program from already-typed criteria.
    pub fn new(criteria: Vec<SortCriterion>) -> Result<Self, SortProgramError> {
        if criteria.is_empty() {
            return Err(SortProgramError::Empty);
        }
        Ok(SortProgram(criteria))
    }

    /// The criteria, outermost first.
    pub fn criteria(&self) -> &[SortCriterion] {
        &self.0
    }

    /// Order `ids` by this program.
    ///
    /// When `threaded` is set the input order is returned untouched: thread order is
    /// authoritative and reshuffling it would break the lineage.
    ///
    /// Otherwise every criterion is applied as its own stable sort, last criterion first, so the
    /// first criterion ends up the outermost one. Messages `lookup` knows nothing about sort
    /// before all others.
    pub fn sort<'m, F>(&self, ids: &[MessageId], lookup: F, threaded: bool) -> Vec<MessageId>
    where
        F: Fn(MessageId) -> Option<&'m Message>,
    {
        let mut ids = ids.to_vec();
        if threaded {
            return ids;
        }
        for criterion in self.0.iter().rev() {
            let key = criterion.key;
            let value = |id: &MessageId| lookup(*id).map(|m| key.extract(m));
            if criterion.reverse {
                ids.sort_by_cached_key(|id| Reverse(value(id)));
            } else {
                ids.sort_by_cached_key(value);
            }
        }
        ids
    }
}

impl Default for SortProgram {
    /// Newest first.
    fn default() -> Self {
        SortProgram(vec![SortCriterion::descending(SortKey::Date)])
    }
}

impl fmt::Display for SortProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", iter_join(self.0.iter(), " "))
    }
}

/// The charset argument is mandatory for SORT and THREAD (unlike SEARCH) and indicates the
/// CHARSET of the strings that appear in the searching criteria. The US-ASCII and UTF-8 charsets
/// MUST be implemented. All other charsets are optional.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortCharset<'c> {
    /// Mandatory UTF-8
    Utf8,

    /// Mandatory US-ASCII
    UsAscii,

    /// Optional custom
    Custom(Cow<'c, str>),
}

impl Default for SortCharset<'_> {
    fn default() -> Self {
        SortCharset::Utf8
    }
}

impl<'c> fmt::Display for SortCharset<'c> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SortCharset::*;

        match self {
            Utf8 => write!(f, "UTF-8"),
            UsAscii => write!(f, "US-ASCII"),
            Custom(c) => write!(f, "{}", c),
        }
    }
}

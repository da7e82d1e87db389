use chrono::{DateTime, FixedOffset};
use imap_proto::AttributeValue;

use super::{BodyStructure, Envelope, Flag, Seq, Uid};

/// Format of Internal Date, e.g. `17-Jul-1996 02:44:25 -0700`.
const DATE_TIME_FORMAT: &str = "%d-%b-%Y %H:%M:%S %z";

/// An owned IMAP [`FETCH` response](https://tools.ietf.org/html/rfc3501#section-7.4.2) that
/// contains data about a particular message. This response occurs as the result of a `FETCH` or
/// `STORE` command, as well as by unilateral server decision (e.g., flag updates).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fetch {
    /// The ordinal number of this message in its containing mailbox.
    pub message: Seq,

    /// A number expressing the unique identifier of the message.
    pub uid: Option<Uid>,

    flags: Option<Vec<Flag>>,
    size: Option<u32>,
    internal_date: Option<DateTime<FixedOffset>>,
    envelope: Option<Envelope>,
    body_structure: Option<BodyStructure>,
    sections: Vec<Vec<u8>>,
}

impl Fetch {
    /// An empty response for the message at the given sequence number.
    pub fn new(message: Seq) -> Self {
        Fetch {
            message,
            ..Default::default()
        }
    }

    pub(crate) fn from_attributes(message: Seq, attrs: &[AttributeValue<'_>]) -> Self {
        let mut fetch = Fetch::new(message);
        for attr in attrs {
            match attr {
                AttributeValue::Flags(flags) => {
                    fetch.flags = Some(flags.iter().map(|f| Flag::from(&**f)).collect());
                }
                AttributeValue::Uid(uid) => fetch.uid = Some(*uid),
                AttributeValue::Rfc822Size(sz) => fetch.size = Some(*sz),
                AttributeValue::InternalDate(date) => {
                    fetch.internal_date =
                        DateTime::parse_from_str(date.trim(), DATE_TIME_FORMAT).ok();
                }
                AttributeValue::Envelope(env) => fetch.envelope = Some(Envelope::from(&**env)),
                AttributeValue::BodyStructure(body) => {
                    fetch.body_structure = Some(BodyStructure::from(body));
                }
                AttributeValue::BodySection { data, .. }
                | AttributeValue::Rfc822(data)
                | AttributeValue::Rfc822Header(data)
                | AttributeValue::Rfc822Text(data) => {
                    fetch
                        .sections
                        .push(data.as_ref().map(|d| d.to_vec()).unwrap_or_default());
                }
                _ => {}
            }
        }
        fetch
    }

    /// Set the unique identifier.
    pub fn with_uid(mut self, uid: Uid) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Set the flags.
    pub fn with_flags(mut self, flags: impl IntoIterator<Item = Flag>) -> Self {
        self.flags = Some(flags.into_iter().collect());
        self
    }

    /// Set the `RFC822.SIZE`.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the `INTERNALDATE`.
    pub fn with_internal_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.internal_date = Some(date);
        self
    }

    /// Set the `ENVELOPE`.
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Set the `BODYSTRUCTURE`.
    pub fn with_body_structure(mut self, body: BodyStructure) -> Self {
        self.body_structure = Some(body);
        self
    }

    /// Append a body section payload.
    pub fn with_section(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.sections.push(data.into());
        self
    }

    /// A list of flags that are set for this message, if `FLAGS` was part of the response.
    pub fn flags(&self) -> Option<&[Flag]> {
        self.flags.as_deref()
    }

    /// The size of the message in octets, if `RFC822.SIZE` was part of the response.
    pub fn size(&self) -> Option<u32> {
        self.size
    }

    /// The internal date of the message, if `INTERNALDATE` was part of the response.
    pub fn internal_date(&self) -> Option<DateTime<FixedOffset>> {
        self.internal_date
    }

    /// The envelope of this message, if `ENVELOPE` was part of the response.
    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    /// The body structure of this message, if `BODYSTRUCTURE` was part of the response.
    pub fn body_structure(&self) -> Option<&BodyStructure> {
        self.body_structure.as_ref()
    }

    /// The first body section (`BODY[...]`, `RFC822`, ...) in the response.
    pub fn section(&self) -> Option<&[u8]> {
        self.sections.first().map(|s| &s[..])
    }

    /// Every body section in the response, in order.
    pub fn sections(&self) -> impl Iterator<Item = &[u8]> {
        self.sections.iter().map(|s| &s[..])
    }

    /// Just the sequence number, UID and flags of this response.
    pub(crate) fn flag_state(&self) -> Fetch {
        Fetch {
            message: self.message,
            uid: self.uid,
            flags: self.flags.clone(),
            ..Default::default()
        }
    }

    /// Drop the flags, so that only a newer response can supply them.
    pub(crate) fn forget_flags(&mut self) {
        self.flags = None;
    }

    /// Fold a later response for the same message into this one. Items present in `newer`
    /// replace ours.
    pub(crate) fn merge(&mut self, newer: Fetch) {
        self.message = newer.message;
        self.uid = newer.uid.or(self.uid);
        if newer.flags.is_some() {
            self.flags = newer.flags;
        }
        self.size = newer.size.or(self.size);
        self.internal_date = newer.internal_date.or(self.internal_date);
        if newer.envelope.is_some() {
            self.envelope = newer.envelope;
        }
        if newer.body_structure.is_some() {
            self.body_structure = newer.body_structure;
        }
        if !newer.sections.is_empty() {
            self.sections = newer.sections;
        }
    }
}

//! A single message of a [`MessageList`](crate::MessageList).

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use lazy_static::lazy_static;
use regex::bytes::Regex;

use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{BodyStructure, Envelope, Fetch, Flag, MessageId, Seq, StoreMode, Uid};

lazy_static! {
    static ref REFERENCES_HEADER: Regex =
        Regex::new(r"(?im)^references:((?:[^\r\n]|\r?\n[ \t])*)").unwrap();
    static ref MESSAGE_ID: Regex = Regex::new(r"<[^<>\s]+>").unwrap();
}

/// Extract the message identifiers of a raw `References` header block.
fn parse_references(header: &[u8]) -> Vec<String> {
    REFERENCES_HEADER
        .captures(header)
        .and_then(|c| c.get(1))
        .map(|value| {
            MESSAGE_ID
                .find_iter(value.as_bytes())
                .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// One message's summary data, as fetched for a message list.
///
/// Flags change only through [`set_flags`](Message::set_flags) and
/// [`reset_flags`](Message::reset_flags), which re-read what the server reports afterwards
/// instead of assuming the change took effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    seq: Seq,
    uid: Option<Uid>,
    envelope: Envelope,
    size: u32,
    flags: HashSet<Flag>,
    internal_date: Option<DateTime<FixedOffset>>,
    references: Vec<String>,
    level: usize,
    body_structure: Option<BodyStructure>,
}

impl Message {
    /// Build a message from its FETCH data. `id` is the identifier the session uses for it.
    ///
    /// Items missing from the response are left empty.
    pub fn from_fetch(id: MessageId, fetch: &Fetch) -> Self {
        Message {
            id,
            seq: fetch.message,
            uid: fetch.uid,
            envelope: fetch.envelope().cloned().unwrap_or_default(),
            size: fetch.size().unwrap_or(0),
            flags: fetch.flags().unwrap_or(&[]).iter().cloned().collect(),
            internal_date: fetch.internal_date(),
            references: fetch
                .section()
                .map(parse_references)
                .unwrap_or_default(),
            level: 0,
            body_structure: fetch.body_structure().cloned(),
        }
    }

    /// The session identifier of this message.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// The sequence number when last fetched or stored.
    pub fn seq(&self) -> Seq {
        self.seq
    }

    /// The unique identifier, if the server sent it.
    pub fn uid(&self) -> Option<Uid> {
        self.uid
    }

    /// The parsed header summary.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The subject, or the empty string.
    pub fn subject(&self) -> &str {
        self.envelope.subject.as_deref().unwrap_or("")
    }

    /// The size in octets.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// When the server received the message.
    pub fn internal_date(&self) -> Option<DateTime<FixedOffset>> {
        self.internal_date
    }

    /// When the message was sent according to its `Date` header, or the internal date when that
    /// header is missing or unreadable.
    pub fn sent_date(&self) -> Option<DateTime<FixedOffset>> {
        self.envelope.parsed_date().or(self.internal_date)
    }

    /// Message-IDs from the `References` header, oldest first.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// Thread depth; 0 outside threaded lists.
    pub fn level(&self) -> usize {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: usize) {
        self.level = level;
    }

    /// The flags as last reported by the server.
    pub fn flags(&self) -> &HashSet<Flag> {
        &self.flags
    }

    /// Whether the message carries `flag`.
    pub fn has_flag(&self, flag: &Flag) -> bool {
        self.flags.contains(flag)
    }

    /// `\Seen`
    pub fn is_seen(&self) -> bool {
        self.has_flag(&Flag::Seen)
    }

    /// `\Deleted`
    pub fn is_deleted(&self) -> bool {
        self.has_flag(&Flag::Deleted)
    }

    /// `\Answered`
    pub fn is_answered(&self) -> bool {
        self.has_flag(&Flag::Answered)
    }

    /// `\Flagged`
    pub fn is_flagged(&self) -> bool {
        self.has_flag(&Flag::Flagged)
    }

    /// `\Draft`
    pub fn is_draft(&self) -> bool {
        self.has_flag(&Flag::Draft)
    }

    /// `\Recent`
    pub fn is_recent(&self) -> bool {
        self.has_flag(&Flag::Recent)
    }

    /// Add `flags` on the server, then reload the flags the server reports.
    ///
    /// Fails with [`Error::Expunged`] if the server expunged the message in response.
    pub fn set_flags<S: Session + ?Sized>(&mut self, session: &mut S, flags: &[Flag]) -> Result<()> {
        self.store(session, StoreMode::Add, flags)
    }

    /// Remove `flags` on the server, then reload the flags the server reports.
    ///
    /// Fails with [`Error::Expunged`] if the server expunged the message in response.
    pub fn reset_flags<S: Session + ?Sized>(
        &mut self,
        session: &mut S,
        flags: &[Flag],
    ) -> Result<()> {
        self.store(session, StoreMode::Remove, flags)
    }

    fn store<S: Session + ?Sized>(
        &mut self,
        session: &mut S,
        mode: StoreMode,
        flags: &[Flag],
    ) -> Result<()> {
        // earlier expunges may have moved the message since it was fetched
        let seq = session.seq_of(self.id).unwrap_or(self.seq);
        session.store(self.id, mode, flags)?;

        // some servers (gmail) expunge on flag changes
        if session.is_expunged(seq) {
            log::info!("message {} expunged after STORE {}", self.id, mode);
            session.reset_expunged();
            return Err(Error::Expunged(self.id));
        }

        let reported = session
            .last_fetch(self.id)
            .and_then(|f| f.flags().map(<[Flag]>::to_vec));
        let reported = match reported {
            Some(flags) => flags,
            None => session
                .fetch(&[self.id], "(FLAGS)")?
                .remove(&self.id)
                .and_then(|f| f.flags().map(<[Flag]>::to_vec))
                .ok_or(Error::MessageNotFound(self.id))?,
        };
        self.flags = reported.into_iter().collect();
        self.seq = seq;
        Ok(())
    }

    /// The body structure, fetched from the server on first use.
    pub fn body_structure<S: Session + ?Sized>(&mut self, session: &mut S) -> Result<&BodyStructure> {
        if self.body_structure.is_none() {
            let structure = session
                .fetch(&[self.id], "(BODYSTRUCTURE)")?
                .remove(&self.id)
                .and_then(|f| f.body_structure().cloned())
                .ok_or(Error::MessageNotFound(self.id))?;
            self.body_structure = Some(structure);
        }
        self.body_structure
            .as_ref()
            .ok_or(Error::MessageNotFound(self.id))
    }

    /// Fetch one body section, e.g. `BODY.PEEK[1.2]`, and return it undecoded.
    pub fn fetch_section<S: Session + ?Sized>(&self, session: &mut S, query: &str) -> Result<Vec<u8>> {
        session
            .fetch(&[self.id], query)?
            .remove(&self.id)
            .and_then(|f| f.section().map(<[u8]>::to_vec))
            .ok_or(Error::MessageNotFound(self.id))
    }

    /// The full message source, untreated.
    pub fn source<S: Session + ?Sized>(&self, session: &mut S) -> Result<Vec<u8>> {
        self.fetch_section(session, "BODY.PEEK[]")
    }

    /// The header block of the message, or of the given part (e.g. `"2"` for an attached
    /// message).
    pub fn part_header<S: Session + ?Sized>(
        &self,
        session: &mut S,
        part: Option<&str>,
    ) -> Result<Vec<u8>> {
        let query = match part {
            Some(part) => format!("BODY.PEEK[{}.HEADER]", part),
            None => "BODY.PEEK[HEADER]".to_string(),
        };
        self.fetch_section(session, &query)
    }

    /// The raw content of a body part, e.g. `"1.2"`.
    pub fn part<S: Session + ?Sized>(&self, session: &mut S, part: &str) -> Result<Vec<u8>> {
        self.fetch_section(session, &format!("BODY.PEEK[{}]", part))
    }
}

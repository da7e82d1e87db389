use std::borrow::Cow;

use chrono::{DateTime, FixedOffset};

fn text(bytes: &Option<Cow<'_, [u8]>>) -> Option<String> {
    bytes
        .as_ref()
        .map(|b| String::from_utf8_lossy(b).into_owned())
}

/// One address of an [`Envelope`] address list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Address {
    /// The display name, e.g. `Terry Gray`.
    pub name: Option<String>,
    /// The local part, e.g. `gray`.
    pub mailbox: Option<String>,
    /// The domain, e.g. `cac.washington.edu`.
    pub host: Option<String>,
}

impl Address {
    /// Build an address from its parts.
    pub fn new(name: Option<&str>, mailbox: &str, host: &str) -> Self {
        Address {
            name: name.map(String::from),
            mailbox: Some(mailbox.to_string()),
            host: Some(host.to_string()),
        }
    }

    /// `mailbox@host`, or just whichever half is present.
    pub fn email(&self) -> String {
        match (&self.mailbox, &self.host) {
            (Some(m), Some(h)) => format!("{}@{}", m, h),
            (Some(m), None) => m.clone(),
            (None, Some(h)) => h.clone(),
            (None, None) => String::new(),
        }
    }

    /// The short display form: the display name when there is one, the address otherwise.
    pub fn short(&self) -> String {
        match self.name {
            Some(ref n) if !n.trim().is_empty() => n.clone(),
            _ => self.email(),
        }
    }
}

impl<'a> From<&imap_proto::Address<'a>> for Address {
    fn from(a: &imap_proto::Address<'a>) -> Self {
        Address {
            name: text(&a.name),
            mailbox: text(&a.mailbox),
            host: text(&a.host),
        }
    }
}

/// The [envelope structure](https://tools.ietf.org/html/rfc3501#section-7.4.2) of a message: the
/// parsed summary of its main header fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Envelope {
    /// The raw `Date` header.
    pub date: Option<String>,
    /// The raw `Subject` header.
    pub subject: Option<String>,
    /// The `From` addresses.
    pub from: Vec<Address>,
    /// The `To` addresses.
    pub to: Vec<Address>,
    /// The `Cc` addresses.
    pub cc: Vec<Address>,
    /// The `In-Reply-To` header.
    pub in_reply_to: Option<String>,
    /// The `Message-ID` header.
    pub message_id: Option<String>,
}

impl Envelope {
    /// The `Date` header parsed as an RFC 2822 date, if it is one.
    pub fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        self.date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
    }

    /// Short forms of the `From` addresses.
    pub fn from_short(&self) -> Vec<String> {
        self.from.iter().map(Address::short).collect()
    }

    /// Short forms of the `To` addresses.
    pub fn to_short(&self) -> Vec<String> {
        self.to.iter().map(Address::short).collect()
    }

    /// Short forms of the `Cc` addresses.
    pub fn cc_short(&self) -> Vec<String> {
        self.cc.iter().map(Address::short).collect()
    }
}

impl<'a> From<&imap_proto::Envelope<'a>> for Envelope {
    fn from(e: &imap_proto::Envelope<'a>) -> Self {
        let addresses = |list: &Option<Vec<imap_proto::Address<'a>>>| {
            list.iter().flatten().map(Address::from).collect()
        };
        Envelope {
            date: text(&e.date),
            subject: text(&e.subject),
            from: addresses(&e.from),
            to: addresses(&e.to),
            cc: addresses(&e.cc),
            in_reply_to: text(&e.in_reply_to),
            message_id: text(&e.message_id),
        }
    }
}

//! Paginated, sorted and threaded message lists over IMAP.
//!
//! IMAP servers differ in which listing extensions they offer: some can only `SEARCH`, others
//! add [`SORT`](https://tools.ietf.org/html/rfc5256#section-3) and
//! [`THREAD`](https://tools.ietf.org/html/rfc5256#section-4). A [`MessageList`] asks the server
//! once what it supports, picks the best command for the requested [`DisplayMode`], and does the
//! rest on the client, so the caller sees the same paginated view whichever path produced it.
//!
//! The list talks to the server through the [`Session`] trait. [`Client`] implements it over any
//! `Read + Write` stream; bring your own TCP or TLS connection.
//!
//! # Usage
//!
//! ```no_run
//! use std::net::TcpStream;
//! use imap_msglist::{Client, DisplayMode, ListConfig, MessageList, PageSize};
//!
//! fn main() -> imap_msglist::Result<()> {
//!     let stream = TcpStream::connect(("localhost", 143))?;
//!     let mut client = Client::with_uids(stream);
//!     client.read_greeting()?;
//!     client.login("username", "password")?;
//!     client.select("INBOX")?;
//!
//!     let config = ListConfig::default()
//!         .page_size(PageSize::from_raw(20))
//!         .display_mode(DisplayMode::Threaded)
//!         .sort_program(["-DATE"])?;
//!     let mut list = MessageList::with_config(client, "INBOX", config);
//!
//!     println!(
//!         "{} messages, page {} of {}",
//!         list.message_count()?,
//!         list.current_page(),
//!         list.paginator().max_page()
//!     );
//!     for message in list.page_messages()? {
//!         let seen = if message.is_seen() { ' ' } else { '*' };
//!         println!("{}{}{}", seen, "  ".repeat(message.level()), message.subject());
//!     }
//!
//!     list.next_page()?;
//!     list.into_session().logout()
//! }
//! ```

mod parse;
mod types;
mod utils;

pub mod capability;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod message_list;
pub mod paginator;
pub mod session;
pub mod sort;
pub mod thread;

pub use crate::capability::{DisplayMode, ListingCapabilities, SearchCapabilities, ThreadAlgorithm};
pub use crate::client::Client;
pub use crate::config::ListConfig;
pub use crate::error::{Error, Result};
pub use crate::message::Message;
pub use crate::message_list::{Listing, MessageList, MetadataEntry};
pub use crate::paginator::{PageSize, Paginator};
pub use crate::session::Session;
pub use crate::sort::{SortCharset, SortCriterion, SortKey, SortProgram};
pub use crate::types::*;

#[cfg(any(test, feature = "test_helpers"))]
pub mod testing;

#[cfg(test)]
mod mock_stream;

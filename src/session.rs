//! The IMAP operations a [`MessageList`](crate::MessageList) needs from its transport.
//!
//! A session is one selected folder on one connection. Commands are strictly sequential: every
//! method returns only once the server has completed the command, so no implementation ever has
//! two commands in flight.

use std::collections::HashMap;

use crate::error::Result;
use crate::types::{Fetch, Flag, MessageId, Seq, StoreMode, ThreadNode};

/// A selected-folder IMAP session.
///
/// All [`MessageId`]s passed in and handed out are in one identifier space, sequence numbers or
/// UIDs, chosen when the session is created.
pub trait Session {
    /// Whether the server advertises the named capability, e.g. `SORT` or `THREAD=REFERENCES`.
    fn has_capability(&mut self, name: &str) -> Result<bool>;

    /// Run `SEARCH <query>` and return the matching messages in server order.
    fn search(&mut self, query: &str) -> Result<Vec<MessageId>>;

    /// Run `SORT <criteria> <charset> <query>`, `criteria` being a parenthesized sort program such
    /// as `(REVERSE DATE FROM)`.
    fn sort(&mut self, criteria: &str, charset: &str, query: &str) -> Result<Vec<MessageId>>;

    /// Run `THREAD <algorithm> <charset> <query>` and return the nested thread list.
    fn thread(&mut self, algorithm: &str, charset: &str, query: &str) -> Result<Vec<ThreadNode>>;

    /// Fetch `query` for every message in `ids` in a single command.
    ///
    /// Messages the server does not report on (e.g. because they were expunged meanwhile) are
    /// absent from the returned map; that is not an error.
    fn fetch(&mut self, ids: &[MessageId], query: &str) -> Result<HashMap<MessageId, Fetch>>;

    /// Run `STORE <id> <mode> (<flags>)`.
    fn store(&mut self, id: MessageId, mode: StoreMode, flags: &[Flag]) -> Result<()>;

    /// The most recent flag state the server sent about `id`, by any command.
    ///
    /// Only the sequence number, UID and flags are kept; bodies are never remembered.
    fn last_fetch(&self, id: MessageId) -> Option<&Fetch>;

    /// The sequence number `id` has now, following any expunges since it was fetched.
    fn seq_of(&self, id: MessageId) -> Option<Seq> {
        self.last_fetch(id).map(|f| f.message)
    }

    /// Sequence numbers the server has reported as expunged since the last
    /// [`reset_expunged`](Session::reset_expunged).
    fn expunged(&self) -> &[Seq];

    /// Whether the message at `seq` has been reported as expunged.
    fn is_expunged(&self, seq: Seq) -> bool {
        self.expunged().contains(&seq)
    }

    /// Forget all expunge notifications.
    fn reset_expunged(&mut self);
}

impl<S: Session + ?Sized> Session for &mut S {
    fn has_capability(&mut self, name: &str) -> Result<bool> {
        (**self).has_capability(name)
    }

    fn search(&mut self, query: &str) -> Result<Vec<MessageId>> {
        (**self).search(query)
    }

    fn sort(&mut self, criteria: &str, charset: &str, query: &str) -> Result<Vec<MessageId>> {
        (**self).sort(criteria, charset, query)
    }

    fn thread(&mut self, algorithm: &str, charset: &str, query: &str) -> Result<Vec<ThreadNode>> {
        (**self).thread(algorithm, charset, query)
    }

    fn fetch(&mut self, ids: &[MessageId], query: &str) -> Result<HashMap<MessageId, Fetch>> {
        (**self).fetch(ids, query)
    }

    fn store(&mut self, id: MessageId, mode: StoreMode, flags: &[Flag]) -> Result<()> {
        (**self).store(id, mode, flags)
    }

    fn last_fetch(&self, id: MessageId) -> Option<&Fetch> {
        (**self).last_fetch(id)
    }

    fn seq_of(&self, id: MessageId) -> Option<Seq> {
        (**self).seq_of(id)
    }

    fn expunged(&self) -> &[Seq] {
        (**self).expunged()
    }

    fn reset_expunged(&mut self) {
        (**self).reset_expunged()
    }
}

//! Enable the test_helpers feature to expose an in-memory [`Session`] for testing code that
//! drives a [`MessageList`](crate::MessageList) without a server.
//!
//! To use add a dev-dependency on this crate with the feature "test_helpers"
//! e.g.
//!
//! ```toml
//! [dependencies]
//! imap-msglist = { version = "0.1" }
//!
//! [dev-dependencies]
//! # mirror the same configuration your dependencies and add test_helpers
//! imap-msglist = { version = "0.1", features = ["test_helpers"] }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{Capabilities, Fetch, Flag, MessageId, Seq, StoreMode, ThreadNode};
use crate::utils::{iter_join, sequence_set};

/// A scripted folder that answers [`Session`] calls from memory and records the command line
/// each call would have sent.
///
/// Messages are keyed by their UID when the [`Fetch`] has one, by sequence number otherwise.
/// Expunging a message moves the sequence numbers of the later ones down, as a server would.
/// `SEARCH` answers every message in key order whatever the query; `SORT` and `THREAD` answer
/// whatever was scripted with [`MockSession::with_sort_result`] and
/// [`MockSession::with_thread_result`].
#[derive(Debug, Default)]
pub struct MockSession {
    capabilities: Capabilities,
    messages: BTreeMap<MessageId, Fetch>,
    sort_result: Option<Vec<MessageId>>,
    thread_result: Option<Vec<ThreadNode>>,
    commands: Vec<String>,
    cache: HashMap<MessageId, Fetch>,
    expunged: Vec<Seq>,
    expunge_on_store: HashSet<MessageId>,
    ignore_stores: bool,
    fail: Option<String>,
}

impl MockSession {
    /// An empty folder on a server with no extensions.
    pub fn new() -> Self {
        MockSession::default()
    }

    /// Advertise these capabilities.
    pub fn with_capabilities<I, S>(mut self, caps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.capabilities = caps.into_iter().collect();
        self
    }

    /// Add messages to the folder.
    pub fn with_messages(mut self, fetches: impl IntoIterator<Item = Fetch>) -> Self {
        for fetch in fetches {
            self.add_message(fetch);
        }
        self
    }

    /// Answer `SORT` with these identifiers.
    pub fn with_sort_result(mut self, ids: Vec<MessageId>) -> Self {
        self.sort_result = Some(ids);
        self
    }

    /// Answer `THREAD` with this thread list.
    pub fn with_thread_result(mut self, threads: Vec<ThreadNode>) -> Self {
        self.thread_result = Some(threads);
        self
    }

    /// Add one message to the folder.
    pub fn add_message(&mut self, fetch: Fetch) {
        let id = fetch.uid.unwrap_or(fetch.message);
        self.messages.insert(id, fetch);
    }

    /// Remove a message from the folder without telling anyone, as another client would.
    pub fn remove_message(&mut self, id: MessageId) -> Option<Fetch> {
        self.messages.remove(&id)
    }

    /// Make `STORE` on `id` expunge the message and report it.
    pub fn expunge_on_store(&mut self, id: MessageId) {
        self.expunge_on_store.insert(id);
    }

    /// Accept `STORE` commands without changing anything or reporting flags back.
    pub fn ignore_stores(&mut self) {
        self.ignore_stores = true;
    }

    /// Fail the next command whose line starts with `prefix` (e.g. `"FETCH"`) with a NO response.
    pub fn fail_on(&mut self, prefix: &str) {
        self.fail = Some(prefix.to_string());
    }

    /// Every command line sent so far.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Forget the recorded command lines.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    fn run(&mut self, command: String) -> Result<()> {
        let failing = matches!(self.fail, Some(ref prefix) if command.starts_with(prefix.as_str()));
        self.commands.push(command);
        if failing {
            self.fail = None;
            return Err(Error::No("command failed".to_string()));
        }
        Ok(())
    }
}

impl Session for MockSession {
    fn has_capability(&mut self, name: &str) -> Result<bool> {
        Ok(self.capabilities.has(name))
    }

    fn search(&mut self, query: &str) -> Result<Vec<MessageId>> {
        self.run(format!("SEARCH {}", query))?;
        Ok(self.messages.keys().copied().collect())
    }

    fn sort(&mut self, criteria: &str, charset: &str, query: &str) -> Result<Vec<MessageId>> {
        self.run(format!("SORT {} {} {}", criteria, charset, query))?;
        Ok(self
            .sort_result
            .clone()
            .unwrap_or_else(|| self.messages.keys().copied().collect()))
    }

    fn thread(&mut self, algorithm: &str, charset: &str, query: &str) -> Result<Vec<ThreadNode>> {
        self.run(format!("THREAD {} {} {}", algorithm, charset, query))?;
        Ok(self.thread_result.clone().unwrap_or_else(|| {
            self.messages
                .keys()
                .map(|&id| ThreadNode::branch([id]))
                .collect()
        }))
    }

    fn fetch(&mut self, ids: &[MessageId], query: &str) -> Result<HashMap<MessageId, Fetch>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.run(format!("FETCH {} {}", sequence_set(ids), query))?;
        let found: HashMap<MessageId, Fetch> = ids
            .iter()
            .filter_map(|id| self.messages.get(id).map(|f| (*id, f.clone())))
            .collect();
        for (id, fetch) in &found {
            self.cache.insert(*id, fetch.flag_state());
        }
        Ok(found)
    }

    fn store(&mut self, id: MessageId, mode: StoreMode, flags: &[Flag]) -> Result<()> {
        self.run(format!("STORE {} {} ({})", id, mode, iter_join(flags, " ")))?;
        if self.ignore_stores {
            return Ok(());
        }
        if self.expunge_on_store.remove(&id) {
            if let Some(gone) = self.messages.remove(&id) {
                self.cache.remove(&id);
                self.expunged.push(gone.message);
                let later = self
                    .messages
                    .values_mut()
                    .chain(self.cache.values_mut())
                    .filter(|f| f.message > gone.message);
                for fetch in later {
                    fetch.message -= 1;
                }
            }
            return Ok(());
        }
        if let Some(fetch) = self.messages.get_mut(&id) {
            let mut current: Vec<Flag> = fetch.flags().unwrap_or(&[]).to_vec();
            match mode {
                StoreMode::Add => {
                    for flag in flags {
                        if !current.contains(flag) {
                            current.push(flag.clone());
                        }
                    }
                }
                StoreMode::Remove => current.retain(|f| !flags.contains(f)),
            }
            let reply = Fetch::new(fetch.message).with_flags(current);
            fetch.merge(reply.clone());
            self.cache.entry(id).or_insert_with(|| Fetch::new(reply.message)).merge(reply);
        }
        Ok(())
    }

    fn last_fetch(&self, id: MessageId) -> Option<&Fetch> {
        self.cache.get(&id)
    }

    fn seq_of(&self, id: MessageId) -> Option<Seq> {
        self.messages.get(&id).map(|f| f.message)
    }

    fn expunged(&self) -> &[Seq] {
        &self.expunged
    }

    fn reset_expunged(&mut self) {
        self.expunged.clear();
    }
}

//! The paginated, sorted or threaded view of one folder.

use std::collections::HashMap;
use std::sync::Arc;

use crate::capability::{DisplayMode, ListingCapabilities, SearchCapabilities};
use crate::config::ListConfig;
use crate::error::{Error, Result};
use crate::message::Message;
use crate::paginator::{PageSize, Paginator};
use crate::session::Session;
use crate::sort::{SortCharset, SortProgram};
use crate::thread;
use crate::types::{Flag, MessageId, ThreadNode};

/// Everything a list row needs: the envelope, size, flags, arrival time and the References header
/// for threading.
pub const METADATA_QUERY: &str =
    "(UID ENVELOPE RFC822.SIZE FLAGS INTERNALDATE BODY.PEEK[HEADER.FIELDS (REFERENCES)])";

/// Thread bookkeeping and fetched data for one listed message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataEntry {
    children: Vec<MessageId>,
    parent: Option<MessageId>,
    level: usize,
    data: Option<Message>,
}

impl MetadataEntry {
    /// Messages drawn directly under this one.
    pub fn children(&self) -> &[MessageId] {
        &self.children
    }

    /// The message this one is drawn under.
    pub fn parent(&self) -> Option<MessageId> {
        self.parent
    }

    /// Thread depth, 0 outside threaded lists.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The fetched message. `None` for messages outside the fetched page, and for messages that
    /// vanished between listing and fetching.
    pub fn message(&self) -> Option<&Message> {
        self.data.as_ref()
    }
}

/// One refresh worth of results.
///
/// A listing is never changed while someone else holds it: [`MessageList::refresh`] builds a new
/// one and swaps it in, so a [`snapshot`](MessageList::snapshot) stays consistent.
#[derive(Clone, Debug, Default)]
pub struct Listing {
    flat: Vec<MessageId>,
    page: Vec<MessageId>,
    entries: HashMap<MessageId, MetadataEntry>,
    threads: Option<Vec<ThreadNode>>,
    server_paginated: bool,
}

impl Listing {
    /// Every matching message, in display order.
    pub fn ids(&self) -> &[MessageId] {
        &self.flat
    }

    /// The messages on the current page, in display order.
    pub fn page(&self) -> &[MessageId] {
        &self.page
    }

    /// The number of matching messages, across all pages.
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// The entry for `id`, if it is part of the listing.
    pub fn entry(&self, id: MessageId) -> Option<&MetadataEntry> {
        self.entries.get(&id)
    }

    /// The fetched message for `id`.
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.entry(id).and_then(MetadataEntry::message)
    }

    /// The fetched messages of the current page. Messages that could not be fetched are skipped.
    pub fn page_messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.page.iter().filter_map(move |id| self.message(*id))
    }

    /// The nested thread list, in threaded display.
    pub fn threads(&self) -> Option<&[ThreadNode]> {
        self.threads.as_deref()
    }
}

/// Which command produced the flat list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Search,
    Sort,
    Thread,
}

/// A paginated view of the messages of one selected folder.
///
/// The list works out once which of SEARCH, SORT and THREAD the server offers, and fills in on
/// the client whatever is missing, so every [`DisplayMode`] behaves the same whichever path
/// produced it.
///
/// Changing the search, sort program, display mode or page only marks the list dirty; nothing is
/// sent until [`refresh`](MessageList::refresh) (or an accessor that needs fresh data) runs.
///
/// ```no_run
/// # use imap_msglist::{Client, MessageList, DisplayMode};
/// # fn run(stream: std::net::TcpStream) -> imap_msglist::error::Result<()> {
/// let mut client = Client::with_uids(stream);
/// client.read_greeting()?;
/// client.login("username", "password")?;
/// client.select("INBOX")?;
///
/// let mut list = MessageList::new(client, "INBOX");
/// list.set_sort_program(["-DATE", "FROM"])?;
/// list.set_display_mode(DisplayMode::Threaded);
/// for message in list.page_messages()? {
///     println!("{}{}", "  ".repeat(message.level()), message.subject());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MessageList<S: Session> {
    session: S,
    folder: String,
    search: String,
    sort_program: SortProgram,
    charset: SortCharset<'static>,
    display_mode: DisplayMode,
    capabilities: Option<ListingCapabilities>,
    paginator: Paginator,
    listing: Arc<Listing>,
    refreshed: bool,
    dirty: bool,
    page_dirty: bool,
}

impl<S: Session> MessageList<S> {
    /// A list of `folder` with the default [`ListConfig`]. `session` must have the folder selected.
    pub fn new(session: S, folder: impl Into<String>) -> Self {
        MessageList::with_config(session, folder, ListConfig::default())
    }

    /// A list of `folder` with the given options.
    pub fn with_config(session: S, folder: impl Into<String>, config: ListConfig) -> Self {
        let (page_size, sort_program, search, charset, display_mode) = config.into_parts();
        MessageList {
            session,
            folder: folder.into(),
            search,
            sort_program,
            charset,
            display_mode,
            capabilities: None,
            paginator: Paginator::new(page_size),
            listing: Arc::default(),
            refreshed: false,
            dirty: true,
            page_dirty: false,
        }
    }

    /// The folder name.
    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Give back the session.
    pub fn into_session(self) -> S {
        self.session
    }

    /// What the server can do for this list, asked once and remembered.
    pub fn capabilities(&mut self) -> Result<ListingCapabilities> {
        if let Some(caps) = self.capabilities {
            return Ok(caps);
        }
        let caps = ListingCapabilities::resolve(&mut self.session)?;
        self.capabilities = Some(caps);
        Ok(caps)
    }

    /// Forget the remembered capabilities, e.g. after the session reconnected.
    pub fn invalidate_capabilities(&mut self) {
        self.capabilities = None;
        self.dirty = true;
    }

    pub fn search_expression(&self) -> &str {
        &self.search
    }

    /// Only list messages matching `search`, e.g. `UNSEEN`.
    pub fn set_search_expression(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.search {
            self.search = search;
            self.dirty = true;
        }
    }

    pub fn sort_program(&self) -> &SortProgram {
        &self.sort_program
    }

    /// Sort by `keys`, e.g. `["-DATE", "FROM"]`.
    ///
    /// An unknown key fails right here with [`Error::SortProgram`], before anything is sent, and
    /// leaves the current program in place.
    pub fn set_sort_program<I, K>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let program = SortProgram::parse(keys)?;
        if program != self.sort_program {
            self.sort_program = program;
            self.dirty = true;
        }
        Ok(())
    }

    pub fn charset(&self) -> &SortCharset<'static> {
        &self.charset
    }

    /// The charset sent with SORT and THREAD.
    pub fn set_charset(&mut self, charset: SortCharset<'static>) {
        if charset != self.charset {
            self.charset = charset;
            self.dirty = true;
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn set_display_mode(&mut self, display_mode: DisplayMode) {
        if display_mode != self.display_mode {
            self.display_mode = display_mode;
            self.dirty = true;
        }
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn page_size(&self) -> PageSize {
        self.paginator.page_size()
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        if page_size != self.paginator.page_size() {
            self.paginator.set_page_size(page_size);
            self.page_dirty = true;
        }
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    /// Go to `page`, snapped into the valid range.
    ///
    /// The first call refreshes the list so that the page is checked against the real message
    /// count rather than an empty one.
    pub fn set_page(&mut self, page: usize) -> Result<()> {
        if !self.refreshed {
            self.refresh()?;
        }
        if self.paginator.set_current_page(page) {
            self.page_dirty = true;
        }
        Ok(())
    }

    /// Go to the next page, or back to the first from the last.
    pub fn next_page(&mut self) -> Result<()> {
        if !self.refreshed {
            self.refresh()?;
        }
        let page = self.paginator.next();
        self.set_page(page)
    }

    /// Go to the previous page, or on to the last from the first.
    pub fn previous_page(&mut self) -> Result<()> {
        if !self.refreshed {
            self.refresh()?;
        }
        let page = self.paginator.previous();
        self.set_page(page)
    }

    /// Whether the next [`refresh`](MessageList::refresh) will do any work.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.page_dirty
    }

    /// Mark the list stale so the next [`refresh`](MessageList::refresh) asks the server again.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// The number of matching messages, listing the folder first if that has not happened yet.
    pub fn message_count(&mut self) -> Result<usize> {
        if !self.refreshed {
            self.refresh()?;
        }
        Ok(self.paginator.message_count())
    }

    pub fn have_messages(&mut self) -> Result<bool> {
        Ok(self.message_count()? > 0)
    }

    /// The messages of the current page, refreshing first if anything changed.
    pub fn page_messages(&mut self) -> Result<impl Iterator<Item = &Message> + '_> {
        self.refresh()?;
        Ok(self.listing.page_messages())
    }

    /// The current listing. It stays valid, if stale, across later refreshes.
    pub fn snapshot(&self) -> Arc<Listing> {
        Arc::clone(&self.listing)
    }

    /// The entry for `id` in the current listing.
    pub fn entry(&self, id: MessageId) -> Option<&MetadataEntry> {
        self.listing.entry(id)
    }

    /// Fetch a single message, listed or not.
    pub fn get_message(&mut self, id: MessageId) -> Result<Message> {
        let fetch = self
            .session
            .fetch(&[id], METADATA_QUERY)?
            .remove(&id)
            .ok_or(Error::MessageNotFound(id))?;
        let mut message = Message::from_fetch(id, &fetch);
        if let Some(entry) = self.listing.entry(id) {
            message.set_level(entry.level);
        }
        Ok(message)
    }

    /// Add `flags` to the listed message `id`. See [`Message::set_flags`].
    pub fn set_flags(&mut self, id: MessageId, flags: &[Flag]) -> Result<()> {
        self.mutate_flags(id, flags, true)
    }

    /// Remove `flags` from the listed message `id`. See [`Message::reset_flags`].
    pub fn reset_flags(&mut self, id: MessageId, flags: &[Flag]) -> Result<()> {
        self.mutate_flags(id, flags, false)
    }

    fn mutate_flags(&mut self, id: MessageId, flags: &[Flag], add: bool) -> Result<()> {
        let listing = Arc::make_mut(&mut self.listing);
        let message = listing
            .entries
            .get_mut(&id)
            .and_then(|e| e.data.as_mut())
            .ok_or(Error::MessageNotFound(id))?;
        let result = if add {
            message.set_flags(&mut self.session, flags)
        } else {
            message.reset_flags(&mut self.session, flags)
        };
        if let Err(Error::Expunged(_)) = result {
            self.dirty = true;
        }
        result
    }

    /// Bring the listing up to date with the current search, sort program, display mode and page.
    ///
    /// Does nothing when nothing changed since the last refresh. A page change alone only
    /// re-windows the listing, unless the page was cut out by the server's SORT, in which case
    /// the new page is fetched.
    pub fn refresh(&mut self) -> Result<()> {
        if !self.dirty && self.page_dirty && !self.listing.server_paginated {
            log::debug!("{}: re-windowing page {}", self.folder, self.current_page());
            let page = self.paginator.apply(&self.listing.flat).to_vec();
            Arc::make_mut(&mut self.listing).page = page;
            self.page_dirty = false;
            return Ok(());
        }
        if !self.dirty && !self.page_dirty {
            return Ok(());
        }

        let caps = self.capabilities()?;
        let charset = self.charset.to_string();
        let threaded = self.display_mode == DisplayMode::Threaded;

        let (source, mut flat, mut threads) = match caps.thread_algorithm() {
            Some(algorithm) if threaded && caps.supports(SearchCapabilities::THREADED) => {
                log::debug!("{}: THREAD {} {}", self.folder, algorithm, self.search);
                let threads = self
                    .session
                    .thread(&algorithm.to_string(), &charset, &self.search)?;
                (Source::Thread, thread::flatten(&threads), Some(threads))
            }
            _ if caps.supports(SearchCapabilities::SORTED) => {
                log::debug!("{}: SORT {} {}", self.folder, self.sort_program, self.search);
                let ids = self.session.sort(
                    &self.sort_program.to_string(),
                    &charset,
                    &self.search,
                )?;
                (Source::Sort, ids, None)
            }
            _ => {
                log::debug!("{}: SEARCH {}", self.folder, self.search);
                (Source::Search, self.session.search(&self.search)?, None)
            }
        };

        self.paginator.set_message_count(flat.len());
        let server_paginated = source == Source::Sort;
        let to_fetch = if server_paginated {
            self.paginator.apply(&flat).to_vec()
        } else {
            flat.clone()
        };

        let mut entries: HashMap<MessageId, MetadataEntry> = flat
            .iter()
            .map(|&id| (id, MetadataEntry::default()))
            .collect();

        let mut fetched = self.session.fetch(&to_fetch, METADATA_QUERY)?;
        let mut missing = 0;
        for id in &to_fetch {
            match fetched.remove(id) {
                Some(fetch) => {
                    if let Some(entry) = entries.get_mut(id) {
                        entry.data = Some(Message::from_fetch(*id, &fetch));
                    }
                }
                None => missing += 1,
            }
        }
        if missing > 0 {
            log::warn!(
                "{}: {} of {} messages missing from FETCH response",
                self.folder,
                missing,
                to_fetch.len()
            );
        }

        if threaded && threads.is_none() {
            let ids = if server_paginated { &to_fetch } else { &flat };
            threads = Some(thread::client_thread(ids));
        }
        if let Some(ref threads) = threads {
            annotate(&mut entries, threads);
        }

        if source != Source::Sort {
            flat = self
                .sort_program
                .sort(&flat, |id| entries.get(&id).and_then(MetadataEntry::message), threaded);
        }

        let page = if server_paginated {
            to_fetch
        } else {
            self.paginator.apply(&flat).to_vec()
        };

        self.listing = Arc::new(Listing {
            flat,
            page,
            entries,
            threads,
            server_paginated,
        });
        self.refreshed = true;
        self.dirty = false;
        self.page_dirty = false;
        Ok(())
    }
}

/// Record each threaded message's level and parent, and link it into its parent's children.
fn annotate(entries: &mut HashMap<MessageId, MetadataEntry>, threads: &[ThreadNode]) {
    for position in thread::positions(threads) {
        if let Some(entry) = entries.get_mut(&position.id) {
            entry.level = position.level;
            entry.parent = position.parent;
            if let Some(ref mut message) = entry.data {
                message.set_level(position.level);
            }
        }
        if let Some(parent) = position.parent.and_then(|p| entries.get_mut(&p)) {
            if !parent.children.contains(&position.id) {
                parent.children.push(position.id);
            }
        }
    }
}

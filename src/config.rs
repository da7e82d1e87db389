//! Per-folder listing options.

use crate::capability::DisplayMode;
use crate::error::Result;
use crate::paginator::PageSize;
use crate::sort::{SortCharset, SortProgram};

/// The options a [`MessageList`](crate::MessageList) starts out with.
///
/// ```
/// # use imap_msglist::{ListConfig, DisplayMode, PageSize};
/// let config = ListConfig::default()
///     .page_size(PageSize::from_raw(25))
///     .search("UNSEEN")
///     .display_mode(DisplayMode::Threaded)
///     .sort_program(["SUBJECT", "-DATE"])
///     .unwrap();
/// assert_eq!(config.get_sort_program().to_string(), "(SUBJECT REVERSE DATE)");
/// ```
#[derive(Clone, Debug)]
pub struct ListConfig {
    page_size: PageSize,
    sort_program: SortProgram,
    search: String,
    charset: SortCharset<'static>,
    display_mode: DisplayMode,
}

impl Default for ListConfig {
    /// 50 messages per page, newest first, all messages, UTF-8, sorted display.
    fn default() -> Self {
        ListConfig {
            page_size: PageSize::default(),
            sort_program: SortProgram::default(),
            search: "ALL".to_string(),
            charset: SortCharset::Utf8,
            display_mode: DisplayMode::Sorted,
        }
    }
}

impl ListConfig {
    /// Messages per page.
    pub fn page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sort by `keys`, e.g. `["-DATE", "FROM"]`.
    ///
    /// Fails with [`Error::SortProgram`](crate::error::Error::SortProgram) on an unknown key.
    pub fn sort_program<I, S>(mut self, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sort_program = SortProgram::parse(keys)?;
        Ok(self)
    }

    /// The search expression, e.g. `UNSEEN FROM "bob"`.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// The charset sent with SORT and THREAD.
    pub fn charset(mut self, charset: SortCharset<'static>) -> Self {
        self.charset = charset;
        self
    }

    /// How the list is presented.
    pub fn display_mode(mut self, display_mode: DisplayMode) -> Self {
        self.display_mode = display_mode;
        self
    }

    pub fn get_page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn get_sort_program(&self) -> &SortProgram {
        &self.sort_program
    }

    pub fn get_search(&self) -> &str {
        &self.search
    }

    pub fn get_charset(&self) -> &SortCharset<'static> {
        &self.charset
    }

    pub fn get_display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        PageSize,
        SortProgram,
        String,
        SortCharset<'static>,
        DisplayMode,
    ) {
        (
            self.page_size,
            self.sort_program,
            self.search,
            self.charset,
            self.display_mode,
        )
    }
}

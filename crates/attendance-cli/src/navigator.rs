//! Bidirectional browsing over a forward-only cursor.
//!
//! The server only ever hands out a cursor for the page after the one just
//! returned. Going back is done by remembering the cursor that fetched each
//! earlier page on a LIFO history stack and re-issuing it.

use async_trait::async_trait;

use attendance_core::result::AppResult;
use attendance_core::types::{Page, PageCursor};

/// Something that can fetch one page given an optional cursor.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Row: Send;

    /// Fetch the page `cursor` points at; `None` is the first page.
    async fn fetch(&self, cursor: Option<&PageCursor>) -> AppResult<Page<Self::Row>>;
}

/// Next/previous/reset over a [`PageSource`].
///
/// A failed fetch leaves the navigator exactly where it was.
pub struct CursorNavigator<S: PageSource> {
    source: S,
    /// Cursor that fetched the page on display (`None` for the first page).
    current: Option<PageCursor>,
    /// Cursor for the following page, as returned by the last fetch.
    next: Option<PageCursor>,
    /// Cursors of the pages before the current one, most recent last.
    history: Vec<Option<PageCursor>>,
    rows: Vec<S::Row>,
}

impl<S: PageSource> CursorNavigator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: None,
            next: None,
            history: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Rows of the page on display.
    pub fn rows(&self) -> &[S::Row] {
        &self.rows
    }

    /// 1-based position of the page on display.
    pub fn page_number(&self) -> usize {
        self.history.len() + 1
    }

    /// Whether there is an earlier page to return to.
    pub fn has_prev(&self) -> bool {
        !self.history.is_empty()
    }

    /// Whether the server offered a following page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Forget all history and load the first page.
    pub async fn reset(&mut self) -> AppResult<()> {
        let page = self.source.fetch(None).await?;
        self.history.clear();
        self.current = None;
        self.show(page);
        Ok(())
    }

    /// Advance one page. Returns `false` without fetching when there is no
    /// following page.
    pub async fn go_next(&mut self) -> AppResult<bool> {
        let Some(target) = self.next.clone() else {
            return Ok(false);
        };
        let page = self.source.fetch(Some(&target)).await?;
        self.history.push(self.current.replace(target));
        self.show(page);
        Ok(true)
    }

    /// Step back one page. On the first page this is a no-op returning
    /// `false`.
    pub async fn go_prev(&mut self) -> AppResult<bool> {
        let Some(target) = self.history.last().cloned() else {
            return Ok(false);
        };
        let page = self.source.fetch(target.as_ref()).await?;
        self.history.pop();
        self.current = target;
        self.show(page);
        Ok(true)
    }

    fn show(&mut self, page: Page<S::Row>) {
        self.next = page.next_cursor;
        self.rows = page.rows;
    }
}

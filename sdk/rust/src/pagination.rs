//! Lazy, bidirectional view over a paged GitHub resource.
//!
//! A [`PaginatedList`] holds exactly one [`Page`] at a time and follows the
//! page's `first`/`prev`/`next`/`last` links on demand. It behaves like an
//! ordered sequence (iteration, indexing, reversal, length) while only
//! fetching the pages it needs.
//!
//! Every operation that may cross a page boundary is `async` and issues one
//! request per page moved. Nothing is cached: `count()` walks every page,
//! and re-entering iteration seeks back to the first (or last) page.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::stream::{self, Stream};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::RawResponse;
use crate::link::{parse_link_header, Links, Relation};
use crate::transport::HttpTransport;

/// Conversion from a raw JSON item into the element type of a list.
pub trait FromJson: Sized {
    fn from_json(transport: &Arc<HttpTransport>, value: Value) -> Self;
}

impl FromJson for Value {
    fn from_json(_transport: &Arc<HttpTransport>, value: Value) -> Self {
        value
    }
}

/// One batch of items plus the links the server advertised for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    items: Vec<Value>,
    links: Links,
}

impl Page {
    pub fn new(items: Vec<Value>, links: Links) -> Self {
        Self { items, links }
    }

    /// Build a page from a listing response: a JSON array body and an
    /// optional `link` header.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if the body is not a JSON array.
    pub fn from_response(response: &RawResponse) -> Result<Self> {
        let items: Vec<Value> = response.json()?;
        let links = parse_link_header(response.header("link"));
        Ok(Self { items, links })
    }

    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[must_use]
    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Request path for a relation, if advertised.
    #[must_use]
    pub fn link(&self, relation: Relation) -> Option<&str> {
        self.links.get(&relation).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Forward,
    Backward,
}

impl Step {
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Page to seek when iteration starts.
    fn origin(self) -> Relation {
        match self {
            Self::Forward => Relation::First,
            Self::Backward => Relation::Last,
        }
    }

    /// Page to move to when the current one runs out.
    fn onward(self) -> Relation {
        match self {
            Self::Forward => Relation::Next,
            Self::Backward => Relation::Prev,
        }
    }
}

/// A paged remote collection, traversed one page at a time.
///
/// The cursor is kept in `0..=page.len()`. Moving forward it is the index of
/// the next item to yield; moving backward it is one past that index.
pub struct PaginatedList<T> {
    transport: Arc<HttpTransport>,
    page: Page,
    cursor: usize,
    step: Step,
    entered: bool,
    exhausted: bool,
    _item: PhantomData<fn() -> T>,
}

impl<T: FromJson> PaginatedList<T> {
    /// Create a forward list seeded with its first fetched page. No I/O.
    pub fn new(transport: Arc<HttpTransport>, page: Page) -> Self {
        Self::with_step(transport, page, Step::Forward)
    }

    pub fn with_step(transport: Arc<HttpTransport>, page: Page, step: Step) -> Self {
        Self {
            transport,
            page,
            cursor: 0,
            step,
            entered: false,
            exhausted: false,
            _item: PhantomData,
        }
    }

    /// Fetch the first page of `path` and wrap it in a list.
    ///
    /// # Errors
    ///
    /// Propagates any error from the first request.
    pub async fn fetch(
        transport: Arc<HttpTransport>,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Self> {
        let page = transport.get_page(path, query).await?;
        Ok(Self::new(transport, page))
    }

    /// Start (or restart) iteration.
    ///
    /// Seeks the `first` page when stepping forward, the `last` page when
    /// stepping backward, and places the cursor at that page's boundary.
    /// An empty origin page leaves the list exhausted, the same as an empty
    /// page met mid-traversal. Costs one request unless the list already
    /// sits on that page.
    ///
    /// # Errors
    ///
    /// Propagates any error from the page fetch.
    pub async fn rewind(&mut self) -> Result<()> {
        self.move_to(self.step.origin()).await?;
        self.cursor = match self.step {
            Step::Forward => 0,
            Step::Backward => self.page.len(),
        };
        self.entered = true;
        self.exhausted = self.page.is_empty();
        Ok(())
    }

    /// Yield the next item in the list's direction, or `None` once exhausted.
    ///
    /// The first call enters iteration (see [`rewind`](Self::rewind)).
    /// A freshly fetched empty page ends the traversal even if it advertises
    /// a further page.
    ///
    /// # Errors
    ///
    /// Propagates errors from page fetches. Items already yielded stay valid.
    pub async fn next_item(&mut self) -> Result<Option<T>> {
        if !self.entered {
            self.rewind().await?;
        }
        if self.exhausted {
            return Ok(None);
        }

        let index = match self.step {
            Step::Forward => {
                if self.cursor >= self.page.len() && !self.cross_boundary().await? {
                    return Ok(None);
                }
                self.cursor += 1;
                self.cursor - 1
            }
            Step::Backward => {
                if self.cursor == 0 && !self.cross_boundary().await? {
                    return Ok(None);
                }
                self.cursor -= 1;
                self.cursor
            }
        };

        let value = self.page.items[index].clone();
        Ok(Some(T::from_json(&self.transport, value)))
    }

    /// Move to the adjacent page in the step direction and place the cursor
    /// at its near boundary. Returns `false` (and marks the list exhausted)
    /// when there is no such page or it is empty.
    async fn cross_boundary(&mut self) -> Result<bool> {
        if !self.move_to(self.step.onward()).await? || self.page.is_empty() {
            self.exhausted = true;
            return Ok(false);
        }
        self.cursor = match self.step {
            Step::Forward => 0,
            Step::Backward => self.page.len(),
        };
        Ok(true)
    }

    /// Random access.
    ///
    /// Non-negative indices count from the start of the `first` page,
    /// negative ones from the end of the `last` page (`-1` is the last item).
    /// Walks one page per request; leaves the list on the page holding the
    /// item, so the next `next_item()` restarts iteration.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfRange` if the pages run out first.
    pub async fn get(&mut self, index: isize) -> Result<T> {
        self.entered = false;
        let out_of_range = || Error::IndexOutOfRange { index };

        let offset = if index >= 0 {
            let mut k = index.unsigned_abs();
            self.move_to(Relation::First).await?;
            while k >= self.page.len() {
                if self.page.is_empty() {
                    return Err(out_of_range());
                }
                k -= self.page.len();
                if !self.move_to(Relation::Next).await? {
                    return Err(out_of_range());
                }
            }
            k
        } else {
            let mut k = index.unsigned_abs();
            self.move_to(Relation::Last).await?;
            while k > self.page.len() {
                if self.page.is_empty() {
                    return Err(out_of_range());
                }
                k -= self.page.len();
                if !self.move_to(Relation::Prev).await? {
                    return Err(out_of_range());
                }
            }
            self.page.len() - k
        };

        let value = self.page.items[offset].clone();
        Ok(T::from_json(&self.transport, value))
    }

    /// Total number of items, summed over every page from `first`.
    ///
    /// One request per page; the result is not cached.
    ///
    /// # Errors
    ///
    /// Propagates errors from page fetches.
    pub async fn count(&mut self) -> Result<usize> {
        self.entered = false;
        self.move_to(Relation::First).await?;
        let mut total = self.page.len();
        while !self.page.is_empty() && self.move_to(Relation::Next).await? {
            total += self.page.len();
        }
        Ok(total)
    }

    /// A copy traversing in the opposite direction.
    ///
    /// Shares the transport but not the page or cursor; no request is made
    /// until the copy is first used.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            page: self.page.clone(),
            cursor: self.cursor,
            step: self.step.reversed(),
            entered: false,
            exhausted: false,
            _item: PhantomData,
        }
    }

    /// Restart iteration and drain every remaining item.
    ///
    /// # Errors
    ///
    /// Propagates errors from page fetches.
    pub async fn collect_all(&mut self) -> Result<Vec<T>> {
        self.rewind().await?;
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Consume the list as a stream starting from a fresh iteration.
    ///
    /// The stream ends after the first error.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<T>> {
        self.entered = false;
        stream::try_unfold(self, |mut list| async move {
            Ok(list.next_item().await?.map(|item| (item, list)))
        })
    }

    /// Jump to the `first` page. Returns whether a page was fetched.
    ///
    /// # Errors
    ///
    /// Propagates errors from the page fetch.
    pub async fn first_page(&mut self) -> Result<bool> {
        self.jump(Relation::First).await
    }

    /// Jump to the `last` page.
    ///
    /// # Errors
    ///
    /// Propagates errors from the page fetch.
    pub async fn last_page(&mut self) -> Result<bool> {
        self.jump(Relation::Last).await
    }

    /// Jump to the `next` page.
    ///
    /// # Errors
    ///
    /// Propagates errors from the page fetch.
    pub async fn next_page(&mut self) -> Result<bool> {
        self.jump(Relation::Next).await
    }

    /// Jump to the `prev` page.
    ///
    /// # Errors
    ///
    /// Propagates errors from the page fetch.
    pub async fn prev_page(&mut self) -> Result<bool> {
        self.jump(Relation::Prev).await
    }

    async fn jump(&mut self, relation: Relation) -> Result<bool> {
        let moved = self.move_to(relation).await?;
        if moved {
            self.entered = false;
        }
        Ok(moved)
    }
}

impl<T> PaginatedList<T> {
    /// Replace the current page with the one behind `relation`.
    /// No-op returning `false` when the relation is not advertised.
    async fn move_to(&mut self, relation: Relation) -> Result<bool> {
        let Some(path) = self.page.link(relation).map(str::to_string) else {
            return Ok(false);
        };
        tracing::debug!(%relation, path = %path, "Fetching page");
        self.page = self.transport.get_page(&path, &[]).await?;
        Ok(true)
    }

    /// No `prev` page: the current page is the first.
    #[must_use]
    pub fn at_start(&self) -> bool {
        self.page.link(Relation::Prev).is_none()
    }

    /// No `next` page: the current page is the last.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.page.link(Relation::Next).is_none()
    }

    #[must_use]
    pub fn current_page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<HttpTransport> {
        &self.transport
    }
}

impl<T> fmt::Debug for PaginatedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedList")
            .field("page_len", &self.page.len())
            .field("links", &self.page.links)
            .field("cursor", &self.cursor)
            .field("step", &self.step)
            .field("entered", &self.entered)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

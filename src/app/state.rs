//! Menu state and the derived values it caches.
//!
//! [`Menu`] owns the single [`MenuContext`], the generation counter that
//! invalidates cached derivations, the cursor/offset/query triple and the
//! hold flag. Input handling lives in [`handler`](super::handler) and
//! selection settlement in [`selection`](super::selection); this module holds
//! the state itself plus the render entry point.
//!
//! # Derived values
//!
//! - **Caption**: `caption(context)`, memoized on the generation. The context
//!   is only ever replaced together with a generation bump, so the generation
//!   identifies the context the caption was computed from.
//! - **Filtered items**: `filter(items, query)`, memoized on
//!   `(items, query, generation)`. Items compare by identity; the generation
//!   forces a recompute after every selection even when the list itself is
//!   unchanged, since filtering may depend on caller state.

use super::memo::{Computation, Memoized};
use super::modes::HoldState;
use crate::domain::{Derived, ItemList, MenuContext, MenuError, MenuItem, Output, Result};
use crate::ui::renderer::Frame;
use crate::ui::window::Window;
use crate::Config;
use futures_util::future::LocalBoxFuture;
use std::fmt;
use std::rc::Rc;

/// Rows per page when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Query prompt when none is configured.
pub const DEFAULT_PROMPT: &str = "$";

/// Produces the caption shown under the list.
pub type CaptionFn<S> = Box<dyn FnMut(&MenuContext<S>) -> Derived<String>>;

/// Narrows the item list for a query. Matching semantics are entirely the
/// caller's.
pub type FilterFn<S> = Box<dyn FnMut(&ItemList<S>, &str) -> ItemList<S>>;

/// Runtime options for a [`Menu`].
pub struct MenuOptions<S> {
    /// Rows per page, indicators included.
    pub page_size: usize,
    /// Text shown before the query.
    pub prompt: String,
    /// Caption source; no caption block is drawn without one.
    pub caption: Option<CaptionFn<S>>,
    /// Filter; the query box is hidden and typing ignored without one.
    pub filter: Option<FilterFn<S>>,
}

impl<S> MenuOptions<S> {
    /// Seeds page size and prompt from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.page_size.max(1),
            prompt: config.prompt.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn caption<F>(mut self, caption: F) -> Self
    where
        F: FnMut(&MenuContext<S>) -> Derived<String> + 'static,
    {
        self.caption = Some(Box::new(caption));
        self
    }

    #[must_use]
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: FnMut(&ItemList<S>, &str) -> ItemList<S> + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }
}

impl<S> Default for MenuOptions<S> {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            prompt: DEFAULT_PROMPT.to_string(),
            caption: None,
            filter: None,
        }
    }
}

/// Caption function paired with its cache.
pub(crate) struct Caption<S> {
    source: CaptionFn<S>,
    /// Keyed on the generation only: the context is never replaced without a
    /// generation bump, so the generation stands for the context.
    memo: Memoized<u64, String>,
}

impl<S> Caption<S> {
    pub(crate) fn call(&mut self, context: &MenuContext<S>, generation: u64) -> Computation<String> {
        let source = &mut self.source;
        self.memo.call(generation, |_| source(context))
    }
}

/// Filter function paired with its cache.
pub(crate) struct Filter<S> {
    source: FilterFn<S>,
    memo: Memoized<(ItemList<S>, String, u64), ItemList<S>>,
}

impl<S> Filter<S> {
    fn call(&mut self, items: &ItemList<S>, query: &str, generation: u64) -> Computation<ItemList<S>> {
        let source = &mut self.source;
        self.memo.call((items.clone(), query.to_string(), generation), |(items, query, _)| {
            Derived::Ready(source(items, query.as_str()))
        })
    }
}

/// A selection action that has been started but not yet settled.
pub(crate) type InFlight<S> = LocalBoxFuture<'static, crate::domain::SelectResult<S>>;

/// The menu engine.
///
/// Owns one context at a time and re-renders it on every accepted input. See
/// the [crate documentation](crate) for the overall control flow.
pub struct Menu<S> {
    pub(crate) page_size: usize,
    pub(crate) prompt: String,

    pub(crate) context: MenuContext<S>,
    pub(crate) generation: u64,

    pub(crate) caption: Option<Caption<S>>,
    pub(crate) filter: Option<Filter<S>>,

    pub(crate) query: String,
    pub(crate) cursor: usize,
    pub(crate) offset: usize,
    pub(crate) window: Window,

    pub(crate) hold: HoldState,
    pub(crate) in_flight: Option<InFlight<S>>,
}

impl<S: 'static> Menu<S> {
    /// Creates a menu over `items`, drawing to `output`.
    pub fn new(
        output: Output,
        items: Vec<Rc<dyn MenuItem<S>>>,
        state: S,
        options: MenuOptions<S>,
    ) -> Self {
        let MenuOptions {
            page_size,
            prompt,
            caption,
            filter,
        } = options;

        tracing::debug!(
            item_count = items.len(),
            page_size = page_size,
            has_caption = caption.is_some(),
            has_filter = filter.is_some(),
            "menu created"
        );

        Self {
            page_size: page_size.max(1),
            prompt,
            context: MenuContext::new(output, ItemList::new(items), state),
            generation: 0,
            caption: caption.map(|source| Caption {
                source,
                memo: Memoized::new(),
            }),
            filter: filter.map(|source| Filter {
                source,
                memo: Memoized::new(),
            }),
            query: String::new(),
            cursor: 0,
            offset: 0,
            window: Window::compute(0, 0, page_size, 0),
            hold: HoldState::Idle,
            in_flight: None,
        }
    }

    /// The current context.
    #[must_use]
    pub const fn context(&self) -> &MenuContext<S> {
        &self.context
    }

    /// Number of selections that have settled so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Cursor index into the filtered items, as of the last render.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// First row of the page, as of the last render.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Window computed by the last render.
    #[must_use]
    pub const fn window(&self) -> Window {
        self.window
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns `true` while a selection action is in flight.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.hold.is_held()
    }

    /// Returns `true` if a filter was configured and the query box is shown.
    #[must_use]
    pub const fn is_filtering(&self) -> bool {
        self.filter.is_some()
    }

    /// The last settled caption.
    ///
    /// Returns `Ok(None)` when no caption function is configured or the
    /// latest caption is still being computed.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Uninitialized`](crate::MenuError::Uninitialized)
    /// if a caption function is configured but has never been invoked.
    pub fn caption(&self) -> Result<Option<String>> {
        self.caption
            .as_ref()
            .map_or(Ok(None), |caption| caption.memo.current())
    }

    /// Invokes the caption derivation for the current context and generation.
    pub(crate) fn refresh_caption(&mut self) -> Option<Computation<String>> {
        let caption = self.caption.as_mut()?;
        Some(caption.call(&self.context, self.generation))
    }

    /// Items after applying the filter, or all items without one.
    pub fn filtered_items(&mut self) -> ItemList<S> {
        let Some(filter) = self.filter.as_mut() else {
            return self.context.items.clone();
        };
        filter
            .call(&self.context.items, &self.query, self.generation)
            .settled()
            .unwrap_or_else(|| self.context.items.clone())
    }

    /// Redraws the menu.
    ///
    /// Skipped while a selection is in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the caption cache was never primed or the output
    /// sink rejects the frame.
    pub fn refresh(&mut self) -> Result<()> {
        if self.hold.is_held() {
            return Ok(());
        }

        let items = self.filtered_items();
        self.window = Window::compute(self.cursor, self.offset, self.page_size, items.len());
        self.cursor = self.window.cursor;
        self.offset = self.window.offset;

        let caption = self.caption()?;

        let frame = Frame {
            items: &items,
            window: self.window,
            query: &self.query,
            caption: caption.as_deref(),
            message: self.context.message.as_deref(),
            prompt: self.filter.as_ref().map(|_| self.prompt.as_str()),
        };
        frame.draw(&self.context.output)
    }

    /// Redraws the menu, discarding any failure.
    ///
    /// Reading the caption before it was ever computed is logged at `warn`,
    /// every other failure at `debug`.
    pub(crate) fn refresh_no_throw(&mut self) {
        match self.refresh() {
            Ok(()) => {}
            Err(MenuError::Uninitialized) => {
                tracing::warn!("render skipped, caption read before it was computed");
            }
            Err(e) => tracing::debug!(error = %e, "render failed"),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Menu<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("page_size", &self.page_size)
            .field("prompt", &self.prompt)
            .field("context", &self.context)
            .field("generation", &self.generation)
            .field("query", &self.query)
            .field("cursor", &self.cursor)
            .field("offset", &self.offset)
            .field("hold", &self.hold)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handler::{InputEvent, Key};
    use crate::domain::{CaptureBuffer, Selection};
    use futures::executor::block_on;
    use futures::stream;
    use std::cell::RefCell;
    use std::io::{self, Write};

    struct Label(&'static str);

    impl MenuItem<()> for Label {
        fn render(&self) -> String {
            self.0.to_string()
        }

        fn select(&self, _context: &MenuContext<()>) -> Selection<()> {
            Selection::Ready(Ok(None))
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("terminal gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("terminal gone"))
        }
    }

    fn labels(names: &[&'static str]) -> Vec<Rc<dyn MenuItem<()>>> {
        names
            .iter()
            .map(|name| Rc::new(Label(*name)) as Rc<dyn MenuItem<()>>)
            .collect()
    }

    fn keys(keys: Vec<Key>) -> impl futures::Stream<Item = InputEvent> + Unpin {
        stream::iter(keys.into_iter().map(InputEvent::Key))
    }

    #[test]
    fn filter_runs_once_per_items_query_and_generation() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&calls);
        let options = MenuOptions::default().filter(move |items: &ItemList<()>, query: &str| {
            log.borrow_mut().push(query.to_string());
            items
                .iter()
                .filter(|item| item.render().starts_with(query))
                .cloned()
                .collect()
        });
        let items = labels(&["alpha", "beta", "gamma"]);
        let mut menu = Menu::new(Output::new(CaptureBuffer::new()), items, (), options);

        block_on(menu.listen(keys(vec![
            Key::Down,
            Key::Up,
            Key::Text("b".to_string()),
            Key::Down,
            Key::Backspace,
            Key::Enter,
            Key::Down,
        ])));

        assert_eq!(*calls.borrow(), vec!["", "b", "", ""]);
        assert_eq!(menu.generation(), 1);
    }

    #[test]
    fn failing_output_does_not_stop_input() {
        let items = labels(&["alpha", "beta", "gamma"]);
        let mut menu = Menu::new(Output::new(Broken), items, (), MenuOptions::default());

        assert!(matches!(menu.refresh(), Err(MenuError::Io(_))));

        block_on(menu.listen(keys(vec![Key::Down, Key::Down, Key::Enter, Key::Up])));

        assert_eq!(menu.cursor(), 1);
        assert_eq!(menu.generation(), 1);
        assert!(!menu.is_held());
    }

    #[test]
    fn render_before_caption_is_computed_reports_uninitialized() {
        let options = MenuOptions::default()
            .caption(|_context: &MenuContext<()>| Derived::Ready("caption".to_string()));
        let buffer = CaptureBuffer::new();
        let mut menu = Menu::new(Output::new(buffer.clone()), labels(&["alpha"]), (), options);

        assert!(matches!(menu.refresh(), Err(MenuError::Uninitialized)));
        assert!(matches!(menu.caption(), Err(MenuError::Uninitialized)));
        assert_eq!(buffer.contents(), "");

        menu.refresh_caption();
        menu.refresh().unwrap();

        assert_eq!(buffer.last_frame(), "> alpha\n\ncaption\n\n");
    }
}

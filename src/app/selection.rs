//! Selection invocation and the input loop.
//!
//! Confirming an item puts the menu on hold and starts the item's action.
//! The action settles in one of three ways, and each ends the same way:
//!
//! 1. `Ok(None)`: the context is kept.
//! 2. `Ok(Some(context))`: the context is replaced wholesale.
//! 3. `Err(e)`: `e` is rendered to text and becomes the status message.
//!
//! Then the generation is bumped, the caption is recomputed for the new
//! generation (and awaited if it is asynchronous), the hold is released, the
//! query is cleared and the menu is redrawn. Input that arrives at any point
//! during this sequence is discarded.

use super::handler::InputEvent;
use super::memo::Computation;
use super::modes::HoldState;
use super::state::Menu;
use crate::domain::{Derived, MenuItem, SelectResult};
use futures_util::future::{self, Either, FutureExt};
use futures_util::stream::{Stream, StreamExt};
use std::future::Future;

impl<S: 'static> Menu<S> {
    /// Puts the menu on hold and starts `item`'s action.
    pub(crate) fn begin_selection(&mut self, item: &dyn MenuItem<S>) {
        self.hold = HoldState::Held;
        self.in_flight = Some(match item.select(&self.context) {
            Derived::Ready(result) => future::ready(result).boxed_local(),
            Derived::Pending(pending) => pending,
        });
    }

    /// Applies a settled action's outcome and bumps the generation.
    ///
    /// Returns the caption computation for the new generation. The hold is
    /// still in place when this returns.
    fn apply_selection(&mut self, result: SelectResult<S>) -> Option<Computation<String>> {
        match result {
            Ok(Some(context)) => {
                tracing::debug!(item_count = context.items.len(), "selection replaced context");
                self.context = context;
            }
            Ok(None) => tracing::debug!("selection kept context"),
            Err(e) => {
                tracing::debug!(error = %e, "selection failed");
                self.context.message = Some(e.to_string());
            }
        }

        self.generation += 1;
        self.refresh_caption()
    }

    /// Lifts the hold, clears the query and redraws.
    fn release(&mut self) {
        self.hold = HoldState::Idle;
        self.query.clear();
        tracing::debug!(generation = self.generation, "selection settled");
        self.refresh_no_throw();
    }

    /// Drives the in-flight selection, if any, to completion without reading
    /// further input.
    pub async fn settle(&mut self) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        let result = in_flight.await;
        if let Some(caption) = self.apply_selection(result) {
            caption.resolve().await;
        }
        self.release();
    }

    /// Runs the menu until `events` ends.
    ///
    /// Computes the first caption, draws the first frame, then handles events
    /// in arrival order. While a selection is in flight, events are pulled
    /// and discarded so nothing queues up behind the hold. When the stream
    /// ends, a selection still in flight is awaited before returning.
    pub async fn listen<E>(&mut self, events: E)
    where
        E: Stream<Item = InputEvent> + Unpin,
    {
        let mut events = events;
        let mut exhausted = false;

        if let Some(caption) = self.refresh_caption() {
            caption.resolve().await;
        }
        self.refresh_no_throw();

        loop {
            if let Some(in_flight) = self.in_flight.take() {
                let result = self.hold_until(&mut events, &mut exhausted, in_flight).await;
                if let Some(caption) = self.apply_selection(result) {
                    self.hold_until(&mut events, &mut exhausted, caption.resolve().boxed_local())
                        .await;
                }
                self.release();
                continue;
            }

            if exhausted {
                break;
            }

            match events.next().await {
                Some(event) => self.handle_event(&event),
                None => exhausted = true,
            }
        }

        tracing::debug!(generation = self.generation, "input closed, menu loop finished");
    }

    /// Awaits `pending` while discarding whatever input arrives meanwhile.
    async fn hold_until<E, F>(&mut self, events: &mut E, exhausted: &mut bool, pending: F) -> F::Output
    where
        E: Stream<Item = InputEvent> + Unpin,
        F: Future + Unpin,
    {
        let mut pending = pending;
        loop {
            if *exhausted {
                return pending.await;
            }
            match future::select(pending, events.next()).await {
                Either::Left((output, _)) => return output,
                Either::Right((Some(event), rest)) => {
                    self.handle_event(&event);
                    pending = rest;
                }
                Either::Right((None, rest)) => {
                    *exhausted = true;
                    pending = rest;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handler::Key;
    use crate::app::state::MenuOptions;
    use crate::domain::{CaptureBuffer, ItemList, MenuContext, Output, Selection};
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::stream;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Item whose action is provided by the test.
    struct Scripted {
        label: &'static str,
        action: RefCell<Option<Selection<u32>>>,
    }

    impl Scripted {
        fn new(label: &'static str, action: Selection<u32>) -> Rc<dyn MenuItem<u32>> {
            Rc::new(Self {
                label,
                action: RefCell::new(Some(action)),
            })
        }
    }

    impl MenuItem<u32> for Scripted {
        fn render(&self) -> String {
            self.label.to_string()
        }

        fn select(&self, _context: &MenuContext<u32>) -> Selection<u32> {
            self.action
                .borrow_mut()
                .take()
                .unwrap_or(Selection::Ready(Ok(None)))
        }
    }

    /// Item whose action bumps the caller state by returning a new context.
    struct Increment;

    impl MenuItem<u32> for Increment {
        fn render(&self) -> String {
            "increment".to_string()
        }

        fn select(&self, context: &MenuContext<u32>) -> Selection<u32> {
            let next = context.clone().with_state(context.state + 1);
            Selection::pending(async move { Ok(Some(next)) })
        }
    }

    fn enter() -> InputEvent {
        InputEvent::Key(Key::Enter)
    }

    #[test]
    fn failing_action_becomes_status_message() {
        let buffer = CaptureBuffer::new();
        let items = vec![Scripted::new("explode", Selection::Ready(Err("boom".into())))];
        let mut menu = Menu::new(Output::new(buffer.clone()), items, 0, MenuOptions::default());

        block_on(menu.listen(stream::iter(vec![enter()])));

        assert!(!menu.is_held());
        assert_eq!(menu.query(), "");
        assert_eq!(menu.context().message.as_deref(), Some("boom"));
        assert_eq!(menu.generation(), 1);
        assert!(buffer.last_frame().ends_with("> explode\n\nboom\n\n"));
    }

    #[test]
    fn returned_context_replaces_current_one() {
        let buffer = CaptureBuffer::new();
        let mut menu = Menu::new(
            Output::new(buffer.clone()),
            vec![Rc::new(Increment) as Rc<dyn MenuItem<u32>>],
            41,
            MenuOptions::default().caption(|context: &MenuContext<u32>| {
                Derived::Ready(format!("state is {}", context.state))
            }),
        );

        block_on(menu.listen(stream::iter(vec![enter(), enter()])));

        assert_eq!(menu.context().state, 43);
        assert_eq!(menu.generation(), 2);
        assert_eq!(menu.caption().unwrap().as_deref(), Some("state is 43"));
        assert!(buffer.last_frame().contains("state is 43\n\n"));
    }

    #[test]
    fn input_during_selection_is_discarded() {
        let (release, released) = oneshot::channel::<()>();
        let action = Selection::pending(async move {
            let _ = released.await;
            Ok(None)
        });
        let items = vec![
            Scripted::new("slow", action),
            Scripted::new("other", Selection::Ready(Ok(None))),
        ];
        let options = MenuOptions::default().filter(|items: &ItemList<u32>, _query: &str| items.clone());
        let mut menu = Menu::new(Output::new(CaptureBuffer::new()), items, 0, options);

        let mut release = Some(release);
        let events = stream::iter(vec![
            enter(),
            InputEvent::Key(Key::Down),
            InputEvent::Key(Key::Text("x".to_string())),
        ])
        .chain(stream::poll_fn(move |_| {
            if let Some(release) = release.take() {
                let _ = release.send(());
            }
            std::task::Poll::Ready(None)
        }));

        block_on(menu.listen(events));

        assert_eq!(menu.cursor(), 0);
        assert_eq!(menu.query(), "");
        assert_eq!(menu.generation(), 1);
        assert!(!menu.is_held());
    }

    #[test]
    fn stream_end_waits_for_selection_in_flight() {
        let (release, released) = oneshot::channel::<()>();
        let action = Selection::pending(async move {
            let _ = released.await;
            Err("late failure".into())
        });
        let items = vec![Scripted::new("slow", action)];
        let mut menu = Menu::new(Output::new(CaptureBuffer::new()), items, 0, MenuOptions::default());

        menu.handle_event(&enter());
        assert!(menu.is_held());
        release.send(()).unwrap();

        block_on(menu.listen(stream::empty()));

        assert!(!menu.is_held());
        assert_eq!(menu.context().message.as_deref(), Some("late failure"));
    }

    #[test]
    fn caption_is_recomputed_once_per_generation() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let items = vec![
            Scripted::new("a", Selection::Ready(Ok(None))),
            Scripted::new("b", Selection::Ready(Ok(None))),
        ];
        let options = MenuOptions::default().caption(move |_context: &MenuContext<u32>| {
            counter.set(counter.get() + 1);
            Derived::pending(async { "async caption".to_string() })
        });
        let buffer = CaptureBuffer::new();
        let mut menu = Menu::new(Output::new(buffer.clone()), items, 0, options);

        let keys = [Key::Down, Key::Up, Key::Down, Key::Enter, Key::Up];
        block_on(menu.listen(stream::iter(keys.into_iter().map(InputEvent::Key))));

        assert_eq!(calls.get(), 2);
        assert_eq!(menu.generation(), 1);
        assert!(buffer.last_frame().ends_with("async caption\n\n"));
    }

    #[test]
    fn settle_completes_a_selection_started_by_hand() {
        let items = vec![Scripted::new("only", Selection::Ready(Ok(None)))];
        let mut menu = Menu::new(Output::new(CaptureBuffer::new()), items, 0, MenuOptions::default());
        menu.refresh().unwrap();

        menu.handle_event(&enter());
        assert!(menu.is_held());

        block_on(menu.settle());

        assert!(!menu.is_held());
        assert_eq!(menu.generation(), 1);
    }
}

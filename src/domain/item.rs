//! Selectable items and the shared list that holds them.
//!
//! Items are supplied by the caller. The engine only needs two things from an
//! item: a one-line rendering and an action to run when the item is chosen.

use crate::domain::context::MenuContext;
use crate::domain::derived::Derived;
use crate::domain::error::ItemError;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Outcome of an item's action.
///
/// `Ok(None)` leaves the context as it is, `Ok(Some(context))` replaces it
/// wholesale, and `Err` becomes the status message.
pub type SelectResult<S> = Result<Option<MenuContext<S>>, ItemError>;

/// What an item's action hands back: an immediate or eventual [`SelectResult`].
pub type Selection<S> = Derived<SelectResult<S>>;

/// A selectable menu entry.
///
/// # Example
///
/// ```
/// use updown_menu::{MenuContext, MenuItem, Selection};
///
/// struct Greet(&'static str);
///
/// impl MenuItem<()> for Greet {
///     fn render(&self) -> String {
///         format!("greet {}", self.0)
///     }
///
///     fn select(&self, context: &MenuContext<()>) -> Selection<()> {
///         let result = context.output.write(&format!("hello, {}\n", self.0));
///         Selection::Ready(result.map(|()| None).map_err(Into::into))
///     }
/// }
/// ```
pub trait MenuItem<S> {
    /// Single-line text shown for this item.
    fn render(&self) -> String;

    /// Runs the item's action against the current context.
    ///
    /// Anything the action needs past the first `.await` must be cloned out of
    /// `context`, since the returned future outlives the borrow.
    fn select(&self, context: &MenuContext<S>) -> Selection<S>;
}

/// Ordered, shared sequence of items.
///
/// Equality is identity: two lists are equal only if they are the same
/// allocation. That is what lets the filter cache notice a replaced list
/// without comparing items.
pub struct ItemList<S> {
    items: Rc<[Rc<dyn MenuItem<S>>]>,
}

impl<S> ItemList<S> {
    #[must_use]
    pub fn new(items: Vec<Rc<dyn MenuItem<S>>>) -> Self {
        Self {
            items: Rc::from(items),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Item at `index`, if any.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&Rc<dyn MenuItem<S>>> {
        self.items.get(index)
    }
}

impl<S> Clone for ItemList<S> {
    fn clone(&self) -> Self {
        Self {
            items: Rc::clone(&self.items),
        }
    }
}

impl<S> PartialEq for ItemList<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }
}

impl<S> Deref for ItemList<S> {
    type Target = [Rc<dyn MenuItem<S>>];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<S> FromIterator<Rc<dyn MenuItem<S>>> for ItemList<S> {
    fn from_iter<I: IntoIterator<Item = Rc<dyn MenuItem<S>>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<S> fmt::Debug for ItemList<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.items.iter().map(|item| item.render()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label(&'static str);

    impl MenuItem<()> for Label {
        fn render(&self) -> String {
            self.0.to_string()
        }

        fn select(&self, _context: &MenuContext<()>) -> Selection<()> {
            Selection::Ready(Ok(None))
        }
    }

    fn labels(names: &[&'static str]) -> ItemList<()> {
        names
            .iter()
            .map(|name| Rc::new(Label(*name)) as Rc<dyn MenuItem<()>>)
            .collect()
    }

    #[test]
    fn equality_is_identity_not_content() {
        let a = labels(&["x", "y"]);
        let b = labels(&["x", "y"]);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn derefs_to_items_in_order() {
        let list = labels(&["one", "two"]);

        let rendered: Vec<String> = list.iter().map(|item| item.render()).collect();

        assert_eq!(rendered, vec!["one", "two"]);
        assert!(list.item(2).is_none());
    }
}

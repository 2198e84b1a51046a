//! Ready-made fuzzy filter.
//!
//! The engine imposes no matching rules of its own; any [`FilterFn`] will do.
//! This one covers the common case: the query is split on whitespace and every
//! lowercase token must fuzzy-match the item's rendered text.
//!
//! [`FilterFn`]: super::state::FilterFn

use crate::domain::ItemList;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Builds a filter that keeps items whose rendering fuzzy-matches every query
/// token.
///
/// A blank query returns the list itself, not a copy.
///
/// # Example
///
/// ```
/// use updown_menu::{fuzzy_filter, MenuOptions};
///
/// let options: MenuOptions<()> = MenuOptions::default().filter(fuzzy_filter::<()>());
/// assert!(options.filter.is_some());
/// ```
pub fn fuzzy_filter<S: 'static>() -> impl FnMut(&ItemList<S>, &str) -> ItemList<S> + 'static {
    let matcher = SkimMatcherV2::default();

    move |items: &ItemList<S>, query: &str| {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return items.clone();
        }

        let filtered: ItemList<S> = items
            .iter()
            .filter(|item| {
                let text = item.render().to_lowercase();
                tokens
                    .iter()
                    .all(|token| matcher.fuzzy_match(&text, token).is_some())
            })
            .cloned()
            .collect();

        tracing::trace!(
            total = items.len(),
            matched = filtered.len(),
            token_count = tokens.len(),
            "fuzzy filter applied"
        );

        filtered
    }
}

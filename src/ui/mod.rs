//! Plain-text rendering of the menu.
//!
//! Rendering is two steps: [`window`] decides which rows of the filtered list
//! are on screen and whether the scroll indicators show, then [`renderer`]
//! composes the frame text and writes it to the context's output.
//!
//! ```text
//! (cursor, offset, page_size, len) → Window → Frame → Output
//! ```

pub mod renderer;
pub mod window;

pub use renderer::{Frame, CLEAR_SCREEN, NO_ITEMS, NO_MATCHING_ITEMS, SCROLL_INDICATOR};
pub use window::Window;

//! The page as the user sees it: regions, layout, backdrop, text input.

pub mod backdrop;
pub mod content;
pub mod layout;
pub mod page;
pub mod text;
pub mod textarea;

pub use backdrop::Backdrop;
pub use content::{render_region, RegionContext};
pub use layout::{layout_page, PageGeometry};
pub use page::{draw_scrollbar, regions_for, Page, PageHost};
pub use textarea::TextArea;

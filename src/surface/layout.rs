//! Page layout: a taffy flex column of region blocks.
//!
//! Every region is a fixed-height block; the column adds padding and a gap
//! between blocks and caps the content width. Results are in cells.

use taffy::prelude::*;

use crate::geometry::Rect;
use crate::visibility::RegionKey;

/// Widest a region block gets.
pub const MAX_CONTENT_WIDTH: u16 = 96;
/// Rows between blocks.
pub const SECTION_GAP: u16 = 1;
/// Horizontal page padding.
pub const PAGE_PADDING_X: u16 = 2;
/// Vertical page padding.
pub const PAGE_PADDING_Y: u16 = 1;

/// Laid-out page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageGeometry {
    /// Block rectangles in page order.
    pub regions: Vec<(RegionKey, Rect)>,
    /// Total page height in rows, padding included.
    pub content_height: i32,
}

impl PageGeometry {
    pub fn bounds(&self, key: RegionKey) -> Option<Rect> {
        self.regions
            .iter()
            .find_map(|(k, r)| (*k == key).then_some(*r))
    }
}

/// Width available to block content for a terminal `width`.
pub fn content_width(width: u16) -> u16 {
    width
        .saturating_sub(PAGE_PADDING_X * 2)
        .min(MAX_CONTENT_WIDTH)
}

/// Stack `blocks` (key, height in rows) in a centered column `width` wide.
pub fn layout_page(blocks: &[(RegionKey, u16)], width: u16) -> Result<PageGeometry, taffy::TaffyError> {
    let mut tree: TaffyTree<RegionKey> = TaffyTree::new();

    let children = blocks
        .iter()
        .map(|&(key, height)| {
            tree.new_leaf_with_context(
                Style {
                    size: Size {
                        width: Dimension::from_percent(1.0),
                        height: Dimension::from_length(height as f32),
                    },
                    max_size: Size {
                        width: Dimension::from_length(MAX_CONTENT_WIDTH as f32),
                        height: Dimension::AUTO,
                    },
                    flex_shrink: 0.0,
                    ..Default::default()
                },
                key,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let root = tree.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            align_items: Some(AlignItems::Center),
            gap: Size {
                width: LengthPercentage::from_length(0.0),
                height: LengthPercentage::from_length(SECTION_GAP as f32),
            },
            padding: taffy::geometry::Rect {
                left: LengthPercentage::from_length(PAGE_PADDING_X as f32),
                right: LengthPercentage::from_length(PAGE_PADDING_X as f32),
                top: LengthPercentage::from_length(PAGE_PADDING_Y as f32),
                bottom: LengthPercentage::from_length(PAGE_PADDING_Y as f32),
            },
            size: Size {
                width: Dimension::from_length(width as f32),
                height: Dimension::AUTO,
            },
            ..Default::default()
        },
        &children,
    )?;

    tree.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::MaxContent,
        },
    )?;

    let mut regions = Vec::with_capacity(children.len());
    for (&(key, _), &node) in blocks.iter().zip(&children) {
        let layout = tree.layout(node)?;
        regions.push((
            key,
            Rect::new(
                layout.location.x.round() as i32,
                layout.location.y.round() as i32,
                layout.size.width.round() as i32,
                layout.size.height.round() as i32,
            ),
        ));
    }
    let content_height = tree.layout(root)?.size.height.round() as i32;

    Ok(PageGeometry {
        regions,
        content_height,
    })
}

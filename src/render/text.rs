//! Plain text assembly from layout results.

use crate::model::{DocumentLayout, Fragment, LayoutState, PageResult};

use super::{RenderOptions, TextCleaner};

/// Join a document's pages into plain text.
///
/// Pages with no remaining text are skipped, so separators never pile up.
pub fn to_text(layout: &DocumentLayout, options: &RenderOptions) -> String {
    let cleaner = TextCleaner::new(options);
    layout
        .pages
        .iter()
        .filter(|page| options.page_selection.includes(page.number))
        .map(|page| render_page(page, options, &cleaner))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(&options.page_separator)
}

/// Join one page's fragments into plain text.
pub fn page_text(page: &PageResult, options: &RenderOptions) -> String {
    render_page(page, options, &TextCleaner::new(options))
}

fn render_page(page: &PageResult, options: &RenderOptions, cleaner: &TextCleaner) -> String {
    let kept: Vec<&Fragment> = page
        .fragments
        .iter()
        .filter(|f| !(options.remove_headers_footers && f.region_kind.is_header_or_footer()))
        .collect();

    match page.layout_state {
        // Reordered fragments carry the column structure; keep one per line.
        LayoutState::ColumnReordered => kept
            .iter()
            .map(|f| cleaner.collapse(&cleaner.normalize_chars(&f.text)))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        LayoutState::Raw => {
            let joined = kept
                .iter()
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            cleaner.collapse(&cleaner.normalize_chars(&joined))
        }
    }
}

//! Section extraction: page ranges between consecutive outline entries.

use crate::model::{LayoutDocument, Outline, Section};

/// Split a document into sections, one per outline entry.
///
/// Entry `i` covers pages `[page_i, page_{i+1})`; the last entry runs to the
/// end of the document. Pages in a range are concatenated in order; a range
/// whose content is empty or whitespace-only yields no section. Two entries
/// on the same page give the first one an empty range.
pub fn extract_sections(document: &str, layout: &LayoutDocument, outline: &Outline) -> Vec<Section> {
    let page_count = layout.page_count();
    let mut sections = Vec::new();

    for (i, entry) in outline.entries.iter().enumerate() {
        let start_page = entry.page;
        let end_page = outline
            .entries
            .get(i + 1)
            .map(|next| next.page)
            .unwrap_or(page_count + 1);

        let content = page_range_text(layout, start_page, end_page);
        if content.is_empty() {
            log::debug!("Skipping empty section '{}' in {}", entry.text, document);
            continue;
        }

        sections.push(Section::new(
            document,
            entry.text.clone(),
            start_page,
            end_page,
            content,
        ));
    }

    sections
}

/// Concatenated, trimmed raw text of pages `[start, end)`.
///
/// Pages outside the document are ignored.
fn page_range_text(layout: &LayoutDocument, start: u32, end: u32) -> String {
    let mut content = String::new();
    for page in (start..end).filter_map(|n| layout.get_page(n)) {
        if !content.is_empty() && !content.ends_with(char::is_whitespace) {
            content.push('\n');
        }
        content.push_str(&page.text);
    }
    content.trim().to_string()
}

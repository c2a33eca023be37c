//! Integration tests for per-page layout processing.

use colflow::{
    BBox, ColumnAssigner, Fragment, LayoutEngine, LayoutOptions, LayoutProcessor, LayoutState,
    LineSplitter, Page, PageResult, ReadingOrderPolicy, RegionKind, SplitThresholds,
};

fn frag(text: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Fragment {
    Fragment::new(text, BBox::new(x0, y0, x1, y1))
}

fn grid_page() -> Page {
    Page::with_fragments(
        1,
        800.0,
        1000.0,
        vec![
            frag("LT", 50.0, 100.0, 350.0, 120.0),
            frag("RT", 450.0, 100.0, 750.0, 120.0),
            frag("LB", 50.0, 300.0, 350.0, 320.0),
            frag("RB", 450.0, 300.0, 750.0, 320.0),
        ],
    )
}

fn texts(result: &PageResult) -> Vec<&str> {
    result.fragments.iter().map(|f| f.text.as_str()).collect()
}

#[test]
fn test_two_by_two_stacked() {
    let result = LayoutProcessor::default().process(grid_page());

    assert_eq!(result.column_count, 2);
    assert_eq!(result.layout_state, LayoutState::ColumnReordered);
    assert_eq!(texts(&result), vec!["LT", "LB", "RT", "RB"]);

    let columns: Vec<Option<usize>> = result.fragments.iter().map(|f| f.column_id).collect();
    assert_eq!(columns, vec![Some(0), Some(0), Some(1), Some(1)]);
}

#[test]
fn test_two_by_two_row_aligned() {
    let options = LayoutOptions::new().with_reading_order(ReadingOrderPolicy::RowAligned);
    let result = LayoutProcessor::new(options).process(grid_page());

    assert_eq!(result.column_count, 2);
    assert_eq!(texts(&result), vec!["LT", "RT", "LB", "RB"]);
}

#[test]
fn test_single_column_preserved() {
    let page = Page::with_fragments(
        1,
        800.0,
        1000.0,
        vec![
            frag("First line of text", 50.0, 300.0, 750.0, 315.0),
            frag("Second line of text", 50.0, 200.0, 750.0, 215.0),
            frag("Third line of text", 50.0, 400.0, 750.0, 415.0),
        ],
    );
    let result = LayoutProcessor::default().process(page);

    assert_eq!(result.column_count, 1);
    assert_eq!(result.layout_state, LayoutState::Raw);
    assert_eq!(
        texts(&result),
        vec!["First line of text", "Second line of text", "Third line of text"]
    );
}

#[test]
fn test_three_columns() {
    let page = Page::with_fragments(
        1,
        900.0,
        1000.0,
        vec![
            frag("third column", 660.0, 100.0, 870.0, 120.0),
            frag("first column", 30.0, 100.0, 240.0, 120.0),
            frag("second column", 345.0, 100.0, 555.0, 120.0),
        ],
    );
    let result = LayoutProcessor::default().process(page);

    assert_eq!(result.column_count, 3);
    assert_eq!(
        texts(&result),
        vec!["first column", "second column", "third column"]
    );
}

#[test]
fn test_empty_and_single_fragment_pages() {
    let processor = LayoutProcessor::default();

    let empty = processor.process(Page::new(1, 800.0, 1000.0));
    assert!(empty.is_empty());
    assert_eq!(empty.layout_state, LayoutState::Raw);

    let single = processor.process(Page::with_fragments(
        2,
        800.0,
        1000.0,
        vec![frag("only", 450.0, 300.0, 750.0, 320.0)],
    ));
    assert_eq!(texts(&single), vec!["only"]);
    assert_eq!(single.column_count, 1);
    assert_eq!(single.fragments[0].column_id, None);
}

#[test]
fn test_processing_is_idempotent() {
    let processor = LayoutProcessor::default();
    let first = processor.process(grid_page());

    let again = Page::with_fragments(1, 800.0, 1000.0, first.fragments.clone());
    let second = processor.process(again);

    assert_eq!(texts(&first), texts(&second));
    assert_eq!(first.column_count, second.column_count);
}

/// Word-level fragments: six rows, two words per column.
fn word_page() -> Page {
    let mut page = Page::new(1, 800.0, 1000.0);
    for row in 0..6 {
        let y = 200.0 + row as f32 * 20.0;
        for (text, x0, x1) in [
            ("Results", 50.0, 110.0),
            ("show", 115.0, 150.0),
            ("Method", 450.0, 510.0),
            ("details", 515.0, 570.0),
        ] {
            page.add_fragment(frag(text, x0, y, x1, y + 10.0).with_font_size(10.0));
        }
    }
    page
}

fn reprocess(processor: &LayoutProcessor, result: &PageResult) -> PageResult {
    processor.process(Page::with_fragments(
        result.number,
        result.width,
        result.height,
        result.fragments.clone(),
    ))
}

#[test]
fn test_line_assembly_is_idempotent() {
    let processor = LayoutProcessor::new(LayoutOptions::new().with_line_assembly(true));
    let first = processor.process(word_page());

    assert_eq!(first.column_count, 2);
    assert_eq!(first.fragments.len(), 12);
    assert!(texts(&first)[..6].iter().all(|t| *t == "Results show"));
    assert!(texts(&first)[6..].iter().all(|t| *t == "Method details"));

    let second = reprocess(&processor, &first);
    assert_eq!(texts(&first), texts(&second));
    assert_eq!(first.column_count, second.column_count);
}

#[test]
fn test_row_aligned_is_idempotent() {
    let processor = LayoutProcessor::new(
        LayoutOptions::new().with_reading_order(ReadingOrderPolicy::RowAligned),
    );
    let first = processor.process(grid_page());
    let second = reprocess(&processor, &first);

    assert_eq!(texts(&first), vec!["LT", "RT", "LB", "RB"]);
    assert_eq!(texts(&first), texts(&second));
}

#[test]
fn test_input_order_does_not_matter() {
    let mut shuffled = grid_page();
    shuffled.fragments.reverse();

    let a = LayoutProcessor::default().process(grid_page());
    let b = LayoutProcessor::default().process(shuffled);
    assert_eq!(texts(&a), texts(&b));
}

#[test]
fn test_assignment_is_a_partition() {
    let mut fragments = grid_page().fragments;
    fragments.push(Fragment::unpositioned("floating"));
    fragments.push(frag("off page", 900.0, 500.0, 950.0, 520.0));

    let columns = ColumnAssigner::new()
        .assign(fragments.clone(), 800.0, 3)
        .expect("valid column count");
    assert_eq!(columns.len(), 3);

    let mut assigned: Vec<&str> = columns.iter().flatten().map(|f| f.text.as_str()).collect();
    let mut expected: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
    assigned.sort_unstable();
    expected.sort_unstable();
    assert_eq!(assigned, expected);

    for (index, column) in columns.iter().enumerate() {
        assert!(column.iter().all(|f| f.column_id == Some(index)));
    }
    assert!(columns[0].iter().any(|f| f.text == "floating"));
    assert!(columns[2].iter().any(|f| f.text == "off page"));
}

#[test]
fn test_zero_columns_is_an_error() {
    let result = ColumnAssigner::new().assign(grid_page().fragments, 800.0, 0);
    assert!(matches!(result, Err(colflow::Error::LayoutDetection(_))));
}

#[test]
fn test_headers_and_footers_excluded_from_text() {
    let page = Page::with_fragments(
        1,
        600.0,
        600.0,
        vec![
            frag("Header", 0.0, 0.0, 100.0, 30.0),
            frag("Body text", 50.0, 200.0, 550.0, 220.0),
            frag("Footer", 0.0, 570.0, 100.0, 600.0),
        ],
    );
    let engine = LayoutEngine::new().sequential().build().expect("valid options");
    let result = engine.process(vec![page]);

    let page = result.layout().page(1).expect("page 1");
    assert_eq!(page.fragments_of(RegionKind::Header).count(), 1);
    assert_eq!(page.fragments_of(RegionKind::Footer).count(), 1);
    assert_eq!(result.to_text(), "Body text");
}

#[test]
fn test_short_line_with_gap_not_split() {
    let line = vec![
        frag("ab", 50.0, 100.0, 70.0, 112.0),
        frag("c", 80.0, 100.0, 90.0, 112.0),
        frag("de", 500.0, 100.0, 520.0, 112.0),
    ];
    let pieces = LineSplitter::new(SplitThresholds::default()).split(line, 800.0);
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].len(), 3);
}

#[test]
fn test_disabled_columns_keep_order() {
    let options = LayoutOptions::new().without_columns();
    let result = LayoutProcessor::new(options).process(grid_page());

    assert_eq!(result.layout_state, LayoutState::Raw);
    assert_eq!(texts(&result), vec!["LT", "RT", "LB", "RB"]);
}

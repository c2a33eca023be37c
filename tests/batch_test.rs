//! Integration tests for multi-page processing and text assembly.

use colflow::batch::run_pages;
use colflow::{
    process_pages, BBox, BatchProcessor, Fragment, LayoutEngine, LayoutOptions, LayoutProcessor,
    LayoutState, Page, PageResult, PageSelection, RenderOptions,
};

fn two_column_page(number: u32) -> Page {
    Page::with_fragments(
        number,
        800.0,
        1000.0,
        vec![
            Fragment::new(format!("p{} left top", number), BBox::new(50.0, 100.0, 350.0, 120.0)),
            Fragment::new(format!("p{} right top", number), BBox::new(450.0, 100.0, 750.0, 120.0)),
            Fragment::new(format!("p{} left bottom", number), BBox::new(50.0, 300.0, 350.0, 320.0)),
            Fragment::new(
                format!("p{} right bottom", number),
                BBox::new(450.0, 300.0, 750.0, 320.0),
            ),
        ],
    )
}

#[test]
fn test_pages_come_back_in_order() {
    let pages = vec![two_column_page(3), two_column_page(1), two_column_page(2)];
    let layout = process_pages(pages, &LayoutOptions::new().with_workers(3));

    let numbers: Vec<u32> = layout.pages.iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(layout.reordered_page_count(), 3);
    assert!(layout.failed_pages().is_empty());
}

#[test]
fn test_parallel_matches_sequential() {
    let pages: Vec<Page> = (1..=8).map(two_column_page).collect();

    let sequential = process_pages(pages.clone(), &LayoutOptions::new().sequential());
    let parallel = process_pages(pages, &LayoutOptions::new().with_workers(4));

    assert_eq!(sequential.page_count(), parallel.page_count());
    for (a, b) in sequential.pages.iter().zip(parallel.pages.iter()) {
        assert_eq!(a.number, b.number);
        assert_eq!(a.text(), b.text());
    }
}

#[test]
fn test_panicking_page_becomes_placeholder() {
    let processor = LayoutProcessor::default();
    let pages: Vec<Page> = (1..=4).map(two_column_page).collect();

    let results = run_pages(pages, 2, |page| {
        if page.number == 2 {
            panic!("corrupt page");
        }
        processor.process(page)
    });

    assert_eq!(results.len(), 4);
    assert!(results[1].failed);
    assert!(results[1].is_empty());
    assert!(results.iter().filter(|r| r.number != 2).all(|r| !r.failed));
}

#[test]
fn test_batch_processor_document() {
    let batch = BatchProcessor::new(LayoutOptions::default()).with_workers(2);
    let layout = batch.process(vec![two_column_page(1), Page::new(2, 800.0, 1000.0)]);

    assert_eq!(layout.page_count(), 2);
    assert_eq!(layout.page(1).map(|p| p.column_count), Some(2));
    assert_eq!(layout.page(2).map(|p| p.is_empty()), Some(true));
}

#[test]
fn test_engine_text_output() {
    let engine = LayoutEngine::new()
        .with_workers(2)
        .build()
        .expect("valid options");
    let text = engine
        .process(vec![two_column_page(1), two_column_page(2)])
        .to_text();

    assert_eq!(
        text,
        "p1 left top\np1 left bottom\np1 right top\np1 right bottom\n\n\
         p2 left top\np2 left bottom\np2 right top\np2 right bottom"
    );
}

#[test]
fn test_page_selection_in_output() {
    let engine = LayoutEngine::new()
        .with_pages(PageSelection::Pages(vec![2]))
        .build()
        .expect("valid options");
    let text = engine
        .process(vec![two_column_page(1), two_column_page(2)])
        .to_text();

    assert!(text.starts_with("p2 left top"));
    assert!(!text.contains("p1"));
}

#[test]
fn test_render_options_separator() {
    let layout = process_pages(
        vec![two_column_page(1), two_column_page(2)],
        &LayoutOptions::default(),
    );
    let options = RenderOptions::new().with_page_separator("\n\u{c}\n");
    let text = colflow::render::to_text(&layout, &options);
    assert_eq!(text.matches('\u{c}').count(), 1);
}

#[test]
fn test_page_result_serialization() {
    let result = LayoutProcessor::default().process(two_column_page(1));
    let json = serde_json::to_string(&result).expect("serialize");
    assert!(json.contains("\"layout_state\":\"column_reordered\""));

    let restored: PageResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored.text(), result.text());
    assert_eq!(restored.column_count, 2);
    assert_eq!(restored.layout_state, LayoutState::ColumnReordered);
    assert!(!restored.failed);
}

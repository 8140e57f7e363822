use halosync_core::MarkdownRenderer;
use halosync_renderer::{RenderOptions, Renderer};
use rstest::rstest;

#[rstest]
#[case("# Title", "<h1>Title</h1>")]
#[case("~~gone~~", "<del>gone</del>")]
#[case("| a | b |\n|---|---|\n| 1 | 2 |", "<table>")]
#[case("- [x] done", "type=\"checkbox\"")]
#[case("note[^1]\n\n[^1]: detail", "footnote")]
fn extensions_render(#[case] markdown: &str, #[case] expected: &str) {
    let html = Renderer::default().render(markdown);
    assert!(html.contains(expected), "expected {expected:?} in {html:?}");
}

#[test]
fn raw_html_passes_through_by_default() {
    let html = Renderer::default().render("<div class=\"x\">hi</div>\n");
    assert!(html.contains("<div class=\"x\">hi</div>"), "got {html:?}");
}

#[test]
fn raw_html_is_escaped_when_disabled() {
    let renderer = Renderer::new(RenderOptions {
        raw_html: false,
        ..RenderOptions::default()
    });
    let html = renderer.render("text <script>alert(1)</script>\n");
    assert!(!html.contains("<script>"), "got {html:?}");
    assert!(html.contains("&lt;script&gt;"), "got {html:?}");
}

#[test]
fn disabled_tables_stay_paragraphs() {
    let renderer = Renderer::new(RenderOptions {
        tables: false,
        ..RenderOptions::default()
    });
    let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |");
    assert!(!html.contains("<table>"), "got {html:?}");
}

#[test]
fn chinese_text_is_kept_verbatim() {
    let html = Renderer::default().render("你好，世界");
    assert_eq!(html, "<p>你好，世界</p>\n");
}

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui_fragments_core::theme::Theme;
use ratatui_fragments_markdown::RenderOptions;
use ratatui_fragments_markdown::Renderer;
use ratatui_fragments_markdown::block::RenderBlock;
use ratatui_fragments_markdown::block::Unit;
use ratatui_fragments_markdown::render_markdown;
use ratatui_fragments_markdown::tree::Document;

fn line_to_plain(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|s| s.content.as_ref())
        .collect::<Vec<_>>()
        .join("")
}

fn text_prefixes(blocks: &[RenderBlock]) -> Vec<String> {
    blocks
        .iter()
        .filter_map(RenderBlock::as_text_run)
        .map(|r| r.prefix.clone())
        .collect()
}

#[test]
fn strong_words_inside_a_paragraph() {
    let rendered = render_markdown("Hello **World**!", &RenderOptions::default());
    let blocks = rendered.blocks();
    assert_eq!(blocks.len(), 2);

    let run = blocks[0].as_text_run().expect("text run");
    let words: Vec<&str> = run.units.iter().map(Unit::text).collect();
    assert_eq!(words, vec!["Hello", "World", "!"]);
    let strong: Vec<bool> = run
        .units
        .iter()
        .map(|u| matches!(u, Unit::Word(w) if w.strong))
        .collect();
    assert_eq!(strong, vec![false, true, false]);
    assert!(matches!(blocks[1], RenderBlock::Spacer(s) if s.height == 1));
    assert!(rendered.links().is_empty());

    let lines: Vec<String> = rendered
        .to_text(80, &Theme::default())
        .lines
        .iter()
        .map(line_to_plain)
        .collect();
    assert_eq!(lines, vec!["Hello World!".to_string(), String::new()]);
}

#[test]
fn wide_column_is_capped_and_excess_goes_to_the_other() {
    let md = "| Name | Date Created On This System |\n|---|---|\n| X | Y |\n";
    let rendered = render_markdown(md, &RenderOptions::default());
    let table = rendered
        .blocks()
        .iter()
        .find_map(RenderBlock::as_table)
        .expect("table block");
    assert_eq!(table.header.len(), 2);
    assert_eq!(table.body.len(), 1);
    assert!((table.widths[0] - 60.0).abs() < 1e-9, "{:?}", table.widths);
    assert!((table.widths[1] - 40.0).abs() < 1e-9, "{:?}", table.widths);
}

#[test]
fn short_table_rows_are_padded() {
    let md = "| a | b | c |\n|---|:-:|--:|\n| 1 |\n| 1 | 2 | 3 |\n";
    let rendered = render_markdown(md, &RenderOptions::default());
    let table = rendered
        .blocks()
        .iter()
        .find_map(RenderBlock::as_table)
        .expect("table block");
    assert!(table.body.iter().all(|row| row.len() == 3));
    let sum: f64 = table.widths.iter().sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

#[test]
fn table_rows_carry_padding_lines() {
    let md = "| a | b |\n|---|---|\n| 1 | 2 |\n";
    let options = RenderOptions {
        table_row_padding: 2,
        ..RenderOptions::default()
    };
    let rendered = render_markdown(md, &options);
    let table = rendered
        .blocks()
        .iter()
        .find(|b| b.as_table().is_some())
        .expect("table block");
    // Header and body each take one content line plus two padding lines.
    assert_eq!(table.layout(40, &Theme::default()).height(), 6);
}

#[test]
fn ordered_list_numbers_follow_position() {
    let rendered = render_markdown("1. one\n2. two\n3. three\n", &RenderOptions::default());
    assert_eq!(text_prefixes(rendered.blocks()), vec!["1. ", "2. ", "3. "]);
}

#[test]
fn nested_lists_indent_their_items() {
    let rendered = render_markdown("- a\n    - b\n", &RenderOptions::default());
    assert_eq!(
        text_prefixes(rendered.blocks()),
        vec![" \u{2022} ".to_string(), "    \u{2022} ".to_string()]
    );
}

#[test]
fn list_followed_by_paragraph_gets_a_blank_line() {
    let rendered = render_markdown("- a\n\nafter\n", &RenderOptions::default());
    let heights: Vec<u16> = rendered
        .blocks()
        .iter()
        .filter_map(|b| match b {
            RenderBlock::Spacer(s) => Some(s.height),
            _ => None,
        })
        .collect();
    // Item spacing, list separator, paragraph spacing.
    assert_eq!(heights, vec![0, 1, 1]);
}

#[test]
fn links_to_the_same_destination_share_a_handle() {
    let md = "See [the docs](https://example.com) or [again](https://example.com).";
    let rendered = render_markdown(md, &RenderOptions::default());
    assert_eq!(rendered.links().len(), 1);

    let run = rendered.blocks()[0].as_text_run().expect("text run");
    let ids: Vec<_> = run.units.iter().filter_map(Unit::link).collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], ids[1]);
    assert_eq!(
        rendered.links().destination(ids[0]),
        Some("https://example.com")
    );
    assert_eq!(run.plain(), "See the docs or again.");
}

#[test]
fn link_areas_are_reported_after_layout() {
    let rendered = render_markdown("go [here](https://example.com)", &RenderOptions::default());
    let measured = rendered.measure(40, &Theme::default());
    assert_eq!(measured.links.len(), 1);
    let area = measured.links[0];
    assert_eq!((area.line, area.x, area.width), (0, 3, 4));
}

#[test]
fn relative_links_resolve_against_base_url() {
    let options = RenderOptions {
        base_url: Some("https://example.com/docs/".to_string()),
        ..RenderOptions::default()
    };
    let rendered = render_markdown("[guide](guide.md)", &options);
    let dests: Vec<&str> = rendered.links().iter().map(|(_, d)| d).collect();
    assert_eq!(dests, vec!["https://example.com/docs/guide.md"]);
}

#[test]
fn headings_use_theme_styles() {
    let theme = Theme::default();
    let rendered = render_markdown("# Title\n\nbody\n", &RenderOptions::default());
    let text = rendered.to_text(40, &theme);
    let title = text.lines[0]
        .spans
        .iter()
        .find(|s| s.content == "Title")
        .expect("title span");
    assert!(title.style.add_modifier.contains(Modifier::BOLD));
}

#[test]
fn block_quote_lines_are_kept_as_words() {
    let rendered = render_markdown("> one\n> two\n", &RenderOptions::default());
    let run = rendered.blocks()[0].as_text_run().expect("text run");
    assert_eq!(run.plain(), "one two");
}

#[test]
fn html_fragments_apply_style_tags() {
    let doc = Document::parse_markdown("plain {#color:red; font-weight:bold#}hot{/#} tail");
    let mut renderer = Renderer::default();
    let rendered = renderer.render(&doc, true);
    let run = rendered.blocks()[0].as_text_run().expect("text run");
    let words: Vec<&str> = run.units.iter().map(Unit::text).collect();
    assert_eq!(words, vec!["plain", "hot", "tail"]);

    let text = rendered.to_text(80, &Theme::default());
    let hot = text.lines[0]
        .spans
        .iter()
        .find(|s| s.content == "hot")
        .expect("styled span");
    assert_eq!(hot.style.fg, Some(Color::Red));
    assert!(hot.style.add_modifier.contains(Modifier::BOLD));
}

#[test]
fn unbalanced_close_tags_render_the_text() {
    let doc = Document::parse_markdown("a{/#} b{/#}{/#}");
    let mut renderer = Renderer::default();
    let rendered = renderer.render(&doc, true);
    let run = rendered.blocks()[0].as_text_run().expect("text run");
    assert_eq!(run.plain(), "a b");
}

#[test]
fn word_count_matches_source_words() {
    let source = "the  quick brown\tfox jumps over the lazy dog";
    let rendered = render_markdown(source, &RenderOptions::default());
    let run = rendered.blocks()[0].as_text_run().expect("text run");
    assert_eq!(run.units.len(), source.split_whitespace().count());
    assert_eq!(
        run.plain(),
        source.split_whitespace().collect::<Vec<_>>().join(" ")
    );
}

#[test]
fn code_blocks_are_skipped() {
    let rendered = render_markdown("```\nlet x = 1;\n```\n\nafter\n", &RenderOptions::default());
    let runs: Vec<String> = rendered
        .blocks()
        .iter()
        .filter_map(RenderBlock::as_text_run)
        .map(|r| r.plain())
        .collect();
    assert_eq!(runs, vec!["after".to_string()]);
}

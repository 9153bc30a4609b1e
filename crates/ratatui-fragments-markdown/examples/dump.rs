use ratatui::text::Line;
use ratatui_fragments_core::theme::Theme;
use ratatui_fragments_markdown::RenderOptions;
use ratatui_fragments_markdown::Renderer;
use ratatui_fragments_markdown::tree::Document;
use std::env;
use std::fs;
use std::io::{self, Read};

fn main() -> io::Result<()> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return Ok(());
    }

    let mut width: u16 = 80;
    let mut is_html = false;
    let mut show_links = false;
    let mut options = RenderOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                width = parse_u16(&args, &mut i, "--width")?;
            }
            "--html" => {
                is_html = true;
                i += 1;
            }
            "--links" => {
                show_links = true;
                i += 1;
            }
            "--base-url" => {
                options.base_url = Some(parse_string(&args, &mut i, "--base-url")?);
            }
            "--row-padding" => {
                options.table_row_padding = parse_u16(&args, &mut i, "--row-padding")?;
            }
            "--bullet" => {
                options.bullet = parse_string(&args, &mut i, "--bullet")?;
            }
            _ => break,
        }
    }

    let input = if i < args.len() {
        fs::read_to_string(&args[i])?
    } else {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;
        s
    };

    let doc = Document::parse_markdown(&input);
    let mut renderer = Renderer::new(options);
    let rendered = renderer.render(&doc, is_html);

    let theme = Theme::default();
    for line in rendered.measure(width, &theme).lines {
        println!("{}", line_to_plain(&line));
    }

    if show_links && !rendered.links().is_empty() {
        println!();
        for (id, dest) in rendered.links().iter() {
            println!("[{}] {dest}", id.0);
        }
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        "Usage: dump [options] [path]\n\
\n\
Options:\n\
  --width <n>          Wrap width (default: 80)\n\
  --html               Parse inline {{#style#}}...{{/#}} tags\n\
  --links              List link destinations after the output\n\
  --base-url <url>     Resolve relative links against this base\n\
  --row-padding <n>    Blank lines under each table row (default: 5)\n\
  --bullet <glyph>     Bullet for unordered lists\n\
  -h, --help           Show this help\n\
\n\
If [path] is omitted, reads from stdin."
    );
}

fn parse_u16(args: &[String], i: &mut usize, flag: &str) -> io::Result<u16> {
    let Some(v) = args.get(*i + 1) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{flag} expects a value"),
        ));
    };
    *i += 2;
    v.parse::<u16>().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{flag} invalid u16: {e}"),
        )
    })
}

fn parse_string(args: &[String], i: &mut usize, flag: &str) -> io::Result<String> {
    let Some(v) = args.get(*i + 1) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{flag} expects a value"),
        ));
    };
    *i += 2;
    Ok(v.to_string())
}

fn line_to_plain(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|s| s.content.as_ref())
        .collect::<Vec<_>>()
        .join("")
}

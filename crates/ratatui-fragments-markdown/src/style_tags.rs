//! Style-tag scanner.
//!
//! HTML fragments reach the renderer with inline styling rewritten into a small tag language:
//!
//! ```text
//! plain {#color:red; font-weight:bold#}warm words{/#} tail
//! ```
//!
//! `{#` opens a style group whose declarations run up to `#}`; `{/#}` closes the most recent
//! group. [`scan`] splits a buffer into word fragments, each carrying the style that was
//! active when it was flushed. The group stack is owned by the caller and survives across
//! calls, so a group opened in one flush stays active in the next one.
use std::str::FromStr;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

pub const OPEN_STYLE: &str = "{#";
pub const HALF_CLOSE_STYLE: &str = "#}";
pub const CLOSE_STYLE: &str = "{/#}";

/// Last character of [`CLOSE_STYLE`]; a close tag takes effect when it is reached.
const CLOSE_TERMINATOR: char = '}';

/// A named inline style scope, e.g. `color:red; font-weight:bold`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleGroup {
    pub name: String,
    pub style: Style,
}

impl StyleGroup {
    /// Parses `;`-separated `property:value` declarations.
    ///
    /// Unknown properties and values are ignored; a group that declares nothing usable still
    /// opens a scope (with the default style) so open and close tags stay balanced.
    pub fn parse(name: &str) -> Self {
        let mut style = Style::default();
        for decl in name.split(';') {
            let Some((prop, value)) = decl.split_once(':') else {
                if !decl.trim().is_empty() {
                    log::debug!("ignoring malformed style declaration {decl:?}");
                }
                continue;
            };
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim();
            match prop.as_str() {
                "color" | "foreground" => match parse_color(value) {
                    Some(c) => style = style.fg(c),
                    None => log::debug!("ignoring unknown color {value:?}"),
                },
                "background" | "background-color" => match parse_color(value) {
                    Some(c) => style = style.bg(c),
                    None => log::debug!("ignoring unknown color {value:?}"),
                },
                "font-weight" => {
                    let bold = matches!(value, "bold" | "bolder")
                        || value.parse::<u16>().is_ok_and(|w| w >= 600);
                    if bold {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                }
                "font-style" if value.eq_ignore_ascii_case("italic") => {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                "text-decoration" => {
                    for part in value.split_whitespace() {
                        match part {
                            "underline" => style = style.add_modifier(Modifier::UNDERLINED),
                            "line-through" => style = style.add_modifier(Modifier::CROSSED_OUT),
                            _ => {}
                        }
                    }
                }
                _ => log::debug!("ignoring style property {prop:?}"),
            }
        }
        Self {
            name: name.to_string(),
            style,
        }
    }
}

fn parse_color(value: &str) -> Option<Color> {
    Color::from_str(&value.to_ascii_lowercase()).ok()
}

/// Active style groups, innermost last.
#[derive(Clone, Debug, Default)]
pub struct StyleStack {
    groups: Vec<StyleGroup>,
}

impl StyleStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: StyleGroup) {
        self.groups.push(group);
    }

    /// Pops the innermost group. Popping an empty stack is a no-op.
    pub fn pop(&mut self) -> Option<StyleGroup> {
        let popped = self.groups.pop();
        if popped.is_none() {
            log::debug!("style close tag without an open group");
        }
        popped
    }

    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// The combined style of all open groups, or `None` when no group is open.
    pub fn active(&self) -> Option<Style> {
        if self.groups.is_empty() {
            return None;
        }
        Some(
            self.groups
                .iter()
                .fold(Style::default(), |acc, g| acc.patch(g.style)),
        )
    }
}

/// A word (or word remainder) flushed by the scanner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    /// Style of the open groups at flush time; `None` for unstyled text.
    pub style: Option<Style>,
    /// Whether whitespace followed this fragment in the source.
    pub space_after: bool,
}

impl Fragment {
    pub fn plain(text: impl Into<String>, space_after: bool) -> Self {
        Self {
            text: text.into(),
            style: None,
            space_after,
        }
    }
}

fn flush(out: &mut Vec<Fragment>, text: &mut String, style: Option<Style>, space_after: bool) {
    if text.is_empty() {
        if space_after && let Some(last) = out.last_mut() {
            last.space_after = true;
        }
        return;
    }
    out.push(Fragment {
        text: std::mem::take(text),
        style,
        space_after,
    });
}

/// Scans `input` in a single forward pass.
///
/// Open and close tags update `stack`; everything else is split into fragments at
/// whitespace. Text directly adjacent to a tag is flushed without `space_after`, so styled
/// runs inside a word render glued to their neighbours.
///
/// Malformed input never fails: an unterminated group declaration is dropped, and a close
/// tag with no open group leaves the stack untouched.
pub fn scan(input: &str, stack: &mut StyleStack) -> Vec<Fragment> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = Vec::new();

    let mut in_style_block = false;
    let mut is_closing_style = false;
    let mut is_closing_block = false;
    let mut curr_style = String::new();
    let mut curr_text = String::new();

    let open: Vec<char> = OPEN_STYLE.chars().collect();
    let half_close: Vec<char> = HALF_CLOSE_STYLE.chars().collect();
    let close: Vec<char> = CLOSE_STYLE.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();

        if !in_style_block && !is_closing_block && ch == open[0] && next == Some(open[1]) {
            flush(&mut out, &mut curr_text, stack.active(), false);
            in_style_block = true;
            continue;
        }

        if !in_style_block && ch == close[0] && next == Some(close[1]) {
            is_closing_block = true;
            continue;
        }

        if is_closing_block {
            if ch == CLOSE_TERMINATOR {
                flush(&mut out, &mut curr_text, stack.active(), false);
                stack.pop();
                is_closing_block = false;
            }
            continue;
        }

        if in_style_block {
            if is_closing_style {
                if ch == half_close[1] {
                    let name = curr_style.strip_prefix(open[1]).unwrap_or(&curr_style);
                    stack.push(StyleGroup::parse(name.trim()));
                    curr_style.clear();
                    is_closing_style = false;
                    in_style_block = false;
                }
                continue;
            }
            if ch == half_close[0] && next == Some(half_close[1]) {
                is_closing_style = true;
                continue;
            }
            curr_style.push(ch);
            continue;
        }

        if ch.is_whitespace() {
            flush(&mut out, &mut curr_text, stack.active(), true);
        } else {
            curr_text.push(ch);
        }
    }

    if in_style_block || is_closing_block {
        log::debug!("unterminated style tag, residual declaration {curr_style:?}");
    }
    flush(&mut out, &mut curr_text, stack.active(), false);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(frags: &[Fragment]) -> Vec<&str> {
        frags.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn plain_text_splits_into_words() {
        let mut stack = StyleStack::new();
        let frags = scan("one two  three", &mut stack);
        assert_eq!(texts(&frags), vec!["one", "two", "three"]);
        assert!(frags[0].space_after);
        assert!(frags[1].space_after);
        assert!(!frags[2].space_after);
        assert!(frags.iter().all(|f| f.style.is_none()));
    }

    #[test]
    fn styled_words_carry_group_style() {
        let mut stack = StyleStack::new();
        let frags = scan("a {#color:red#}b c{/#} d", &mut stack);
        assert_eq!(texts(&frags), vec!["a", "b", "c", "d"]);
        let red = Some(Style::default().fg(Color::Red));
        assert_eq!(frags[0].style, None);
        assert_eq!(frags[1].style, red);
        assert_eq!(frags[2].style, red);
        assert_eq!(frags[3].style, None);
        assert!(stack.is_empty());
    }

    #[test]
    fn text_adjacent_to_tags_is_glued() {
        let mut stack = StyleStack::new();
        let frags = scan("pre{#font-weight:bold#}mid{/#}post", &mut stack);
        assert_eq!(texts(&frags), vec!["pre", "mid", "post"]);
        assert!(frags.iter().all(|f| !f.space_after));
        assert_eq!(
            frags[1].style,
            Some(Style::default().add_modifier(Modifier::BOLD))
        );
    }

    #[test]
    fn nested_groups_patch_styles_and_balance() {
        let mut stack = StyleStack::new();
        let frags = scan(
            "{#color:blue#}x {#text-decoration:underline#}y{/#}{/#}",
            &mut stack,
        );
        assert_eq!(texts(&frags), vec!["x", "y"]);
        assert_eq!(
            frags[1].style,
            Some(
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED)
            )
        );
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn extra_close_tag_does_not_underflow() {
        let mut stack = StyleStack::new();
        let frags = scan("a{/#} b{/#}", &mut stack);
        assert_eq!(texts(&frags), vec!["a", "b"]);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn groups_stay_open_across_scans() {
        let mut stack = StyleStack::new();
        scan("{#color:green#}start", &mut stack);
        assert_eq!(stack.depth(), 1);
        let frags = scan("more{/#}", &mut stack);
        assert_eq!(frags[0].style, Some(Style::default().fg(Color::Green)));
        assert!(stack.is_empty());
    }

    #[test]
    fn unterminated_open_tag_degrades() {
        let mut stack = StyleStack::new();
        let frags = scan("keep {#color:red", &mut stack);
        assert_eq!(texts(&frags), vec!["keep"]);
        assert!(stack.is_empty());
    }

    #[test]
    fn parses_declarations() {
        let group = StyleGroup::parse("color: #ff0000; font-weight: 700; font-style: italic; bogus: 1");
        assert_eq!(
            group.style,
            Style::default()
                .fg(Color::Rgb(255, 0, 0))
                .add_modifier(Modifier::BOLD | Modifier::ITALIC)
        );
        assert_eq!(StyleGroup::parse("nonsense").style, Style::default());
    }
}

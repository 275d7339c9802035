//! Render answer text (markdown with inline/block math) into ratatui lines.
//!
//! Pure transform: the answer string goes in unmodified, styled lines come
//! out. Unrecognized syntax falls through as literal text.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const MATH_STYLE: Style = Style::new()
    .fg(Color::Magenta)
    .add_modifier(Modifier::ITALIC);

/// Render a full answer into display lines. Handles `$$ ... $$` math blocks
/// spanning multiple lines; everything else is parsed per line.
pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut in_math_block = false;

    for raw in text.lines() {
        let trimmed = raw.trim();

        if trimmed == "$$" {
            in_math_block = !in_math_block;
            continue;
        }

        if in_math_block {
            lines.push(Line::from(Span::styled(raw.to_string(), MATH_STYLE)));
            continue;
        }

        // Single-line display math: $$ x^2 $$
        if let Some(inner) = trimmed
            .strip_prefix("$$")
            .and_then(|r| r.strip_suffix("$$"))
        {
            lines.push(Line::from(Span::styled(
                inner.trim().to_string(),
                MATH_STYLE,
            )));
            continue;
        }

        lines.push(parse_line(raw));
    }

    lines
}

/// Parse one line: headings and bullets first, then inline markup.
fn parse_line(text: &str) -> Line<'static> {
    let trimmed = text.trim_start();

    if let Some(heading) = trimmed
        .strip_prefix("### ")
        .or_else(|| trimmed.strip_prefix("## "))
        .or_else(|| trimmed.strip_prefix("# "))
    {
        return Line::from(Span::styled(
            heading.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        let mut spans = vec![Span::styled(
            "• ".to_string(),
            Style::default().fg(Color::Yellow),
        )];
        spans.extend(parse_inline(item));
        return Line::from(spans);
    }

    let spans = parse_inline(text);
    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

/// Convert **bold**, `code`, and $math$ runs into styled spans.
fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                flush_plain(&mut spans, &mut current_text);

                // Find closing **
                let mut bold_text = String::new();
                let mut found_close = false;
                while let Some(c) = chars.next() {
                    if c == '*' && chars.peek() == Some(&'*') {
                        chars.next();
                        found_close = true;
                        break;
                    }
                    bold_text.push(c);
                }

                if found_close && !bold_text.is_empty() {
                    spans.push(Span::styled(
                        bold_text,
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                } else {
                    // No closing **, treat as literal
                    current_text.push_str("**");
                    current_text.push_str(&bold_text);
                }
            }
            '`' => {
                flush_plain(&mut spans, &mut current_text);

                let mut code_text = String::new();
                let mut found_close = false;
                for c in chars.by_ref() {
                    if c == '`' {
                        found_close = true;
                        break;
                    }
                    code_text.push(c);
                }

                if found_close && !code_text.is_empty() {
                    spans.push(Span::styled(
                        code_text,
                        Style::default().fg(Color::Green),
                    ));
                } else {
                    current_text.push('`');
                    current_text.push_str(&code_text);
                }
            }
            '$' => {
                flush_plain(&mut spans, &mut current_text);

                let mut math_text = String::new();
                let mut found_close = false;
                for c in chars.by_ref() {
                    if c == '$' {
                        found_close = true;
                        break;
                    }
                    math_text.push(c);
                }

                if found_close && !math_text.is_empty() {
                    spans.push(Span::styled(math_text, MATH_STYLE));
                } else {
                    current_text.push('$');
                    current_text.push_str(&math_text);
                }
            }
            _ => current_text.push(c),
        }
    }

    flush_plain(&mut spans, &mut current_text);
    spans
}

fn flush_plain(spans: &mut Vec<Span<'static>>, current_text: &mut String) {
    if !current_text.is_empty() {
        spans.push(Span::raw(std::mem::take(current_text)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_plain_text_passes_through() {
        let lines = render_markdown("hello world");
        assert_eq!(lines.len(), 1);
        assert_eq!(span_texts(&lines[0]), vec!["hello world"]);
    }

    #[test]
    fn test_bold_becomes_styled_span() {
        let lines = render_markdown("a **prime** number");
        assert_eq!(span_texts(&lines[0]), vec!["a ", "prime", " number"]);
        assert!(lines[0].spans[1]
            .style
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_unclosed_bold_is_literal() {
        let lines = render_markdown("a **prime number");
        assert_eq!(span_texts(&lines[0]), vec!["a ", "**prime number"]);
    }

    #[test]
    fn test_inline_code() {
        let lines = render_markdown("run `is_prime(7)` to check");
        assert_eq!(
            span_texts(&lines[0]),
            vec!["run ", "is_prime(7)", " to check"]
        );
        assert_eq!(lines[0].spans[1].style.fg, Some(Color::Green));
    }

    #[test]
    fn test_inline_math() {
        let lines = render_markdown("so $x^2 + 1$ is never prime for even x");
        assert_eq!(
            span_texts(&lines[0]),
            vec!["so ", "x^2 + 1", " is never prime for even x"]
        );
        assert_eq!(lines[0].spans[1].style, MATH_STYLE);
    }

    #[test]
    fn test_unclosed_math_is_literal() {
        let lines = render_markdown("costs $5 today");
        assert_eq!(span_texts(&lines[0]), vec!["costs ", "$5 today"]);
    }

    #[test]
    fn test_math_block_fenced_lines() {
        let lines = render_markdown("before\n$$\nE = mc^2\n$$\nafter");
        assert_eq!(lines.len(), 3);
        assert_eq!(span_texts(&lines[1]), vec!["E = mc^2"]);
        assert_eq!(lines[1].spans[0].style, MATH_STYLE);
    }

    #[test]
    fn test_math_block_single_line() {
        let lines = render_markdown("$$ a^2 + b^2 = c^2 $$");
        assert_eq!(lines.len(), 1);
        assert_eq!(span_texts(&lines[0]), vec!["a^2 + b^2 = c^2"]);
        assert_eq!(lines[0].spans[0].style, MATH_STYLE);
    }

    #[test]
    fn test_heading_and_bullet() {
        let lines = render_markdown("## Primes\n- 2 is the only even prime");
        assert_eq!(span_texts(&lines[0]), vec!["Primes"]);
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Cyan));
        assert_eq!(
            span_texts(&lines[1]),
            vec!["• ", "2 is the only even prime"]
        );
    }

    #[test]
    fn test_empty_line_is_preserved() {
        let lines = render_markdown("para one\n\npara two");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].spans.is_empty());
    }
}

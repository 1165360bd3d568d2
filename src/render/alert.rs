use regex::Regex;
use std::sync::LazyLock;

use super::canvas::Canvas;
use super::fmt;
use super::layout::Layout;
use super::palette::PanelColor;
use super::text::{FONT_BODY, FONT_HEADING, FONT_SMALL, draw_text};
use crate::weather::Alert;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Za-z]+:)").unwrap());

const WRAP_COLUMNS: usize = 90;

/// Flatten agency boilerplate into panel-sized lines: strip separators
/// and scheme prefixes, break before "LABEL:" headings, then soft-wrap.
pub(crate) fn normalize_alert_text(desc: &str) -> String {
    let s = desc
        .replace("\n###\n", "")
        .replace("\n\n", "")
        .replace("https://", "");
    let s = LABEL_RE.replace_all(&s, "\n$1");
    let wrapped = s
        .lines()
        .map(wrap_line)
        .collect::<Vec<_>>()
        .join("\n");
    wrapped.replace("\n\n", "\n")
}

fn wrap_line(line: &str) -> String {
    let mut out = String::new();
    let mut col = 0usize;
    for word in line.split_whitespace() {
        let w = word.chars().count();
        if col > 0 && col + 1 + w > WRAP_COLUMNS {
            out.push('\n');
            col = 0;
        } else if col > 0 {
            out.push(' ');
            col += 1;
        }
        out.push_str(word);
        col += w;
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Alert block: event heading in red, timestamp/sender line, then the
/// normalized body. Only the first alert is shown.
pub(super) fn draw(cv: &mut Canvas, layout: &Layout, alert: &Alert) {
    let _ = draw_text(
        cv,
        &capitalize(&alert.event),
        layout.alert_event,
        &FONT_HEADING,
        PanelColor::Red,
    );

    let meta = format!("{}/{}", fmt::alert_stamp(alert.start), alert.sender_name);
    let _ = draw_text(cv, &meta, layout.alert_meta, &FONT_SMALL, PanelColor::Black);

    let body = normalize_alert_text(&alert.description);
    let line_h = (FONT_BODY.character_size.height + 2) as i32;
    for (i, line) in body.lines().enumerate() {
        let y = layout.alert_body.y + i as i32 * line_h;
        if y + line_h > layout.height as i32 {
            break;
        }
        let _ = draw_text(
            cv,
            line,
            embedded_graphics::prelude::Point::new(layout.alert_body.x, y),
            &FONT_BODY,
            PanelColor::Red,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators_and_schemes() {
        let out = normalize_alert_text("Gale warning\n###\nsee https://example.org\n\nnow");
        assert!(!out.contains("###"));
        assert!(!out.contains("https://"));
        assert!(out.contains("example.org"));
    }

    #[test]
    fn breaks_before_labels() {
        let out = normalize_alert_text("Source: Met Office Action: stay indoors");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.iter().any(|l| l.starts_with("Source:")));
        assert!(lines.iter().any(|l| l.starts_with("Action:")));
    }

    #[test]
    fn wraps_long_lines_at_word_boundaries() {
        let long = "word ".repeat(60);
        let out = normalize_alert_text(long.trim());
        for line in out.lines() {
            assert!(line.chars().count() <= WRAP_COLUMNS, "line too long: {line}");
            assert!(!line.ends_with("wor"), "split mid-word: {line}");
        }
    }

    #[test]
    fn capitalizes_event() {
        assert_eq!(capitalize("yellow wind warning"), "Yellow wind warning");
        assert_eq!(capitalize(""), "");
    }
}

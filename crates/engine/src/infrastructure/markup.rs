//! Paragraph markup renderer.
//!
//! Converts composed plain text into minimal HTML: blank-line separated
//! paragraphs become `<p>` elements, single newlines become `<br>`, and all
//! text is HTML-escaped. Deterministic, so cached descriptions diff cleanly.

use crate::infrastructure::ports::{MarkupRendererPort, RenderError};

#[derive(Debug, Default, Clone, Copy)]
pub struct ParagraphMarkupRenderer;

impl ParagraphMarkupRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl MarkupRendererPort for ParagraphMarkupRenderer {
    fn render(&self, text: &str) -> Result<String, RenderError> {
        let paragraphs: Vec<String> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                let lines: Vec<String> = p.lines().map(|l| escape_html(l.trim())).collect();
                format!("<p>{}</p>", lines.join("<br>"))
            })
            .collect();
        Ok(paragraphs.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_paragraphs() {
        let html = ParagraphMarkupRenderer::new()
            .render("The gate is ablaze.\n\nRain hisses on the embers.")
            .unwrap();
        assert_eq!(
            html,
            "<p>The gate is ablaze.</p>\n<p>Rain hisses on the embers.</p>"
        );
    }

    #[test]
    fn escapes_markup_and_keeps_line_breaks() {
        let html = ParagraphMarkupRenderer::new()
            .render("A sign: <Closed>\n\"Keep out\" & stay")
            .unwrap();
        assert_eq!(
            html,
            "<p>A sign: &lt;Closed&gt;<br>&quot;Keep out&quot; &amp; stay</p>"
        );
    }

    #[test]
    fn empty_text_renders_empty() {
        assert_eq!(ParagraphMarkupRenderer::new().render("  \n\n ").unwrap(), "");
    }
}

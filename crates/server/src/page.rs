//! HTML rendering for the single-page viewer.
//!
//! One page: a title selector on the left and up to five poster cards.

use std::fmt::Write;

use crate::orchestrator::MovieRecommendation;

/// Shown when a lookup fails or yields nothing
pub const NO_RECOMMENDATIONS: &str = "Could not generate recommendations.";

const STYLE: &str = r#"
body { background-color: #f0f2f6; font-family: sans-serif; margin: 0; display: flex; }
.sidebar { width: 280px; padding: 20px; background: #ffffff; min-height: 100vh; }
.sidebar select { width: 100%; margin: 10px 0; }
.content { flex: 1; padding: 20px; }
.cards { display: flex; flex-wrap: wrap; }
.movie-card { width: 220px; height: 350px; background-color: #ffffff; border-radius: 10px;
  padding: 10px; margin: 10px; text-align: center; box-shadow: 0 4px 8px rgba(0, 0, 0, 0.1);
  transition: transform 0.2s; }
.movie-card:hover { transform: scale(1.05); }
.movie-card img { width: 100%; height: 250px; object-fit: cover; border-radius: 5px; }
.movie-title { font-size: 16px; font-weight: 600; margin-top: 8px; color: #333333;
  white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
.warning { background: #fffae6; color: #7a5c00; padding: 10px; border-radius: 5px; }
"#;

/// Escape text for use in element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page: sidebar selector plus the given content block
pub fn render_page<'a>(
    titles: impl IntoIterator<Item = &'a str>,
    selected: Option<&str>,
    content: &str,
) -> String {
    let mut options = String::new();
    for title in titles {
        let escaped = escape_html(title);
        let marker = if Some(title) == selected { " selected" } else { "" };
        let _ = write!(options, "<option value=\"{escaped}\"{marker}>{escaped}</option>");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Movie Recommender</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <form class=\"sidebar\" action=\"/recommend\" method=\"get\">\n\
         <h2>Movie Selection</h2>\n<label for=\"title\">Choose a movie</label>\n\
         <select id=\"title\" name=\"title\">{options}</select>\n\
         <button type=\"submit\">Show Recommendations</button>\n</form>\n\
         <main class=\"content\">{content}</main>\n</body>\n</html>\n"
    )
}

/// One card per recommendation, in order
pub fn render_cards(recommendations: &[MovieRecommendation]) -> String {
    let mut cards = String::from("<h2>Recommended Movies</h2>\n<div class=\"cards\">\n");
    for rec in recommendations {
        let _ = write!(
            cards,
            "<div class=\"movie-card\"><img src=\"{}\" alt=\"Poster\">\
             <div class=\"movie-title\">{}</div></div>\n",
            escape_html(&rec.poster_url),
            escape_html(&rec.title)
        );
    }
    cards.push_str("</div>\n");
    cards
}

pub fn render_warning(message: &str) -> String {
    format!("<div class=\"warning\">{}</div>\n", escape_html(message))
}

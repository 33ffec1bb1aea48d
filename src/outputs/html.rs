//! HTML rendering of the page model.
//!
//! Layout, top to bottom: heading, status line (`#refresh-status`), the
//! release table, then the news section (`section#news`) with its list and
//! provenance label. The output satisfies the same page contract that
//! [`Page::from_html`](crate::page::Page::from_html) reads, so a rendered
//! page can be fed back in as the next input.

use std::fmt::Write;

use crate::models::NewsItem;
use crate::page::{Cell, Page};

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Writes the anchor in place within the cell text so surrounding text
/// such as `UniFi Network (beta)` survives a reload.
fn write_cell(out: &mut String, cell: &Cell) {
    let Some(link) = &cell.link else {
        writeln!(out, "        <td>{}</td>", escape_html(&cell.text)).unwrap();
        return;
    };
    // link text missing from the cell text: anchor only
    let (before, after) = if link.text.is_empty() {
        ("", cell.text.as_str())
    } else {
        cell.text.split_once(link.text.as_str()).unwrap_or(("", ""))
    };
    writeln!(
        out,
        "        <td>{}<a href=\"{}\">{}</a>{}</td>",
        escape_html(before),
        escape_html(&link.href),
        escape_html(&link.text),
        escape_html(after)
    )
    .unwrap();
}

fn write_news_item(out: &mut String, item: &NewsItem) {
    let mut line = if item.link.is_empty() {
        escape_html(&item.title)
    } else {
        format!(
            "<a href=\"{}\">{}</a>",
            escape_html(&item.link),
            escape_html(&item.title)
        )
    };
    if let Some(date) = &item.date {
        write!(line, " <time>{}</time>", escape_html(date)).unwrap();
    }
    writeln!(out, "      <li>{line}</li>").unwrap();
}

/// Render the full page document.
pub fn render_page(page: &Page) -> String {
    let mut out = String::new();

    writeln!(out, "<!doctype html>\n<html>\n<head>").unwrap();
    writeln!(out, "  <meta charset=\"utf-8\">").unwrap();
    writeln!(out, "  <title>{}</title>", escape_html(&page.title)).unwrap();
    writeln!(out, "</head>\n<body>").unwrap();
    writeln!(out, "  <h1>{}</h1>", escape_html(&page.heading)).unwrap();

    if let Some(status) = &page.status {
        writeln!(out, "  <p id=\"refresh-status\">{}</p>", escape_html(status)).unwrap();
    }

    writeln!(out, "  <table>").unwrap();
    if !page.header.is_empty() {
        writeln!(out, "    <thead>\n      <tr>").unwrap();
        for h in &page.header {
            writeln!(out, "        <th>{}</th>", escape_html(h)).unwrap();
        }
        writeln!(out, "      </tr>\n    </thead>").unwrap();
    }
    writeln!(out, "    <tbody>").unwrap();
    for row in &page.rows {
        writeln!(out, "      <tr>").unwrap();
        for cell in &row.cells {
            write_cell(&mut out, cell);
        }
        writeln!(out, "      </tr>").unwrap();
    }
    writeln!(out, "    </tbody>\n  </table>").unwrap();

    if let Some(news) = &page.news {
        writeln!(out, "  <section id=\"news\">\n    <h2>News</h2>\n    <ul>").unwrap();
        for item in &news.items {
            write_news_item(&mut out, item);
        }
        writeln!(out, "    </ul>").unwrap();
        writeln!(
            out,
            "    <p class=\"provenance\">{}</p>",
            escape_html(&news.provenance)
        )
        .unwrap();
        writeln!(out, "  </section>").unwrap();
    }

    writeln!(out, "</body>\n</html>").unwrap();
    out
}

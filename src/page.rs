//! In-memory model of the release page.
//!
//! A [`Page`] holds the release table, the status line and the news
//! section. It is loaded once from an existing HTML page (or synthesised
//! from the product registry), mutated by every refresh through
//! [`RenderTarget`], and written back out by [`crate::outputs`].
//!
//! # Page contract
//!
//! - the first `<table>` is the release table; header cells come from
//!   `thead th`, or from a leading row made only of `th` cells; body rows
//!   are the remaining `tbody` rows
//! - cell 0 names the product, 1 is the version, 2 the description and
//!   3 the release-notes link
//! - `#refresh-status` and `section#news` are picked up when present

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ProductFeed;
use crate::models::{NewsItem, ProductFeedEntry};
use crate::render::{PLACEHOLDER, RELEASE_LINK_TEXT, RenderTarget};
use crate::utils::normalize_whitespace;

const VERSION_CELL: usize = 1;
const DESCRIPTION_CELL: usize = 2;
const LINK_CELL: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Cell {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Whitespace-collapsed text of the first cell.
    pub fn label(&self) -> String {
        self.cells
            .first()
            .map(|c| normalize_whitespace(&c.text))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsSection {
    pub items: Vec<NewsItem>,
    /// Label naming the source host; empty when no source succeeded.
    pub provenance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Page {
    pub title: String,
    /// Top-level heading; the status line renders right after it.
    pub heading: String,
    pub header: Vec<String>,
    pub rows: Vec<Row>,
    pub status: Option<String>,
    /// Rendered right after the table.
    pub news: Option<NewsSection>,
}

impl Page {
    /// A blank page with one row per registered product.
    pub fn for_products(products: &[ProductFeed]) -> Self {
        Self {
            title: "UniFi releases".to_string(),
            heading: "UniFi releases".to_string(),
            header: ["Product", "Version", "Notes", "Link"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows: products
                .iter()
                .map(|p| Row {
                    cells: vec![
                        Cell::text(p.name.clone()),
                        Cell::text(PLACEHOLDER),
                        Cell::text(PLACEHOLDER),
                        Cell::text(PLACEHOLDER),
                    ],
                })
                .collect(),
            status: None,
            news: None,
        }
    }

    /// Read the page contract out of an existing HTML document.
    #[instrument(level = "info", skip_all, fields(bytes = html.len()))]
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let title_sel = Selector::parse("title").unwrap();
        let heading_sel = Selector::parse("h1").unwrap();
        let table_sel = Selector::parse("table").unwrap();
        let header_sel = Selector::parse("thead th").unwrap();
        let body_row_sel = Selector::parse("tbody tr").unwrap();
        let row_sel = Selector::parse("tr").unwrap();
        let cell_sel = Selector::parse("td, th").unwrap();
        let data_cell_sel = Selector::parse("td").unwrap();
        let header_cell_sel = Selector::parse("th").unwrap();
        let anchor_sel = Selector::parse("a").unwrap();
        let status_sel = Selector::parse("#refresh-status").unwrap();
        let news_sel = Selector::parse("section#news").unwrap();
        let news_item_sel = Selector::parse("ul li").unwrap();
        let date_sel = Selector::parse("time").unwrap();
        let provenance_sel = Selector::parse(".provenance").unwrap();

        let text_of = |el: ElementRef<'_>| normalize_whitespace(&el.text().collect::<String>());

        let title = document.select(&title_sel).next().map(text_of).unwrap_or_default();
        let heading = document
            .select(&heading_sel)
            .next()
            .map(text_of)
            .unwrap_or_else(|| title.clone());

        let mut header = Vec::new();
        let mut rows = Vec::new();
        if let Some(table) = document.select(&table_sel).next() {
            header = table.select(&header_sel).map(text_of).collect();

            // without <thead> the parser puts a th-only header row into the implicit tbody
            let mut header_row = None;
            if header.is_empty() {
                if let Some(first) = table.select(&row_sel).next().filter(|tr| {
                    tr.select(&data_cell_sel).next().is_none() && tr.select(&header_cell_sel).next().is_some()
                }) {
                    header = first.select(&header_cell_sel).map(text_of).collect();
                    header_row = Some(first.id());
                }
            }

            let mut body: Vec<ElementRef<'_>> = table
                .select(&body_row_sel)
                .filter(|tr| Some(tr.id()) != header_row)
                .collect();
            if body.is_empty() {
                body = table
                    .select(&row_sel)
                    .filter(|tr| tr.select(&data_cell_sel).next().is_some())
                    .collect();
            }

            rows = body
                .into_iter()
                .map(|tr| Row {
                    cells: tr
                        .select(&cell_sel)
                        .map(|td| Cell {
                            text: text_of(td),
                            link: td.select(&anchor_sel).next().map(|a| Link {
                                href: a.value().attr("href").unwrap_or_default().to_string(),
                                text: text_of(a),
                            }),
                        })
                        .collect(),
                })
                .collect();
        }

        let status = document.select(&status_sel).next().map(text_of);

        let news = document.select(&news_sel).next().map(|section| NewsSection {
            items: section
                .select(&news_item_sel)
                .map(|li| {
                    let anchor = li.select(&anchor_sel).next();
                    let title = anchor.map(text_of).unwrap_or_else(|| text_of(li));
                    let link = anchor
                        .and_then(|a| a.value().attr("href"))
                        .unwrap_or_default();
                    let date = li.select(&date_sel).next().map(text_of);
                    NewsItem::new(title, link).with_date(date)
                })
                .collect(),
            provenance: section
                .select(&provenance_sel)
                .next()
                .map(text_of)
                .unwrap_or_default(),
        });

        debug!(rows = rows.len(), has_news = news.is_some(), "Loaded page");
        Self {
            title,
            heading,
            header,
            rows,
            status,
            news,
        }
    }

    /// First row whose first cell contains `product`, case-insensitively.
    ///
    /// First match wins, not best match: with rows "UniFi Protect (Cloud
    /// Key)" and "UniFi Protect", a search for "UniFi Protect" returns the
    /// former.
    pub fn find_row(&self, product: &str) -> Option<usize> {
        let needle = product.to_lowercase();
        self.rows
            .iter()
            .position(|row| row.label().to_lowercase().contains(&needle))
    }

    pub fn row_mut(&mut self, product: &str) -> Option<&mut Row> {
        let index = self.find_row(product)?;
        self.rows.get_mut(index)
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() { PLACEHOLDER } else { value }
}

/// Write a feed entry into the fixed cells of a row.
///
/// Rows shorter than four cells are padded first. Empty values become the
/// placeholder, an empty description falls back to the entry title, and
/// the link cell reuses its existing anchor when it has one.
///
/// # Arguments
///
/// * `row` - The located row, or `None` when no row matched
/// * `entry` - Newest entry of the product's feed
///
/// Passing `None` changes nothing.
pub fn apply_entry(row: Option<&mut Row>, entry: &ProductFeedEntry) {
    let Some(row) = row else {
        return;
    };
    if row.cells.len() <= LINK_CELL {
        row.cells.resize_with(LINK_CELL + 1, Cell::default);
    }

    row.cells[VERSION_CELL].text = or_placeholder(&entry.version).to_string();

    let description = if entry.description.is_empty() {
        &entry.title
    } else {
        &entry.description
    };
    row.cells[DESCRIPTION_CELL].text = or_placeholder(description).to_string();

    let (href, text) = if entry.link.is_empty() {
        ("#", PLACEHOLDER)
    } else {
        (entry.link.as_str(), RELEASE_LINK_TEXT)
    };
    let cell = &mut row.cells[LINK_CELL];
    let link = cell.link.get_or_insert_with(Link::default);
    link.href = href.to_string();
    link.text = text.to_string();
    cell.text = text.to_string();
}

impl RenderTarget for Page {
    fn upsert_product_row(&mut self, product: &str, entry: &ProductFeedEntry) -> bool {
        let row = self.row_mut(product);
        let found = row.is_some();
        apply_entry(row, entry);
        found
    }

    fn replace_news(&mut self, items: &[NewsItem], provenance: Option<&str>) {
        let section = self.news.get_or_insert_with(NewsSection::default);
        section.items = items.to_vec();
        section.provenance = provenance.unwrap_or_default().to_string();
    }

    fn set_status(&mut self, text: &str) {
        self.status = Some(text.to_string());
    }
}

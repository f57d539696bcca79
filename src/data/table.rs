//! HTML table extraction
//!
//! Pulls a named `<table>` out of a parsed document and flattens it into
//! headers and rows of trimmed cell text.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML table: one header row plus body rows of cell text
#[derive(Debug, Clone)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Flatten a `<table>` element.
    ///
    /// Headers come from `<th>` cells of the first row that has any; every
    /// row with `<td>` cells becomes a body row.
    pub fn from_element(table: ElementRef) -> Self {
        let tr_selector = Selector::parse("tr").unwrap();
        let th_selector = Selector::parse("th").unwrap();
        let td_selector = Selector::parse("td").unwrap();

        let mut headers = Vec::new();
        let mut rows = Vec::new();

        for tr in table.select(&tr_selector) {
            if headers.is_empty() {
                let ths: Vec<String> = tr.select(&th_selector).map(cell_text).collect();
                if !ths.is_empty() {
                    headers = ths;
                    continue;
                }
            }

            let tds: Vec<String> = tr.select(&td_selector).map(cell_text).collect();
            if !tds.is_empty() {
                rows.push(tds);
            }
        }

        DataTable { headers, rows }
    }

    /// Index of a column by exact header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Find the first `<table>` with the given CSS class
pub fn find_table<'a>(document: &'a Html, class_name: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(&format!("table.{}", class_name)).ok()?;
    document.select(&selector).next()
}

/// Whether any element with the given CSS class is present
pub fn has_class(document: &Html, class_name: &str) -> bool {
    Selector::parse(&format!(".{}", class_name))
        .map(|sel| document.select(&sel).next().is_some())
        .unwrap_or(false)
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

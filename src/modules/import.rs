//! Spreadsheet import: column-letter mapping onto catalog fields.
//!
//! Callers hand over rows of cells plus a mapping such as
//! `{"title": "A", "author": "B", "isbn": "C"}`; spreadsheet parsing itself
//! happens upstream. CSV files are accepted directly as a row source.

use serde::Deserialize;

use crate::models::BookDto;

/// Which spreadsheet column feeds each book field. Letters, not indexes, to
/// match how people read their sheets.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub barcode: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub call_number: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<String>,
    pub language: Option<String>,
    pub pages: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub acquisition_date: Option<String>,
    pub acquisition_method: Option<String>,
    pub price: Option<String>,
    pub notes: Option<String>,
}

/// Convert a spreadsheet column letter to a zero-based index:
/// "A" -> 0, "B" -> 1, ..., "Z" -> 25, "AA" -> 26.
pub fn column_index(letter: &str) -> Option<usize> {
    let letter = letter.trim().to_uppercase();
    if letter.is_empty() || !letter.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }

    let mut index = 0usize;
    for c in letter.chars() {
        index = index * 26 + (c as usize - 'A' as usize + 1);
    }
    Some(index - 1)
}

fn cell<'a>(row: &'a [String], letter: Option<&str>) -> Option<&'a str> {
    let index = column_index(letter?)?;
    row.get(index).map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn cell_string(row: &[String], letter: Option<&str>) -> Option<String> {
    cell(row, letter).map(|s| s.to_string())
}

/// Build a book from one spreadsheet row. Fails only when the mapped title
/// cell is missing or empty; every other field degrades to empty.
pub fn map_row(mapping: &ColumnMapping, row: &[String]) -> Result<BookDto, String> {
    let title = cell(row, Some(&mapping.title))
        .ok_or_else(|| "Row has no title in the mapped column".to_string())?
        .to_string();

    let barcode = cell_string(row, mapping.barcode.as_deref()).unwrap_or_default();

    Ok(BookDto {
        id: None,
        title,
        author: cell_string(row, mapping.author.as_deref()),
        isbn: cell_string(row, mapping.isbn.as_deref()),
        barcode,
        status: None,
        category: cell_string(row, mapping.category.as_deref()),
        sub_category: cell_string(row, mapping.sub_category.as_deref()),
        call_number: cell_string(row, mapping.call_number.as_deref()),
        publisher: cell_string(row, mapping.publisher.as_deref()),
        publication_year: cell(row, mapping.publication_year.as_deref())
            .and_then(|s| s.parse().ok()),
        language: cell_string(row, mapping.language.as_deref()),
        pages: cell(row, mapping.pages.as_deref()).and_then(|s| s.parse().ok()),
        description: cell_string(row, mapping.description.as_deref()),
        location: cell_string(row, mapping.location.as_deref()),
        acquisition_date: cell_string(row, mapping.acquisition_date.as_deref()),
        acquisition_method: cell_string(row, mapping.acquisition_method.as_deref()),
        price: cell(row, mapping.price.as_deref()).and_then(|s| s.parse().ok()),
        notes: cell_string(row, mapping.notes.as_deref()),
    })
}

/// Read a headerless CSV payload into rows of cells.
pub fn parse_csv_rows(content: &[u8]) -> Result<Vec<Vec<String>>, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| format!("CSV parse error: {}", e))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(rows)
}

//! Directory lookup with auto-selection.
//!
//! Desks type (or scan) one free-text query; matching runs over whatever the
//! screen already fetched. A single candidate is selected automatically; a
//! tie is broken by an exact match on the normalized name/email/barcode,
//! otherwise all candidates are surfaced for manual disambiguation.

use serde::Serialize;

use crate::models::{BookDto, MemberDto};

/// Label prefix that scanners include in front of the copy number.
pub const BARCODE_PREFIX: &str = "LIB";

/// Result of a directory lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lookup<T> {
    pub selected: Option<T>,
    pub candidates: Vec<T>,
}

impl<T> Default for Lookup<T> {
    fn default() -> Self {
        Self {
            selected: None,
            candidates: Vec::new(),
        }
    }
}

impl<T> Lookup<T> {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Query forms to match against: the normalized text, plus (for scanner
/// input) the same text with the label prefix stripped. The prefix is only
/// stripped when the remainder looks like a copy number, so titles that
/// merely start with "lib" are left alone.
fn query_forms(query: &str) -> Vec<String> {
    let normalized = normalize(query);
    let mut forms = vec![normalized.clone()];

    let prefix = BARCODE_PREFIX.to_lowercase();
    if let Some(rest) = normalized.strip_prefix(&prefix) {
        let rest = rest.trim_start_matches('-');
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            forms.push(rest.to_string());
        }
    }

    forms
}

fn contains_any(field: &str, forms: &[String]) -> bool {
    let lowered = field.to_lowercase();
    forms.iter().any(|f| lowered.contains(f.as_str()))
}

fn select<T: Clone>(candidates: Vec<T>, forms: &[String], exact_keys: impl Fn(&T) -> Vec<String>) -> Lookup<T> {
    match candidates.len() {
        0 => Lookup::default(),
        1 => Lookup {
            selected: Some(candidates[0].clone()),
            candidates,
        },
        _ => {
            let exact = candidates
                .iter()
                .find(|c| {
                    exact_keys(c)
                        .iter()
                        .any(|key| forms.iter().any(|f| f == key))
                })
                .cloned();
            Lookup {
                selected: exact,
                candidates,
            }
        }
    }
}

/// Match members by name, email or role-specific identifier.
pub fn find_member(members: &[MemberDto], query: &str) -> Lookup<MemberDto> {
    let forms = query_forms(query);
    if forms[0].is_empty() {
        return Lookup::default();
    }

    let candidates: Vec<MemberDto> = members
        .iter()
        .filter(|m| {
            contains_any(&m.name, &forms)
                || contains_any(&m.email, &forms)
                || contains_any(&m.identifier, &forms)
        })
        .cloned()
        .collect();

    select(candidates, &forms, |m| {
        vec![normalize(&m.name), normalize(&m.email)]
    })
}

/// Match books by title, ISBN or barcode.
pub fn find_book(books: &[BookDto], query: &str) -> Lookup<BookDto> {
    let forms = query_forms(query);
    if forms[0].is_empty() {
        return Lookup::default();
    }

    let candidates: Vec<BookDto> = books
        .iter()
        .filter(|b| {
            contains_any(&b.title, &forms)
                || b.isbn.as_deref().is_some_and(|isbn| contains_any(isbn, &forms))
                || contains_any(&b.barcode, &forms)
        })
        .cloned()
        .collect();

    select(candidates, &forms, |b| {
        vec![normalize(&b.title), normalize(&b.barcode)]
    })
}

//! Field extraction from results and detail pages

use super::layout;
use crate::document::{self, Document, Element};
use crate::error::{DvdNfoError, Result};
use crate::links;
use crate::types::SearchResult;

/// Every candidate row on a results page, in document order
pub fn candidates(doc: &Document, base_url: &str) -> Result<Vec<SearchResult>> {
    let rows = document::select_all(doc.root(), layout::RESULT_ROW)?;
    let mut results = Vec::with_capacity(rows.len());

    for row in rows {
        let link = document::select_first(row, layout::RESULT_LINK)?;
        let display_name = link.map(document::text_of).unwrap_or_default();
        let detail_url = link
            .and_then(|a| a.value().attr("href"))
            .map(|href| links::absolutize(base_url, href))
            .unwrap_or_default();
        let year = document::select_first(row, layout::RESULT_YEAR)?
            .and_then(|el| parse_year(&document::text_of(el)));

        results.push(SearchResult {
            display_name,
            year,
            detail_url,
        });
    }

    Ok(results)
}

/// Name and year from the detail page heading
pub fn heading(doc: &Document) -> Result<Option<(String, Option<i32>)>> {
    let Some(title) = doc.select_first(layout::DETAIL_TITLE)? else {
        return Ok(None);
    };
    let name = document::text_of(title);
    if name.is_empty() {
        return Ok(None);
    }
    let year = doc
        .select_first(layout::DETAIL_YEAR)?
        .and_then(|el| parse_year(&document::text_of(el)));
    Ok(Some((name, year)))
}

pub fn synopsis(doc: &Document) -> Result<String> {
    doc.select_first(layout::SYNOPSIS)?
        .map(document::text_of)
        .ok_or_else(|| DvdNfoError::extraction("synopsis", "no synopsis paragraph on page"))
}

pub fn genres(doc: &Document) -> Result<Vec<String>> {
    detail_value(doc, |key| key == layout::GENRES_KEY)?
        .map(|text| split_list(&text))
        .ok_or_else(|| DvdNfoError::extraction("genres", "no Genres entry in details block"))
}

/// Moods are optional; `None` when the page has no mood entry
pub fn moods(doc: &Document) -> Result<Option<Vec<String>>> {
    Ok(detail_value(doc, |key| key.starts_with(layout::MOODS_KEY_PREFIX))?.map(|text| split_list(&text)))
}

/// Leading number of the first rating block's value
pub fn guess_rating(doc: &Document) -> Result<Option<f64>> {
    let Some(blocks) = rating_blocks(doc)? else {
        return Ok(None);
    };
    let block = blocks
        .first()
        .copied()
        .ok_or_else(|| DvdNfoError::extraction("guess rating", "rating panel has no blocks"))?;
    leading_number(block, "guess rating").map(Some)
}

/// Leading number of the second rating block's value
pub fn avg_rating(doc: &Document) -> Result<Option<f64>> {
    let Some(blocks) = rating_blocks(doc)? else {
        return Ok(None);
    };
    let block = blocks
        .get(1)
        .copied()
        .ok_or_else(|| DvdNfoError::extraction("average rating", "rating panel has one block"))?;
    leading_number(block, "average rating").map(Some)
}

/// Third whitespace token of the second rating block's text
pub fn num_votes(doc: &Document) -> Result<Option<u64>> {
    let Some(blocks) = rating_blocks(doc)? else {
        return Ok(None);
    };
    let block = blocks
        .get(1)
        .copied()
        .ok_or_else(|| DvdNfoError::extraction("vote count", "rating panel has one block"))?;
    let text = document::text_of(block);
    let token = text
        .split_whitespace()
        .nth(2)
        .ok_or_else(|| DvdNfoError::extraction("vote count", format!("unexpected text '{}'", text)))?;
    let digits: String = token.chars().filter(|c| *c != ',' && *c != '.').collect();
    digits
        .parse::<u64>()
        .map(Some)
        .map_err(|_| DvdNfoError::extraction("vote count", format!("not a number: '{}'", token)))
}

/// Whether the page carries a rating panel at all
pub fn has_rating_panel(doc: &Document) -> bool {
    doc.has_id(layout::RATING_PANEL_ID)
}

/// Scheme-qualified cover image URL
pub fn image_url(doc: &Document, base_url: &str) -> Result<String> {
    doc.select_first(layout::COVER_IMAGE)?
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.trim().is_empty())
        .map(|src| links::absolutize(base_url, src))
        .ok_or_else(|| DvdNfoError::extraction("image url", "no cover image on page"))
}

/// Text of the `dd` sharing a parent with the first `dt` whose label matches
fn detail_value<P>(doc: &Document, key: P) -> Result<Option<String>>
where
    P: Fn(&str) -> bool,
{
    let Some(details) = doc.by_id(layout::DETAILS_ID) else {
        return Ok(None);
    };
    let Some(dt) = document::find_by_text(details, layout::DETAIL_KEY_TAG, key)? else {
        return Ok(None);
    };
    let Some(parent) = document::parent_element(dt) else {
        return Ok(None);
    };
    Ok(document::select_first(parent, layout::DETAIL_VALUE_TAG)?.map(document::text_of))
}

fn rating_blocks(doc: &Document) -> Result<Option<Vec<Element<'_>>>> {
    match doc.by_id(layout::RATING_PANEL_ID) {
        Some(panel) => document::select_all(panel, layout::RATING_BLOCK).map(Some),
        None => Ok(None),
    }
}

fn leading_number(block: Element<'_>, field: &'static str) -> Result<f64> {
    let value = document::select_first(block, layout::RATING_VALUE)?
        .map(document::text_of)
        .ok_or_else(|| DvdNfoError::extraction(field, "rating block has no value"))?;
    let token = value.split(' ').next().unwrap_or_default();
    token
        .parse::<f64>()
        .map_err(|_| DvdNfoError::extraction(field, format!("not a number: '{}'", value)))
}

/// Comma separated list, trimmed, empties dropped
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// First run of four digits, so "2010" and "(2010)" both parse
pub fn parse_year(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    bytes
        .windows(4)
        .enumerate()
        .find(|(i, w)| {
            w.iter().all(u8::is_ascii_digit)
                && bytes.get(i + 4).map_or(true, |b| !b.is_ascii_digit())
                && (*i == 0 || !bytes[i - 1].is_ascii_digit())
        })
        .and_then(|(i, _)| text[i..i + 4].parse().ok())
}

//! Technician listings.
//!
//! The model is asked for a raw JSON array of repair businesses, but replies
//! arrive with varying amounts of decoration: code fences, prose around the
//! array, or an array with broken syntax between valid objects. Parsing here
//! peels those layers off and salvages what it can before giving up.
//!
//! Grounded Maps places are matched back onto parsed entries by name so each
//! listing can link somewhere useful.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A repair business returned by the technician search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    /// Business name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Contact phone number, when the model knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Google Maps link attached from grounding metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_url: Option<String>,
}

impl Technician {
    /// The link to open for this business.
    ///
    /// The grounded Maps link when one was matched, otherwise a Maps search
    /// for the address.
    #[must_use]
    pub fn maps_link(&self) -> String {
        self.maps_url
            .clone()
            .unwrap_or_else(|| maps_search_url(&self.address))
    }
}

/// A Google Maps place from grounding metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRef {
    /// Business title as Maps knows it.
    pub title: String,
    /// Link to the place on Google Maps.
    pub uri: String,
}

/// Result ordering for the technician list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// The order the model returned (its notion of relevance).
    #[default]
    Relevance,
    /// Ascending by business name.
    Name,
}

/// Parse the model's technician listing reply.
///
/// Strips code fences, locates the outermost JSON array, and parses it. When
/// the array as a whole is malformed, individual `{...}` objects are salvaged
/// instead. An empty array is a valid (empty) result.
///
/// # Errors
///
/// Returns [`Error::ListingParse`] when no array is present or nothing in it
/// deserializes as a technician.
pub fn parse_listings(raw: &str) -> Result<Vec<Technician>> {
    let cleaned = strip_code_fences(raw);
    let json = extract_json_array(cleaned)
        .ok_or_else(|| Error::listing_parse("no JSON array in model reply"))?;

    // Try the full array first
    if let Ok(technicians) = serde_json::from_str::<Vec<Technician>>(json) {
        return Ok(technicians);
    }

    // Fall back to salvaging individual objects
    let salvaged = salvage_objects(json);
    if salvaged.is_empty() {
        return Err(Error::listing_parse(
            "model reply contained no parsable technician entries",
        ));
    }
    Ok(salvaged)
}

/// Remove a surrounding markdown code fence, if present.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let opened = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    opened.strip_suffix("```").unwrap_or(opened).trim()
}

/// Extract the outermost JSON array substring.
fn extract_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Recover individual objects from a malformed JSON array.
fn salvage_objects(json: &str) -> Vec<Technician> {
    let mut technicians = Vec::new();
    let mut depth = 0;
    let mut start = None;

    for (i, ch) in json.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        if let Ok(technician) =
                            serde_json::from_str::<Technician>(&json[s..=i])
                        {
                            technicians.push(technician);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    technicians
}

/// Attach grounded Maps links to parsed technicians.
///
/// A place matches a technician when either name contains the other; the
/// first matching place wins.
pub fn attach_place_links(technicians: &mut [Technician], places: &[PlaceRef]) {
    for technician in technicians {
        technician.maps_url = places
            .iter()
            .find(|place| {
                technician.name.contains(&place.title) || place.title.contains(&technician.name)
            })
            .map(|place| place.uri.clone());
    }
}

/// Filter technicians by a case-insensitive substring of name or address.
///
/// An empty query matches everything.
#[must_use]
pub fn filter<'a>(technicians: &'a [Technician], query: &str) -> Vec<&'a Technician> {
    let query = query.to_lowercase();
    technicians
        .iter()
        .filter(|technician| {
            technician.name.to_lowercase().contains(&query)
                || technician.address.to_lowercase().contains(&query)
        })
        .collect()
}

/// Filter then sort a technician list for display.
#[must_use]
pub fn visible<'a>(
    technicians: &'a [Technician],
    query: &str,
    order: SortOrder,
) -> Vec<&'a Technician> {
    let mut visible = filter(technicians, query);
    if order == SortOrder::Name {
        visible.sort_by_key(|technician| technician.name.to_lowercase());
    }
    visible
}

/// Google Maps search URL for an address.
#[must_use]
pub fn maps_search_url(address: &str) -> String {
    format!("https://www.google.com/maps?q={}", encode_query(address))
}

/// Percent-encode a query value, keeping the characters that
/// `encodeURIComponent` keeps.
fn encode_query(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

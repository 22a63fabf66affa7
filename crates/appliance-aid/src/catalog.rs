//! The appliance catalog.
//!
//! A fixed list of appliance types the assistant knows how to troubleshoot,
//! plus resolution from loose user input (flag values, prompt answers) to a
//! catalog entry.

use std::fmt;

use serde::Serialize;

/// A supported appliance type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Appliance {
    /// Stable identifier used in flags and history rows.
    pub id: &'static str,
    /// Human-readable name used in prompts and output.
    pub name: &'static str,
}

impl fmt::Display for Appliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Every appliance the assistant supports, in menu order.
pub const APPLIANCES: [Appliance; 6] = [
    Appliance {
        id: "refrigerator",
        name: "Refrigerator",
    },
    Appliance {
        id: "washer",
        name: "Washing Machine",
    },
    Appliance {
        id: "oven",
        name: "Oven / Stove",
    },
    Appliance {
        id: "ac",
        name: "Air Conditioner",
    },
    Appliance {
        id: "tv",
        name: "Television",
    },
    Appliance {
        id: "microwave",
        name: "Microwave",
    },
];

/// Resolve user input to a catalog entry.
///
/// Matches, in order: the id (case-insensitive), the full name
/// (case-insensitive), then a substring of the name. Returns `None` for
/// anything the catalog doesn't cover.
#[must_use]
pub fn find(query: &str) -> Option<Appliance> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(appliance) = APPLIANCES.iter().find(|a| a.id.eq_ignore_ascii_case(query)) {
        return Some(*appliance);
    }

    let lowered = query.to_lowercase();
    if let Some(appliance) = APPLIANCES
        .iter()
        .find(|a| a.name.to_lowercase() == lowered)
    {
        return Some(*appliance);
    }

    APPLIANCES
        .iter()
        .find(|a| a.name.to_lowercase().contains(&lowered))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_entries() {
        assert_eq!(APPLIANCES.len(), 6);
    }

    #[test]
    fn test_catalog_order() {
        let ids: Vec<&str> = APPLIANCES.iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            vec!["refrigerator", "washer", "oven", "ac", "tv", "microwave"]
        );
    }

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<&str> = APPLIANCES.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), APPLIANCES.len());
    }

    #[test]
    fn test_find_by_id() {
        let appliance = find("washer").unwrap();
        assert_eq!(appliance.name, "Washing Machine");
    }

    #[test]
    fn test_find_by_id_case_insensitive() {
        let appliance = find("AC").unwrap();
        assert_eq!(appliance.name, "Air Conditioner");
    }

    #[test]
    fn test_find_by_name() {
        let appliance = find("television").unwrap();
        assert_eq!(appliance.id, "tv");
    }

    #[test]
    fn test_find_by_name_substring() {
        let appliance = find("stove").unwrap();
        assert_eq!(appliance.id, "oven");

        let appliance = find("wash").unwrap();
        assert_eq!(appliance.id, "washer");
    }

    #[test]
    fn test_find_trims_input() {
        let appliance = find("  microwave  ").unwrap();
        assert_eq!(appliance.id, "microwave");
    }

    #[test]
    fn test_find_unknown() {
        assert!(find("toaster").is_none());
        // Colloquialisms that aren't substrings of a catalog name don't match
        assert!(find("fridge").is_none());
    }

    #[test]
    fn test_find_empty() {
        assert!(find("").is_none());
        assert!(find("   ").is_none());
    }

    #[test]
    fn test_appliance_display() {
        assert_eq!(APPLIANCES[0].to_string(), "Refrigerator");
    }

    #[test]
    fn test_appliance_serialize() {
        let json = serde_json::to_string(&APPLIANCES[3]).unwrap();
        assert!(json.contains("\"id\":\"ac\""));
        assert!(json.contains("Air Conditioner"));
    }
}

//! Heart rate zone registry
//!
//! Six intensity buckets, Zone 0 (rest) through Zone 5 (peak). The registry
//! order is the display order for every zone distribution in the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heart rate zone identifier
///
/// Ordering follows the registry, so a `BTreeMap<ZoneId, _>` iterates zones
/// in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneId {
    Zone0,
    Zone1,
    Zone2,
    Zone3,
    Zone4,
    Zone5,
}

impl ZoneId {
    /// All zones in registry order
    pub const ALL: [ZoneId; 6] = [
        ZoneId::Zone0,
        ZoneId::Zone1,
        ZoneId::Zone2,
        ZoneId::Zone3,
        ZoneId::Zone4,
        ZoneId::Zone5,
    ];

    /// Short identifier (`zone0` .. `zone5`)
    pub fn short_id(&self) -> &'static str {
        match self {
            ZoneId::Zone0 => "zone0",
            ZoneId::Zone1 => "zone1",
            ZoneId::Zone2 => "zone2",
            ZoneId::Zone3 => "zone3",
            ZoneId::Zone4 => "zone4",
            ZoneId::Zone5 => "zone5",
        }
    }

    /// Key used by the data provider in `zone_duration` maps
    pub fn provider_key(&self) -> &'static str {
        match self {
            ZoneId::Zone0 => "zone_zero_milli",
            ZoneId::Zone1 => "zone_one_milli",
            ZoneId::Zone2 => "zone_two_milli",
            ZoneId::Zone3 => "zone_three_milli",
            ZoneId::Zone4 => "zone_four_milli",
            ZoneId::Zone5 => "zone_five_milli",
        }
    }

    /// Resolve a zone key in either the short or the provider form
    ///
    /// Unknown keys return `None`; callers drop them.
    pub fn from_key(key: &str) -> Option<ZoneId> {
        ZoneId::ALL
            .into_iter()
            .find(|zone| zone.short_id() == key || zone.provider_key() == key)
    }

    /// Registry entry for this zone
    pub fn definition(&self) -> &'static ZoneDefinition {
        &ZONE_TABLE[*self as usize]
    }

    pub fn label(&self) -> &'static str {
        self.definition().label
    }

    pub fn color(&self) -> &'static str {
        self.definition().color
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

/// Display metadata for one zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneDefinition {
    pub id: ZoneId,
    pub label: &'static str,
    pub color: &'static str,
}

/// Static zone registry, indexed by `ZoneId as usize`
pub static ZONE_TABLE: [ZoneDefinition; 6] = [
    ZoneDefinition {
        id: ZoneId::Zone0,
        label: "Zone 0 (Rest)",
        color: "#808080",
    },
    ZoneDefinition {
        id: ZoneId::Zone1,
        label: "Zone 1 (Easy)",
        color: "#43b581",
    },
    ZoneDefinition {
        id: ZoneId::Zone2,
        label: "Zone 2 (Moderate)",
        color: "#7289da",
    },
    ZoneDefinition {
        id: ZoneId::Zone3,
        label: "Zone 3 (Hard)",
        color: "#faa61a",
    },
    ZoneDefinition {
        id: ZoneId::Zone4,
        label: "Zone 4 (Very Hard)",
        color: "#f04747",
    },
    ZoneDefinition {
        id: ZoneId::Zone5,
        label: "Zone 5 (Peak)",
        color: "#9b59b6",
    },
];

/// Lookup facade over the static registry
pub struct ZoneTable;

impl ZoneTable {
    /// All definitions in registry order
    pub fn definitions() -> &'static [ZoneDefinition] {
        &ZONE_TABLE
    }

    /// Look up a zone by short id or provider key
    pub fn lookup(key: &str) -> Option<&'static ZoneDefinition> {
        ZoneId::from_key(key).map(|zone| zone.definition())
    }
}

/// Minutes spent in one zone, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneMinutes {
    pub zone: ZoneId,
    pub label: String,
    pub minutes: f64,
    pub color: String,
}

impl ZoneMinutes {
    pub fn new(zone: ZoneId, minutes: f64) -> Self {
        let definition = zone.definition();
        ZoneMinutes {
            zone,
            label: definition.label.to_string(),
            minutes,
            color: definition.color.to_string(),
        }
    }

    /// Minutes rounded for display
    pub fn rounded_minutes(&self) -> i64 {
        self.minutes.round() as i64
    }
}

/// Convert provider milliseconds to minutes without rounding
pub fn millis_to_minutes(millis: f64) -> f64 {
    millis / 60_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_matches_ids() {
        for (index, definition) in ZONE_TABLE.iter().enumerate() {
            assert_eq!(definition.id as usize, index);
            assert_eq!(definition.id.definition(), definition);
        }
        assert_eq!(ZoneTable::definitions().len(), 6);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ZoneId::Zone0.label(), "Zone 0 (Rest)");
        assert_eq!(ZoneId::Zone1.label(), "Zone 1 (Easy)");
        assert_eq!(ZoneId::Zone2.label(), "Zone 2 (Moderate)");
        assert_eq!(ZoneId::Zone3.label(), "Zone 3 (Hard)");
        assert_eq!(ZoneId::Zone4.label(), "Zone 4 (Very Hard)");
        assert_eq!(ZoneId::Zone5.label(), "Zone 5 (Peak)");
    }

    #[test]
    fn test_key_lookup() {
        assert_eq!(ZoneId::from_key("zone2"), Some(ZoneId::Zone2));
        assert_eq!(ZoneId::from_key("zone_two_milli"), Some(ZoneId::Zone2));
        assert_eq!(ZoneId::from_key("zone_five_milli"), Some(ZoneId::Zone5));
        assert_eq!(ZoneId::from_key("zone6"), None);
        assert_eq!(ZoneId::from_key(""), None);

        let definition = ZoneTable::lookup("zone_four_milli").unwrap();
        assert_eq!(definition.color, "#f04747");
        assert!(ZoneTable::lookup("zone_six_milli").is_none());
    }

    #[test]
    fn test_zone_ordering() {
        assert!(ZoneId::Zone0 < ZoneId::Zone1);
        assert!(ZoneId::Zone4 < ZoneId::Zone5);
    }

    #[test]
    fn test_zone_minutes() {
        let minutes = ZoneMinutes::new(ZoneId::Zone3, millis_to_minutes(1_830_000.0));
        assert_eq!(minutes.label, "Zone 3 (Hard)");
        assert_eq!(minutes.color, "#faa61a");
        assert!((minutes.minutes - 30.5).abs() < 1e-9);
        assert_eq!(minutes.rounded_minutes(), 31);
    }

    #[test]
    fn test_zone_id_serialization() {
        assert_eq!(serde_json::to_string(&ZoneId::Zone2).unwrap(), "\"zone2\"");
        let zone: ZoneId = serde_json::from_str("\"zone5\"").unwrap();
        assert_eq!(zone, ZoneId::Zone5);
    }
}

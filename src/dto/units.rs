use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    pub multiplier: f64,
    pub offset: f64,
}

impl UnitConversion {
    /// Converts a value in this unit to the quantity's base unit.
    pub fn to_base(&self, value: f64) -> f64 {
        (value + self.offset) * self.multiplier
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub external_id: String,
    pub name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub alias_names: Vec<String>,
    pub quantity: String,
    pub conversion: UnitConversion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitList {
    pub items: Vec<Unit>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_catalog_entry_deserializes() {
        let unit: Unit = serde_json::from_value(json!({
            "externalId": "temperature:deg_c",
            "name": "DEG_C",
            "longName": "degree Celsius",
            "symbol": "°C",
            "aliasNames": ["degC", "Celsius"],
            "quantity": "Temperature",
            "conversion": {"multiplier": 1.0, "offset": 273.15},
            "source": "qudt.org"
        }))
        .unwrap();
        assert_eq!(unit.external_id, "temperature:deg_c");
        assert_eq!(unit.alias_names.len(), 2);
        assert_eq!(unit.source_reference, None);
        assert!((unit.conversion.to_base(0.0) - 273.15).abs() < 1e-9);
    }
}

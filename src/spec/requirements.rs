//! Parsed-requirements shape as returned by the language model.
//!
//! JSON shape (abridged; every field optional):
//! {
//!   "system_overview": { "design_complexity": "low/medium/high" },
//!   "primary_components": {
//!     "processor": { "type": "MCU", "specific_part": "STM32F407" },
//!     "memory": { "ram_type": "DDR4", "ram_size": "2GB", "flash_type": "QSPI", ... },
//!     "power_system": {
//!       "input_voltage": "12V",
//!       "protection": ["overcurrent", ...],
//!       "rails_needed": [ {"voltage": "5V", "current": "2A", "purpose": "peripherals"}, "3.3V" ]
//!     },
//!     "interfaces_communication": [ {"type": "Ethernet", "speed": "1Gbps"}, "SPI" ],
//!     "analog_signal_chain": { "adc": {...}, "dac": {...}, "sensors": [...], "amplifiers": [...] },
//!     "power_stage": { "relevant_for": "...", "switches": {...}, "gate_drivers": {...} },
//!     "rf_frontend": { "relevant_for": "...", "components": [...], "matching_networks": [...] },
//!     "clocking": { "primary_clock": { "frequency": "25MHz", "source": "crystal" } },
//!     "user_interface": { "display": { "type": "LCD" }, "input": ["buttons"] },
//!     "storage_logging": { "sd_card": "yes", "eeprom": { "size": "32KB", "interface": "I2C" } }
//!   }
//! }
//!
//! Model output is loose in two documented spots: power-rail entries and
//! interface entries may be bare strings instead of objects, and a few scalar
//! fields arrive as either JSON numbers or strings. Both are handled with
//! untagged enums.

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedRequirements {
    #[serde(default)]
    pub system_overview: Option<SystemOverview>,

    #[serde(default)]
    pub primary_components: Option<PrimaryComponents>,
}

impl ParsedRequirements {
    /// Complexity recorded in diagram metadata.
    pub fn design_complexity(&self) -> &str {
        self.system_overview
            .as_ref()
            .and_then(|o| o.design_complexity.as_deref())
            .unwrap_or("medium")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemOverview {
    #[serde(default)]
    pub design_complexity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrimaryComponents {
    #[serde(default)]
    pub processor: Option<Processor>,

    #[serde(default)]
    pub memory: Option<Memory>,

    #[serde(default)]
    pub power_system: Option<PowerSystem>,

    #[serde(default)]
    pub interfaces_communication: Vec<InterfaceRef>,

    #[serde(default)]
    pub analog_signal_chain: Option<AnalogChain>,

    #[serde(default)]
    pub power_stage: Option<PowerStage>,

    #[serde(default)]
    pub rf_frontend: Option<RfFrontend>,

    #[serde(default)]
    pub clocking: Option<Clocking>,

    #[serde(default)]
    pub user_interface: Option<UserInterface>,

    #[serde(default)]
    pub storage_logging: Option<StorageLogging>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Processor {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub specific_part: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Memory {
    #[serde(default)]
    pub ram_type: Option<String>,

    #[serde(default)]
    pub ram_size: Option<String>,

    #[serde(default)]
    pub flash_type: Option<String>,

    #[serde(default)]
    pub flash_size: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PowerSystem {
    #[serde(default)]
    pub input_voltage: Option<String>,

    #[serde(default)]
    pub protection: Vec<String>,

    #[serde(default)]
    pub rails_needed: Vec<RailRef>,
}

/// Power rail entry: `{voltage, current, purpose}` or a bare voltage string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RailRef {
    Spec(RailSpec),
    Bare(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RailSpec {
    #[serde(default)]
    pub voltage: Option<String>,

    #[serde(default)]
    pub current: Option<String>,

    #[serde(default)]
    pub purpose: Option<String>,
}

impl RailRef {
    pub fn voltage(&self) -> &str {
        match self {
            RailRef::Spec(rail) => rail.voltage.as_deref().unwrap_or("3.3V"),
            RailRef::Bare(voltage) => voltage,
        }
    }

    pub fn current(&self) -> &str {
        match self {
            RailRef::Spec(rail) => rail.current.as_deref().unwrap_or("TBD"),
            RailRef::Bare(_) => "TBD",
        }
    }

    pub fn purpose(&self) -> &str {
        match self {
            RailRef::Spec(rail) => rail.purpose.as_deref().unwrap_or("system"),
            RailRef::Bare(_) => "system",
        }
    }

    /// Whether this rail is the one that should feed the processor: purpose
    /// mentions "core", or it is a common logic voltage.
    pub fn powers_core(&self) -> bool {
        let core_purpose = match self {
            RailRef::Spec(rail) => rail
                .purpose
                .as_deref()
                .is_some_and(|p| p.contains("core")),
            RailRef::Bare(_) => false,
        };
        core_purpose || matches!(self.voltage(), "3.3V" | "1.8V")
    }
}

/// Interface entry: `{type, speed, ...}` or a bare type string like "SPI".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InterfaceRef {
    Spec(InterfaceSpec),
    Bare(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceSpec {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub speed: Option<ScalarText>,
}

impl InterfaceRef {
    /// Interface type name ("Ethernet", "SPI", ...).
    pub fn kind(&self) -> &str {
        match self {
            InterfaceRef::Spec(spec) => spec.kind.as_deref().unwrap_or(""),
            InterfaceRef::Bare(kind) => kind,
        }
    }

    pub fn speed(&self) -> Option<String> {
        match self {
            InterfaceRef::Spec(spec) => spec.speed.as_ref().map(ToString::to_string),
            InterfaceRef::Bare(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalogChain {
    #[serde(default)]
    pub adc: Option<Adc>,

    #[serde(default)]
    pub dac: Option<Dac>,

    #[serde(default)]
    pub sensors: Vec<Sensor>,

    #[serde(default)]
    pub amplifiers: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Adc {
    #[serde(default)]
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dac {
    #[serde(default)]
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sensor {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PowerStage {
    #[serde(default)]
    pub relevant_for: Option<String>,

    #[serde(default)]
    pub switches: Option<Switches>,

    #[serde(default)]
    pub gate_drivers: Option<GateDrivers>,

    #[serde(default)]
    pub output_stage: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Switches {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub voltage_rating: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GateDrivers {
    #[serde(default)]
    pub channels: Option<ScalarText>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RfFrontend {
    #[serde(default)]
    pub relevant_for: Option<String>,

    #[serde(default)]
    pub components: Vec<RfComponent>,

    #[serde(default)]
    pub matching_networks: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RfComponent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub gain: Option<ScalarText>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Clocking {
    #[serde(default)]
    pub primary_clock: Option<ClockSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockSource {
    #[serde(default)]
    pub frequency: Option<ScalarText>,

    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInterface {
    #[serde(default)]
    pub display: Option<Display>,

    #[serde(default)]
    pub input: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Display {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageLogging {
    #[serde(default)]
    pub sd_card: Option<String>,

    #[serde(default)]
    pub eeprom: Option<Eeprom>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Eeprom {
    #[serde(default)]
    pub size: Option<ScalarText>,

    #[serde(default)]
    pub interface: Option<String>,
}

/// Scalar that may arrive as a JSON string or number ("6" vs 6).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScalarText {
    Text(String),
    Num(serde_json::Number),
}

impl fmt::Display for ScalarText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarText::Text(s) => f.write_str(s),
            ScalarText::Num(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rails_accept_objects_and_bare_strings() {
        let power: PowerSystem = serde_json::from_value(json!({
            "rails_needed": [
                { "voltage": "5V", "current": "2A", "purpose": "peripherals" },
                "1.8V"
            ]
        }))
        .unwrap();

        assert_eq!(power.rails_needed[0].voltage(), "5V");
        assert_eq!(power.rails_needed[0].current(), "2A");
        assert_eq!(power.rails_needed[0].purpose(), "peripherals");

        assert_eq!(power.rails_needed[1].voltage(), "1.8V");
        assert_eq!(power.rails_needed[1].current(), "TBD");
        assert_eq!(power.rails_needed[1].purpose(), "system");
    }

    #[test]
    fn core_rail_detection() {
        let rail: RailRef =
            serde_json::from_value(json!({ "voltage": "1.2V", "purpose": "MCU core" })).unwrap();
        assert!(rail.powers_core());

        let rail: RailRef = serde_json::from_value(json!("3.3V")).unwrap();
        assert!(rail.powers_core());

        let rail: RailRef =
            serde_json::from_value(json!({ "voltage": "48V", "purpose": "motor bus" })).unwrap();
        assert!(!rail.powers_core());
    }

    #[test]
    fn interfaces_accept_objects_and_bare_strings() {
        let ifaces: Vec<InterfaceRef> = serde_json::from_value(json!([
            { "type": "Ethernet", "speed": "1Gbps" },
            "SPI"
        ]))
        .unwrap();

        assert_eq!(ifaces[0].kind(), "Ethernet");
        assert_eq!(ifaces[0].speed().as_deref(), Some("1Gbps"));
        assert_eq!(ifaces[1].kind(), "SPI");
        assert_eq!(ifaces[1].speed(), None);
    }

    #[test]
    fn scalar_text_accepts_numbers() {
        let gd: GateDrivers = serde_json::from_value(json!({ "channels": 6 })).unwrap();
        assert_eq!(gd.channels.unwrap().to_string(), "6");

        let gd: GateDrivers = serde_json::from_value(json!({ "channels": "6" })).unwrap();
        assert_eq!(gd.channels.unwrap().to_string(), "6");
    }

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let parsed: ParsedRequirements = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.primary_components.is_none());
        assert_eq!(parsed.design_complexity(), "medium");
    }
}

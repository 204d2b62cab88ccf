use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Operating mode of the thermostat (`tmode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ThermostatMode {
    Off,
    Heat,
    Cool,
    Auto,
}

impl TryFrom<u8> for ThermostatMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::Heat),
            2 => Ok(Self::Cool),
            3 => Ok(Self::Auto),
            other => Err(format!("invalid tmode value: {}", other)),
        }
    }
}

impl From<ThermostatMode> for u8 {
    fn from(mode: ThermostatMode) -> u8 {
        match mode {
            ThermostatMode::Off => 0,
            ThermostatMode::Heat => 1,
            ThermostatMode::Cool => 2,
            ThermostatMode::Auto => 3,
        }
    }
}

/// Fan operating mode (`fmode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FanMode {
    Auto,
    Circulate,
    On,
}

impl TryFrom<u8> for FanMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Circulate),
            2 => Ok(Self::On),
            other => Err(format!("invalid fmode value: {}", other)),
        }
    }
}

impl From<FanMode> for u8 {
    fn from(mode: FanMode) -> u8 {
        match mode {
            FanMode::Auto => 0,
            FanMode::Circulate => 1,
            FanMode::On => 2,
        }
    }
}

/// Current HVAC activity reported by the thermostat (`tstate`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HvacState {
    Off,
    Heating,
    Cooling,
}

impl TryFrom<u8> for HvacState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::Heating),
            2 => Ok(Self::Cooling),
            other => Err(format!("invalid tstate value: {}", other)),
        }
    }
}

impl From<HvacState> for u8 {
    fn from(state: HvacState) -> u8 {
        match state {
            HvacState::Off => 0,
            HvacState::Heating => 1,
            HvacState::Cooling => 2,
        }
    }
}

/// Program selection mode, CT80 only (`program_mode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProgramMode {
    ProgramA,
    ProgramB,
    Vacation,
    Holiday,
}

impl TryFrom<u8> for ProgramMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::ProgramA),
            1 => Ok(Self::ProgramB),
            2 => Ok(Self::Vacation),
            3 => Ok(Self::Holiday),
            other => Err(format!("invalid program_mode value: {}", other)),
        }
    }
}

impl From<ProgramMode> for u8 {
    fn from(mode: ProgramMode) -> u8 {
        match mode {
            ProgramMode::ProgramA => 0,
            ProgramMode::ProgramB => 1,
            ProgramMode::Vacation => 2,
            ProgramMode::Holiday => 3,
        }
    }
}

/// Thermostat-local wall clock
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThermostatTime {
    /// Day of week, 0 = Monday
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

/// Full state snapshot returned by `GET /tstat`
#[derive(Debug, Clone, Deserialize)]
pub struct TstatState {
    /// Current temperature in degrees Fahrenheit
    pub temp: f64,

    /// Operating mode
    pub tmode: ThermostatMode,

    /// Fan mode
    pub fmode: FanMode,

    /// Whether the target temperature is a temporary override
    #[serde(rename = "override", default, deserialize_with = "bool_from_int")]
    pub override_active: bool,

    /// Whether the target temperature hold is active
    #[serde(default, deserialize_with = "bool_from_int")]
    pub hold: bool,

    /// Temporary heat setpoint, present while heating
    #[serde(default)]
    pub t_heat: Option<f64>,

    /// Temporary cool setpoint, present while cooling
    #[serde(default)]
    pub t_cool: Option<f64>,

    /// Current HVAC activity
    #[serde(default)]
    pub tstate: Option<HvacState>,

    /// Whether the fan is currently running
    #[serde(default, deserialize_with = "opt_bool_from_int")]
    pub fstate: Option<bool>,

    /// Thermostat-local time
    #[serde(default)]
    pub time: Option<ThermostatTime>,
}

/// Self-reported model identity from `GET /tstat/model`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model string in whatever format the device returns it,
    /// e.g. `"CT50 V1.94"`
    pub raw: String,
}

/// System information from `GET /sys`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub uuid: String,
    #[serde(default)]
    pub api_version: Option<u32>,
    #[serde(default)]
    pub fw_version: Option<String>,
    #[serde(default)]
    pub wlan_fw_version: Option<String>,
}

/// A weekly setpoint program from `GET /tstat/program/{heat,cool}`
///
/// The device keys days by index as strings ("0" = Monday) and encodes each
/// day as a flat array alternating minutes-since-midnight and setpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    #[serde(flatten)]
    pub days: BTreeMap<String, Vec<f64>>,
}

impl Program {
    /// Get the raw program entries for a day (0 = Monday)
    pub fn day(&self, day: u8) -> Option<&[f64]> {
        self.days.get(&day.to_string()).map(Vec::as_slice)
    }
}

// The device encodes booleans as 0/1 integers.
fn bool_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    Ok(value != 0)
}

fn opt_bool_from_int<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u8>::deserialize(deserializer)?;
    Ok(value.map(|v| v != 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_tstat_snapshot() {
        let json = r#"{
            "temp": 70.50,
            "tmode": 1,
            "fmode": 0,
            "override": 0,
            "hold": 1,
            "t_heat": 66.00,
            "tstate": 1,
            "fstate": 1,
            "time": {"day": 6, "hour": 12, "minute": 1},
            "t_type_post": 0
        }"#;

        let state: TstatState = serde_json::from_str(json).unwrap();
        assert_eq!(state.temp, 70.5);
        assert_eq!(state.tmode, ThermostatMode::Heat);
        assert_eq!(state.fmode, FanMode::Auto);
        assert!(!state.override_active);
        assert!(state.hold);
        assert_eq!(state.t_heat, Some(66.0));
        assert_eq!(state.t_cool, None);
        assert_eq!(state.tstate, Some(HvacState::Heating));
        assert_eq!(state.fstate, Some(true));
        let time = state.time.unwrap();
        assert_eq!((time.day, time.hour, time.minute), (6, 12, 1));
    }

    #[test]
    fn rejects_out_of_range_mode() {
        let result: Result<ThermostatMode, _> = serde_json::from_str("7");
        assert!(result.is_err());
    }

    #[test]
    fn mode_serializes_to_wire_integer() {
        assert_eq!(serde_json::to_string(&ThermostatMode::Cool).unwrap(), "2");
        assert_eq!(serde_json::to_string(&FanMode::On).unwrap(), "2");
    }

    #[test]
    fn program_day_lookup() {
        let json = r#"{"0": [360, 70, 480, 66], "1": [360, 70]}"#;
        let program: Program = serde_json::from_str(json).unwrap();
        assert_eq!(program.day(0), Some(&[360.0, 70.0, 480.0, 66.0][..]));
        assert_eq!(program.day(2), None);
    }
}

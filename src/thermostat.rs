use crate::connection::Connection;
use crate::error::{RadiothermError, Result};
use crate::types::{
    FanMode, ModelInfo, Program, ProgramMode, SystemInfo, ThermostatMode, ThermostatTime,
    TstatState,
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// The concrete thermostat variants this library knows how to drive
///
/// Variants share the common `/tstat` resource but differ in which optional
/// fields the firmware exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Ct50V109,
    Ct50V188,
    Ct50V194,
    Ct80RevB2V103,
}

impl ModelKind {
    /// The model string the hardware reports for this variant
    pub const fn model_id(self) -> &'static str {
        match self {
            ModelKind::Ct50V109 => "CT50 V1.09",
            ModelKind::Ct50V188 => "CT50 V1.88",
            ModelKind::Ct50V194 => "CT50 V1.94",
            ModelKind::Ct80RevB2V103 => "CT80 RevB2 V1.03",
        }
    }

    /// Whether the firmware exposes a humidity sensor
    pub const fn has_humidity(self) -> bool {
        matches!(self, ModelKind::Ct80RevB2V103)
    }

    /// Whether the firmware exposes program mode selection
    pub const fn has_program_mode(self) -> bool {
        matches!(self, ModelKind::Ct80RevB2V103)
    }
}

/// Handle to a single thermostat on the network
///
/// A `Thermostat` is bound to one device address and one detected model
/// variant. Instances are normally obtained through [`get_thermostat`] or
/// [`get_thermostats`], which perform model detection; callers who already
/// know the variant can construct one directly with [`Thermostat::with_model`].
///
/// Every accessor performs one HTTP request against the device; nothing is
/// cached.
///
/// # Example
///
/// ```no_run
/// use radiotherm::{ThermostatMode, Thermostat, ModelKind};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let tstat = Thermostat::with_model("10.0.0.5".to_string(), ModelKind::Ct50V194)?;
///     println!("Current temperature: {}", tstat.temp().await?);
///     tstat.set_tmode(ThermostatMode::Heat).await?;
///     tstat.set_t_heat(68.0).await?;
///     Ok(())
/// }
/// ```
///
/// [`get_thermostat`]: crate::get_thermostat
/// [`get_thermostats`]: crate::get_thermostats
#[derive(Debug)]
pub struct Thermostat {
    connection: Connection,
    kind: ModelKind,
    address: String,
}

impl Thermostat {
    /// Create a handle for a known model at the given address
    ///
    /// No network I/O is performed; the model is taken on trust.
    pub fn with_model(address: String, kind: ModelKind) -> Result<Self> {
        let connection = Connection::new(&address)?;
        Ok(Self {
            connection,
            kind,
            address,
        })
    }

    /// The network address this handle is bound to
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The detected model variant
    pub fn model_kind(&self) -> ModelKind {
        self.kind
    }

    // ========== Identity ==========

    /// Query the device's self-reported model identity
    pub async fn model(&self) -> Result<ModelInfo> {
        self.connection.model().await
    }

    /// Query system information (uuid, firmware versions)
    pub async fn system_info(&self) -> Result<SystemInfo> {
        self.connection.get_typed("/sys").await
    }

    /// Get the device's user-visible name
    pub async fn name(&self) -> Result<String> {
        self.read_key("/sys/name", "name").await
    }

    /// Set the device's user-visible name
    pub async fn set_name(&self, name: impl Into<String>) -> Result<()> {
        self.connection
            .post("/sys/name", &json!({ "name": name.into() }))
            .await
    }

    // ========== State ==========

    /// Fetch the full thermostat state in one request
    pub async fn status(&self) -> Result<TstatState> {
        self.connection.get_typed("/tstat").await
    }

    /// Get the current temperature in degrees Fahrenheit
    pub async fn temp(&self) -> Result<f64> {
        self.read_key("/tstat/temp", "temp").await
    }

    /// Get the thermostat-local time
    pub async fn time(&self) -> Result<ThermostatTime> {
        self.connection.get_typed("/tstat/time").await
    }

    // ========== Operating mode ==========

    /// Get the operating mode
    pub async fn tmode(&self) -> Result<ThermostatMode> {
        self.read_key("/tstat/tmode", "tmode").await
    }

    /// Set the operating mode
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use radiotherm::{Thermostat, ThermostatMode, ModelKind};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let tstat = Thermostat::with_model("10.0.0.5".to_string(), ModelKind::Ct50V194)?;
    /// tstat.set_tmode(ThermostatMode::Cool).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_tmode(&self, mode: ThermostatMode) -> Result<()> {
        self.connection
            .post("/tstat", &json!({ "tmode": u8::from(mode) }))
            .await
    }

    /// Get the fan mode
    pub async fn fmode(&self) -> Result<FanMode> {
        self.read_key("/tstat/fmode", "fmode").await
    }

    /// Set the fan mode
    pub async fn set_fmode(&self, mode: FanMode) -> Result<()> {
        self.connection
            .post("/tstat", &json!({ "fmode": u8::from(mode) }))
            .await
    }

    // ========== Setpoints ==========

    /// Get the temporary heat setpoint, if the thermostat is heating
    pub async fn t_heat(&self) -> Result<Option<f64>> {
        Ok(self.status().await?.t_heat)
    }

    /// Set a temporary heat setpoint in degrees Fahrenheit
    pub async fn set_t_heat(&self, setpoint: f64) -> Result<()> {
        self.connection
            .post("/tstat", &json!({ "t_heat": setpoint }))
            .await
    }

    /// Get the temporary cool setpoint, if the thermostat is cooling
    pub async fn t_cool(&self) -> Result<Option<f64>> {
        Ok(self.status().await?.t_cool)
    }

    /// Set a temporary cool setpoint in degrees Fahrenheit
    pub async fn set_t_cool(&self, setpoint: f64) -> Result<()> {
        self.connection
            .post("/tstat", &json!({ "t_cool": setpoint }))
            .await
    }

    /// Whether the current setpoint is held indefinitely
    pub async fn hold(&self) -> Result<bool> {
        let hold: u8 = self.read_key("/tstat/hold", "hold").await?;
        Ok(hold != 0)
    }

    /// Enable or disable the setpoint hold
    pub async fn set_hold(&self, hold: bool) -> Result<()> {
        self.connection
            .post("/tstat", &json!({ "hold": u8::from(hold) }))
            .await
    }

    /// Whether a temporary setpoint override is active
    pub async fn override_active(&self) -> Result<bool> {
        let value: u8 = self.read_key("/tstat/override", "override").await?;
        Ok(value != 0)
    }

    // ========== Programs ==========

    /// Fetch the weekly heating program
    pub async fn heat_program(&self) -> Result<Program> {
        self.connection.get_typed("/tstat/program/heat").await
    }

    /// Fetch the weekly cooling program
    pub async fn cool_program(&self) -> Result<Program> {
        self.connection.get_typed("/tstat/program/cool").await
    }

    /// Replace one day of the heating program (day 0 = Monday)
    ///
    /// Entries alternate minutes-since-midnight and setpoint, e.g.
    /// `[360.0, 70.0, 1320.0, 64.0]`.
    pub async fn set_heat_program_day(&self, day: u8, entries: &[f64]) -> Result<()> {
        let path = format!("/tstat/program/heat/{}", day);
        self.connection
            .post(&path, &json!({ day.to_string(): entries }))
            .await
    }

    /// Replace one day of the cooling program (day 0 = Monday)
    pub async fn set_cool_program_day(&self, day: u8, entries: &[f64]) -> Result<()> {
        let path = format!("/tstat/program/cool/{}", day);
        self.connection
            .post(&path, &json!({ day.to_string(): entries }))
            .await
    }

    // ========== Variant-specific fields ==========

    /// Get the relative humidity reading (CT80 only)
    pub async fn humidity(&self) -> Result<f64> {
        self.require("humidity", self.kind.has_humidity())?;
        self.read_key("/tstat/humidity", "humidity").await
    }

    /// Get the program selection mode (CT80 only)
    pub async fn program_mode(&self) -> Result<ProgramMode> {
        self.require("program_mode", self.kind.has_program_mode())?;
        self.read_key("/tstat", "program_mode").await
    }

    /// Set the program selection mode (CT80 only)
    pub async fn set_program_mode(&self, mode: ProgramMode) -> Result<()> {
        self.require("program_mode", self.kind.has_program_mode())?;
        self.connection
            .post("/tstat", &json!({ "program_mode": u8::from(mode) }))
            .await
    }

    fn require(&self, field: &'static str, supported: bool) -> Result<()> {
        if supported {
            Ok(())
        } else {
            Err(RadiothermError::UnsupportedField {
                field,
                model: self.kind.model_id(),
            })
        }
    }

    async fn read_key<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<T> {
        let value = self.connection.get(path).await?;
        let field = value.get(key).cloned().ok_or_else(|| {
            RadiothermError::InvalidResponse(format!("missing '{}' in response from {}", key, path))
        })?;
        Ok(serde_json::from_value(field)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_keeps_address_and_kind() {
        let tstat = Thermostat::with_model("10.0.0.5".to_string(), ModelKind::Ct50V194).unwrap();
        assert_eq!(tstat.address(), "10.0.0.5");
        assert_eq!(tstat.model_kind(), ModelKind::Ct50V194);
    }

    #[tokio::test]
    async fn humidity_is_gated_on_ct50() {
        let tstat = Thermostat::with_model("10.0.0.5".to_string(), ModelKind::Ct50V109).unwrap();
        let err = tstat.humidity().await.unwrap_err();
        assert!(matches!(
            err,
            RadiothermError::UnsupportedField {
                field: "humidity",
                model: "CT50 V1.09"
            }
        ));
    }

    #[tokio::test]
    async fn program_mode_write_is_gated_on_ct50() {
        let tstat = Thermostat::with_model("10.0.0.5".to_string(), ModelKind::Ct50V188).unwrap();
        let err = tstat.set_program_mode(ProgramMode::Vacation).await.unwrap_err();
        assert!(matches!(err, RadiothermError::UnsupportedField { .. }));
    }

    #[test]
    fn model_ids_are_distinct() {
        let kinds = [
            ModelKind::Ct50V109,
            ModelKind::Ct50V188,
            ModelKind::Ct50V194,
            ModelKind::Ct80RevB2V103,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.model_id(), b.model_id());
            }
        }
    }
}

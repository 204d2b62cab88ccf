use crate::error::Result;
use crate::thermostat::{ModelKind, Thermostat};

/// A supported thermostat variant: the model string the hardware reports
/// paired with the constructor for its client implementation.
pub struct VariantDescriptor {
    /// Model identifier exactly as the device reports it in `model.raw`
    pub model_id: &'static str,

    /// Constructor for the concrete variant at a given address
    pub construct: fn(String) -> Result<Thermostat>,
}

/// All supported thermostat variants
///
/// Order determines resolution precedence: [`resolve_variant`] returns the
/// first entry whose `model_id` matches. Supporting a new model means
/// appending one descriptor here.
pub const THERMOSTATS: &[VariantDescriptor] = &[
    VariantDescriptor {
        model_id: "CT50 V1.09",
        construct: |address| Thermostat::with_model(address, ModelKind::Ct50V109),
    },
    VariantDescriptor {
        model_id: "CT50 V1.88",
        construct: |address| Thermostat::with_model(address, ModelKind::Ct50V188),
    },
    VariantDescriptor {
        model_id: "CT50 V1.94",
        construct: |address| Thermostat::with_model(address, ModelKind::Ct50V194),
    },
    VariantDescriptor {
        model_id: "CT80 RevB2 V1.03",
        construct: |address| Thermostat::with_model(address, ModelKind::Ct80RevB2V103),
    },
];

/// Find the variant matching a self-reported model string
///
/// Matching is exact and case-sensitive, in registry order. Returns `None`
/// for unrecognized hardware; callers are expected to skip such devices
/// rather than fail.
pub fn resolve_variant(model_id: &str) -> Option<&'static VariantDescriptor> {
    resolve_in(THERMOSTATS, model_id)
}

fn resolve_in<'a>(
    registry: &'a [VariantDescriptor],
    model_id: &str,
) -> Option<&'a VariantDescriptor> {
    registry.iter().find(|entry| entry.model_id == model_id)
}

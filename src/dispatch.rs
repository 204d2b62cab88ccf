use crate::connection::Connection;
use crate::discovery;
use crate::error::{RadiothermError, Result};
use crate::registry;
use crate::thermostat::Thermostat;
use futures_util::{stream, Stream, StreamExt};
use std::future::Future;

/// Find a thermostat and return a client for its detected model
///
/// With an explicit address the device is contacted directly and discovery
/// never runs. Without one, network discovery is used; it succeeds only when
/// exactly one thermostat answers:
///
/// - more than one device found →
///   [`RadiothermError::MultipleThermostatsFound`] (pass an explicit address
///   to choose one)
/// - no devices found → [`RadiothermError::NoThermostatsFound`]
///
/// Either way, the device is asked for its model string and the matching
/// variant is constructed. `Ok(None)` means the device answered but reported
/// a model this library does not support.
///
/// # Example
///
/// ```no_run
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     if let Some(tstat) = radiotherm::get_thermostat(Some("10.0.0.5")).await? {
///         println!("{} at {}", tstat.model_kind().model_id(), tstat.address());
///         println!("Temperature: {}", tstat.temp().await?);
///     }
///     Ok(())
/// }
/// ```
pub async fn get_thermostat(host_address: Option<&str>) -> Result<Option<Thermostat>> {
    resolve_with(host_address, discovery::discover_address, probe_model).await
}

/// Discover and return clients for every supported thermostat on the network
///
/// Runs discovery, then probes each discovered address for its model in
/// discovery order. The result is a lazy single-pass stream: each address is
/// probed only as the stream is polled. Devices reporting an unsupported
/// model are skipped silently; devices that fail the model query are logged
/// and skipped. Every call re-triggers discovery.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut thermostats = std::pin::pin!(radiotherm::get_thermostats().await?);
///     while let Some(tstat) = thermostats.next().await {
///         println!("{} at {}", tstat.model_kind().model_id(), tstat.address());
///     }
///     Ok(())
/// }
/// ```
pub async fn get_thermostats() -> Result<impl Stream<Item = Thermostat>> {
    let addresses = discovery::discover_address().await?;
    Ok(enumerate(addresses, probe_model))
}

/// Query a device's model string without knowing its variant
async fn probe_model(address: String) -> Result<String> {
    let connection = Connection::new(&address)?;
    Ok(connection.model().await?.raw)
}

async fn resolve_with<D, DF, P, PF>(
    host_address: Option<&str>,
    discover: D,
    probe: P,
) -> Result<Option<Thermostat>>
where
    D: FnOnce() -> DF,
    DF: Future<Output = Result<Vec<String>>>,
    P: Fn(String) -> PF,
    PF: Future<Output = Result<String>>,
{
    let address = match host_address {
        Some(host) => host.to_string(),
        None => select_single(discover().await?)?,
    };

    let model = probe(address.clone()).await?;
    match registry::resolve_variant(&model) {
        Some(variant) => Ok(Some((variant.construct)(address)?)),
        None => {
            tracing::debug!("No variant matches model '{}' reported by {}", model, address);
            Ok(None)
        }
    }
}

fn select_single(mut addresses: Vec<String>) -> Result<String> {
    match addresses.len() {
        0 => Err(RadiothermError::NoThermostatsFound),
        1 => Ok(addresses.remove(0)),
        count => Err(RadiothermError::MultipleThermostatsFound { count }),
    }
}

fn enumerate<P, PF>(addresses: Vec<String>, probe: P) -> impl Stream<Item = Thermostat>
where
    P: Fn(String) -> PF,
    PF: Future<Output = Result<String>>,
{
    stream::iter(addresses).filter_map(move |address| {
        let model_fut = probe(address.clone());
        async move {
            let model = match model_fut.await {
                Ok(model) => model,
                Err(e) => {
                    tracing::warn!("Failed to query model from {}: {}", address, e);
                    return None;
                }
            };

            let variant = match registry::resolve_variant(&model) {
                Some(variant) => variant,
                None => {
                    tracing::debug!(
                        "Skipping {}: no variant matches model '{}'",
                        address,
                        model
                    );
                    return None;
                }
            };

            match (variant.construct)(address.clone()) {
                Ok(thermostat) => Some(thermostat),
                Err(e) => {
                    tracing::warn!("Failed to create client for {}: {}", address, e);
                    None
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermostat::ModelKind;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn addresses(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn explicit_address_never_invokes_discovery() {
        let discovery_ran = Arc::new(AtomicBool::new(false));
        let flag = discovery_ran.clone();

        let thermostat = resolve_with(
            Some("10.0.0.5"),
            move || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(vec![])
            },
            |_address| async { Ok::<String, RadiothermError>("CT50 V1.09".to_string()) },
        )
        .await
        .unwrap()
        .unwrap();

        assert!(!discovery_ran.load(Ordering::SeqCst));
        assert_eq!(thermostat.address(), "10.0.0.5");
        assert_eq!(thermostat.model_kind(), ModelKind::Ct50V109);
    }

    #[tokio::test]
    async fn single_discovered_address_completes_the_chain() {
        let thermostat = resolve_with(
            None::<&str>,
            || async { Ok(addresses(&["192.168.1.30"])) },
            |_address| async { Ok::<String, RadiothermError>("CT80 RevB2 V1.03".to_string()) },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(thermostat.address(), "192.168.1.30");
        assert_eq!(thermostat.model_kind(), ModelKind::Ct80RevB2V103);
    }

    #[tokio::test]
    async fn multiple_discovered_addresses_fail_before_any_probe() {
        let probed = Arc::new(AtomicBool::new(false));
        let flag = probed.clone();

        let err = resolve_with(
            None::<&str>,
            || async { Ok(addresses(&["10.0.0.5", "10.0.0.6", "10.0.0.7"])) },
            move |_address| {
                let flag = flag.clone();
                async move {
                    flag.store(true, Ordering::SeqCst);
                    Ok::<String, RadiothermError>("CT50 V1.09".to_string())
                }
            },
        )
        .await
        .unwrap_err();

        assert!(!probed.load(Ordering::SeqCst));
        assert!(matches!(
            err,
            RadiothermError::MultipleThermostatsFound { count: 3 }
        ));
        // The message reports the actual discovered count
        assert!(err.to_string().contains("found 3 thermostats"));
    }

    #[tokio::test]
    async fn empty_discovery_is_an_explicit_error() {
        let err = resolve_with(
            None::<&str>,
            || async { Ok(vec![]) },
            |_address| async { Ok::<String, RadiothermError>("CT50 V1.09".to_string()) },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RadiothermError::NoThermostatsFound));
    }

    #[tokio::test]
    async fn unrecognized_model_resolves_to_none() {
        let result = resolve_with(
            Some("10.0.0.5"),
            || async { Ok(vec![]) },
            |_address| async { Ok::<String, RadiothermError>("CT999 V0.01".to_string()) },
        )
        .await
        .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn enumerate_skips_unknown_models_and_keeps_discovery_order() {
        let found: Vec<Thermostat> = enumerate(
            addresses(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
            |address| async move {
                Ok::<String, RadiothermError>(match address.as_str() {
                    "10.0.0.1" => "CT50 V1.09".to_string(),
                    "10.0.0.3" => "CT80 RevB2 V1.03".to_string(),
                    _ => "ACME FROST-O-MATIC".to_string(),
                })
            },
        )
        .collect()
        .await;

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].address(), "10.0.0.1");
        assert_eq!(found[0].model_kind(), ModelKind::Ct50V109);
        assert_eq!(found[1].address(), "10.0.0.3");
        assert_eq!(found[1].model_kind(), ModelKind::Ct80RevB2V103);
    }

    #[tokio::test]
    async fn enumerate_skips_devices_that_fail_the_model_query() {
        let found: Vec<Thermostat> = enumerate(
            addresses(&["10.0.0.1", "10.0.0.2"]),
            |address| async move {
                if address == "10.0.0.1" {
                    Err(RadiothermError::InvalidResponse("no body".to_string()))
                } else {
                    Ok("CT50 V1.94".to_string())
                }
            },
        )
        .collect()
        .await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].address(), "10.0.0.2");
    }
}

use crate::error::Result;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout, Instant};

const DISCOVERY_ADDR: &str = "239.255.255.250";
const DISCOVERY_PORT: u16 = 1900;
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

// Marvell SSDP-style discovery handshake understood by the thermostat's
// Wi-Fi module. Devices answer with a datagram carrying a LOCATION header
// pointing at their /sys/ resource.
const DISCOVERY_QUERY: &[u8] =
    b"TYPE: WM-DISCOVER\r\nVERSION: 1.0\r\n\r\nservices: com.marvell.wm.system*\r\n\r\n";

/// Discover thermostat addresses on the local network
///
/// Sends a multicast discovery query and collects replies for the default
/// 5 second window. Returns the addresses in the order the devices answered,
/// de-duplicated.
///
/// # Example
///
/// ```no_run
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let addresses = radiotherm::discover_address().await?;
///     for address in addresses {
///         println!("Found thermostat at {}", address);
///     }
///     Ok(())
/// }
/// ```
pub async fn discover_address() -> Result<Vec<String>> {
    discover_address_with_timeout(DISCOVERY_TIMEOUT).await
}

/// Discover thermostat addresses with a caller-chosen listening window
pub async fn discover_address_with_timeout(window: Duration) -> Result<Vec<String>> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
    socket.set_broadcast(true)?;

    tracing::debug!("Sending discovery query to {}:{}", DISCOVERY_ADDR, DISCOVERY_PORT);
    socket
        .send_to(DISCOVERY_QUERY, (DISCOVERY_ADDR, DISCOVERY_PORT))
        .await?;

    let deadline = Instant::now() + window;
    let mut addresses = Vec::new();
    let mut buf = [0u8; 1024];

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        match timeout(remaining, socket.recv_from(&mut buf)).await {
            Ok(Ok((len, peer))) => {
                let payload = String::from_utf8_lossy(&buf[..len]);
                match parse_discovery_reply(&payload) {
                    Some(address) => {
                        tracing::info!("Found thermostat at {} (reply from {})", address, peer);
                        if !addresses.contains(&address) {
                            addresses.push(address);
                        }
                    }
                    None => {
                        tracing::debug!("Ignoring unrecognized reply from {}", peer);
                    }
                }
            }
            Ok(Err(e)) => return Err(e.into()),
            // Listening window elapsed
            Err(_) => break,
        }
    }

    tracing::debug!("Discovery finished with {} address(es)", addresses.len());
    Ok(addresses)
}

/// Extract the device address from a discovery reply's LOCATION header
///
/// Replies look like `TYPE: WM-NOTIFY\r\n...\r\nLOCATION: http://10.0.0.5/sys/\r\n...`.
fn parse_discovery_reply(payload: &str) -> Option<String> {
    for line in payload.lines() {
        let line = line.trim();
        let lower = line.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("location:") {
            let url = &line[line.len() - rest.len()..];
            let without_scheme = url.trim().strip_prefix("http://")?;
            let host = without_scheme.split('/').next()?;
            if host.is_empty() {
                return None;
            }
            return Some(host.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_location_header() {
        let reply = "TYPE: WM-NOTIFY\r\nVERSION: 1.0\r\n\r\nservices: com.marvell.wm.system\r\nLOCATION: http://10.0.0.5/sys/\r\n\r\n";
        assert_eq!(parse_discovery_reply(reply), Some("10.0.0.5".to_string()));
    }

    #[test]
    fn location_header_is_case_insensitive() {
        let reply = "location: http://192.168.1.20/sys/\r\n";
        assert_eq!(parse_discovery_reply(reply), Some("192.168.1.20".to_string()));
    }

    #[test]
    fn ignores_reply_without_location() {
        let reply = "TYPE: WM-NOTIFY\r\nVERSION: 1.0\r\n\r\n";
        assert_eq!(parse_discovery_reply(reply), None);
    }

    #[test]
    fn ignores_non_http_location() {
        let reply = "LOCATION: ftp://10.0.0.5/sys/\r\n";
        assert_eq!(parse_discovery_reply(reply), None);
    }
}

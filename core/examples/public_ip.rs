//! Look up the public IP address of this machine through ip-api.com.
//!
//! Run with `cargo run -p rest-core --example public_ip`. Set
//! `RUST_LOG`-style filtering through your own subscriber if you want to see
//! the `trace_requests` events.

use rest_core::hooks::trace_requests;
use rest_core::{Client, Json};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct Ip {
    #[serde(default, rename = "as")]
    asn: String,
    #[serde(default)]
    city: String,
    #[serde(default, rename = "countryCode")]
    code: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    isp: String,
    #[serde(default)]
    org: String,
    #[serde(default)]
    query: String,
    #[serde(default)]
    timezone: String,
}

fn main() -> Result<(), rest_core::Error> {
    let mut ip_api = Client::new("http://ip-api.com", Json)?;
    ip_api.add_pre_request_hook(trace_requests());

    let get_ip = ip_api.get("/json");

    let mut ip = Ip::default();
    get_ip.call(&mut ip, [])?;
    println!("ip: {ip:#?}");
    Ok(())
}

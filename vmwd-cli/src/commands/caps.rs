//! `vmwd capabilities` command

use anyhow::Result;
use vmwd_core::Capabilities;

/// Print the guest capabilities of this host.
pub fn capabilities(json: bool) -> Result<()> {
    let caps = Capabilities::probe();

    if json {
        println!("{}", serde_json::to_string_pretty(&caps)?);
        return Ok(());
    }

    println!("Host arch: {}", caps.host_arch);
    for guest in &caps.guests {
        println!("  {:<8} hvm  {}", guest.arch, guest.domain_type);
    }

    Ok(())
}

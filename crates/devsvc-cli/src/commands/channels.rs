//! Channel listing command

use std::collections::BTreeMap;

use colored::Colorize;
use devsvc_core::{ChannelRegistry, ChannelSpec, ConfigResolver};
use serde::Serialize;

use super::print_json;
use crate::error::Result;

/// A channel together with its fully qualified connector properties.
#[derive(Debug, Serialize)]
pub struct ChannelView {
    #[serde(flatten)]
    pub spec: ChannelSpec,
    pub connector_properties: BTreeMap<String, String>,
}

/// List declared channels
pub fn run_channels(resolver: &ConfigResolver, json: bool) -> Result<()> {
    let views = channel_views(resolver)?;

    if json {
        return print_json(&views);
    }

    if views.is_empty() {
        println!("{}", "No channels declared".dimmed());
        println!();
        println!(
            "Declare one under {} in {}.",
            "[channels.<name>]".cyan(),
            "devservices.toml".cyan()
        );
        return Ok(());
    }

    for view in &views {
        let spec = &view.spec;
        println!(
            "{} {} {} {} ({})",
            spec.name.bold(),
            spec.direction.to_string().dimmed(),
            "->".dimmed(),
            spec.topic.cyan(),
            spec.payload
        );
        for (key, value) in &view.connector_properties {
            println!("  {} = {}", key.dimmed(), value);
        }
        println!();
    }
    Ok(())
}

/// Build the channel registry and group its properties by channel.
pub fn channel_views(resolver: &ConfigResolver) -> Result<Vec<ChannelView>> {
    let config = resolver.resolve()?;
    let registry = ChannelRegistry::from_sections(&config.channels)?;
    let properties = registry.properties(&config.kafka)?;

    let views = registry
        .iter()
        .map(|spec| {
            let prefix = spec.property_prefix();
            let connector_properties = properties
                .iter()
                .filter(|(key, _)| key.starts_with(&prefix))
                .cloned()
                .collect();
            ChannelView {
                spec: spec.clone(),
                connector_properties,
            }
        })
        .collect();
    Ok(views)
}

//! Configuration display command

use colored::Colorize;
use devsvc_core::{ConfigResolver, PublishedConfig};
use serde_json::json;

use super::print_json;
use crate::error::Result;

/// Display the effective configuration and the values sync would publish
pub fn run_config(resolver: &ConfigResolver, json: bool) -> Result<()> {
    let config = resolver.resolve()?;
    let target = config
        .compose
        .target_directory
        .join(&config.resource_name);
    let published = PublishedConfig::new(&config.compose, &target);

    if json {
        return print_json(&json!({
            "config": config,
            "published": published.to_json(),
        }));
    }

    let flag = |on: bool| if on { "on".green() } else { "off".dimmed() };

    println!("{}", "Dev Services Configuration".bold());
    println!();
    println!("  {}:", "Compose".dimmed());
    println!("    {:<18} {}", "enabled", flag(config.compose.enabled));
    println!("    {:<18} {}", "auto-update", flag(config.compose.auto_update));
    println!("    {:<18} {}", "force-update", flag(config.compose.force_update));
    println!(
        "    {:<18} {}",
        "target-directory",
        config.compose.target_directory.display()
    );
    println!();

    println!("  {}:", "Kafka".dimmed());
    println!("    {:<18} {}", "bootstrap-servers", config.kafka.bootstrap_servers);
    println!(
        "    {:<18} {}",
        "schema-registry-url",
        config
            .kafka
            .schema_registry_url
            .as_deref()
            .unwrap_or("(none)")
    );
    println!(
        "    {:<18} {}",
        "provision-topics",
        flag(config.kafka.provision_topics)
    );
    println!();

    if config.channels.is_empty() {
        println!("  {:<12} {}", "Channels:".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}:", "Channels".dimmed());
        for name in config.channels.keys() {
            println!("    {} {}", "+".green(), name);
        }
    }
    println!();

    println!("  {}:", "Published".dimmed());
    for (key, value) in published.entries() {
        println!("    {} = {}", key, value);
    }
    Ok(())
}

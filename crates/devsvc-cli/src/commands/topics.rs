//! Topic plan command

use colored::Colorize;
use devsvc_core::{ChannelRegistry, ConfigResolver, plan_topics};
use serde_json::json;

use super::print_json;
use crate::error::Result;

/// Show the topics provisioning would create for the declared channels
pub fn run_topics(resolver: &ConfigResolver, json: bool) -> Result<()> {
    let config = resolver.resolve()?;
    let registry = ChannelRegistry::from_sections(&config.channels)?;
    let plans = plan_topics(&registry, &config.kafka);

    if json {
        return print_json(&json!({
            "provision-topics": config.kafka.provision_topics,
            "bootstrap-servers": config.kafka.bootstrap_servers,
            "topics": plans,
        }));
    }

    if !config.kafka.provision_topics {
        println!(
            "{} (kafka.provision-topics = false)",
            "Topic provisioning is disabled".yellow()
        );
        println!();
    }

    if plans.is_empty() {
        println!("{}", "No topics: no channels declared".dimmed());
        return Ok(());
    }

    println!(
        "{} on {}",
        "Topics".bold(),
        config.kafka.bootstrap_servers.cyan()
    );
    println!();
    for plan in &plans {
        println!(
            "  {} {} (partitions: {}, replication: {})",
            "+".green(),
            plan.topic,
            plan.partitions,
            plan.replication
        );
        println!("      {} {}", "used by".dimmed(), plan.channels.join(", "));
    }
    Ok(())
}

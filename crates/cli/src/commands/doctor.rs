//! `vedaguru doctor`: Diagnose configuration and provider keys.

use vedaguru_config::AppConfig;
use vedaguru_core::ProviderFamily;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Vedaguru Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!("  ℹ️  No config file at {}, using defaults", config_path.display());
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    for family in ProviderFamily::ALL {
        let default = if family == config.default_family() { " (default)" } else { "" };
        if config.api_key(family).is_some() {
            println!("  ✅ {family}{default}: key configured, endpoint {}", config.base_url(family));
        } else if default.is_empty() {
            println!("  ⚠️  {family}: no key, set {} to enable", family.api_key_env());
        } else {
            println!("  ❌ {family}{default}: no key, set {}", family.api_key_env());
            issues += 1;
        }
    }

    if config.cache.enabled {
        println!(
            "  ✅ Response cache: {} entries, {}s TTL",
            config.cache.max_entries, config.cache.ttl_secs
        );
    } else {
        println!("  ℹ️  Response cache disabled");
    }
    println!("  ✅ Topic matching: {}", config.prompts.topic_matching.as_str());

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

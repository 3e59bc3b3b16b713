//! Configuration view command, `primer config`.

use std::path::Path;

use anyhow::Result;

use primer::config::{CONFIG_FILE, ContextConfig};

pub fn cmd_config(project_dir: &Path) -> Result<()> {
    let config_path = project_dir.join(CONFIG_FILE);
    let config = ContextConfig::load(project_dir);

    println!();
    println!("Primer Configuration");
    println!("====================");
    println!();
    if config_path.exists() {
        println!("Config file: {}", config_path.display());
    } else {
        println!("Config file: (none, using defaults)");
    }
    println!();
    println!("budget = {}", config.budget);
    println!("key_files = {:?}", config.key_files);
    println!("exclude_signatures = {:?}", config.exclude_signatures);
    println!("knowledge_dir = \"{}\"", config.knowledge_dir);
    println!("signature_depth = \"{}\"", config.signature_depth);
    println!("auto_knowledge = {}", config.auto_knowledge);
    println!("code_map_format = \"{}\"", config.code_map_format);

    Ok(())
}

//! The `primer generate` command.

use std::path::Path;

use anyhow::{Result, bail};
use console::style;

use primer::compiler::{ContextCompiler, ContextResult};
use primer::config::{ContextConfig, MAX_BUDGET, MIN_BUDGET};
use primer::grammar::GrammarRegistry;
use primer::output;
use primer::project::ProjectInfo;

pub fn cmd_generate(
    project_dir: &Path,
    budget: Option<usize>,
    dry_run: bool,
    stdout: bool,
    json: bool,
) -> Result<()> {
    let mut config = ContextConfig::load(project_dir);
    if let Some(budget) = budget {
        if !(MIN_BUDGET..=MAX_BUDGET).contains(&budget) {
            bail!(
                "Budget {} out of range ({}-{})",
                budget,
                MIN_BUDGET,
                MAX_BUDGET
            );
        }
        config.budget = budget;
    }

    let project = ProjectInfo::from_dir_name(project_dir);
    let mut registry = GrammarRegistry::new();
    let result = ContextCompiler::new(project_dir, &project, &config, &mut registry).compile()?;

    if stdout {
        print!("{}", result.document);
    } else if json {
        print_json(&result)?;
    } else {
        print_summary(&result, config.budget);
    }

    if !dry_run {
        let path = output::persist(&result.document, project_dir)?;
        if !stdout && !json {
            println!();
            println!("Saved to {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(result: &ContextResult, budget: usize) {
    println!();
    println!("{}", style("Context generated").bold());
    println!();
    for section in &result.sections {
        println!("  {:<12} {:>6} tokens", section.id.to_string(), section.tokens_used);
    }
    println!();
    println!(
        "Total: {} tokens (budget {})",
        style(result.total_tokens).bold(),
        budget
    );
    if !result.truncated_files.is_empty() {
        println!(
            "{} file(s) dropped from the code map:",
            result.truncated_files.len()
        );
        for path in &result.truncated_files {
            println!("  {}", style(path).dim());
        }
    }
}

fn print_json(result: &ContextResult) -> Result<()> {
    let sections: Vec<serde_json::Value> = result
        .sections
        .iter()
        .map(|section| {
            serde_json::json!({
                "id": section.id,
                "title": section.title,
                "tokens_used": section.tokens_used,
            })
        })
        .collect();
    let payload = serde_json::json!({
        "sections": sections,
        "total_tokens": result.total_tokens,
        "truncated_files": result.truncated_files,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

//! Template command - lists the built-in filter templates.

use anyhow::{Result, bail};
use clap::Args;
use console::{Style, style};
use foundry_rules_logic::builtin_templates;

use super::Context;

/// Arguments for the template command.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template name to show details
    pub name: Option<String>,

    /// List all available templates
    #[arg(short, long)]
    pub list: bool,
}

/// Run the template command.
pub fn run(args: TemplateArgs, ctx: &Context) -> Result<()> {
    let templates = builtin_templates();

    let name = match args.name {
        Some(name) if !args.list => name,
        _ => {
            if ctx.json_output {
                return ctx.print_json(&templates);
            }
            let dim = Style::new().dim();
            println!("{}", style("Built-in Templates").bold());
            println!("{}", dim.apply_to("─".repeat(60)));
            for t in &templates {
                println!(
                    "  {:<15} {}",
                    style(&t.name).cyan(),
                    t.description
                );
                println!("  {:<15} {}", "", dim.apply_to(t.parameters.join(", ")));
            }
            return Ok(());
        }
    };

    let Some(template) = templates.iter().find(|t| t.name == name) else {
        bail!("Template not found: {}", name);
    };

    if ctx.json_output {
        return ctx.print_json(template);
    }
    println!("{}", style(&template.name).cyan().bold());
    println!();
    println!("{}", template.description);
    println!();
    println!("{}", style("Parameters:").bold());
    for parameter in &template.parameters {
        println!("  - {}", parameter);
    }
    Ok(())
}

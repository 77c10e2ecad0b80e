//! Template browsing commands

use anyhow::Result;
use clap::Subcommand;
use reel_prompt::PromptDocument;

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List preset templates
    List,

    /// Show a template and the prompt it produces
    Show {
        /// Template id
        id: String,
    },
}

pub fn run(cmd: TemplateCommands) -> Result<()> {
    match cmd {
        TemplateCommands::List => {
            for t in reel_prompt::templates()? {
                println!("  {:<14} {}  {}", t.id, t.name, t.description);
            }
            Ok(())
        }
        TemplateCommands::Show { id } => {
            let Some(t) = reel_prompt::template(&id)? else {
                anyhow::bail!("Template '{}' not found", id);
            };
            println!("Template: {} ({})", t.name, t.id);
            println!("  {}", t.description);
            println!("  Video: {} {} {} {}s", t.task_type, t.resolution, t.ratio, t.duration);
            println!();
            println!("{}", PromptDocument::from_template(&t).build_text());
            Ok(())
        }
    }
}

//! Prompt document commands

use anyhow::{Context, Result};
use clap::Subcommand;
use reel_asset::AssetStore;
use reel_core::ReelConfig;
use reel_prompt::{params, PromptDocument, ProjectStore, ELEMENTS};

#[derive(Subcommand)]
pub enum PromptCommands {
    /// Save a prompt document from a JSON file
    Save {
        /// Path to the document JSON
        file: String,
    },

    /// List saved projects, most recent first
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show a saved project
    Show {
        /// Project id
        id: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Delete a saved project
    Delete {
        /// Project id
        id: String,
    },

    /// Print the composed prompt text
    Build {
        /// Project id
        id: String,
    },

    /// Print the generation API request as JSON
    Export {
        /// Project id
        id: String,

        /// Fill missing reference urls from the asset library
        #[arg(long)]
        resolve: bool,
    },

    /// Create and save a project from a template
    New {
        /// Template id (see `reel template list`)
        #[arg(long)]
        template: String,

        /// Project name
        #[arg(long)]
        name: Option<String>,
    },

    /// List models, task types and the supported video parameters
    Params,
}

pub fn run(cmd: PromptCommands, config: &ReelConfig) -> Result<()> {
    let store = ProjectStore::new(config.projects_dir());

    match cmd {
        PromptCommands::Save { file } => run_save(&store, &file),
        PromptCommands::List { format } => run_list(&store, &format),
        PromptCommands::Show { id, format } => run_show(&store, &id, &format),
        PromptCommands::Delete { id } => {
            if !store.delete(&id)? {
                anyhow::bail!("Project '{}' not found", id);
            }
            println!("Deleted project {}", id);
            Ok(())
        }
        PromptCommands::Build { id } => {
            let doc = load(&store, &id)?;
            println!("{}", doc.build_text());
            Ok(())
        }
        PromptCommands::Export { id, resolve } => run_export(&store, config, &id, resolve),
        PromptCommands::New { template, name } => run_new(&store, config, &template, name),
        PromptCommands::Params => {
            for line in params::describe() {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

fn load(store: &ProjectStore, id: &str) -> Result<PromptDocument> {
    store
        .load(id)?
        .ok_or_else(|| anyhow::anyhow!("Project '{}' not found", id))
}

fn run_save(store: &ProjectStore, file: &str) -> Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?;
    let record: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", file))?;
    let mut doc = PromptDocument::from_record(&record)?;

    let id = store.save(&mut doc)?;
    println!("Saved '{}' ({})", doc.name, id);
    Ok(())
}

fn run_list(store: &ProjectStore, format: &str) -> Result<()> {
    let projects = store.list()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No saved projects.");
        return Ok(());
    }
    println!("{} project(s):\n", projects.len());
    for p in &projects {
        println!("  {}  {:<12}  {}", p.id, p.task_type.as_str(), p.name);
    }
    Ok(())
}

fn run_show(store: &ProjectStore, id: &str, format: &str) -> Result<()> {
    let doc = load(store, id)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&doc.to_record())?);
        return Ok(());
    }

    println!("Project: {}", doc.name);
    println!("  Id: {}", doc.id);
    println!("  Task: {} ({})", doc.task_type, doc.task_type.label());
    match params::model(&doc.model) {
        Some(info) => println!("  Model: {} ({})", info.name, info.id),
        None => println!("  Model: {}", doc.model),
    }
    println!(
        "  Video: {} {} {}s",
        doc.resolution, doc.ratio, doc.duration
    );
    for (element, value) in ELEMENTS.iter().zip(doc.elements()) {
        if !value.is_empty() {
            println!("  {}: {}", element.label, value);
        }
    }
    if !doc.ref_assets.is_empty() {
        println!("  References:");
        for r in &doc.ref_assets {
            println!("    {} ({})", r.id, r.role_or_default());
        }
    }
    Ok(())
}

fn run_export(store: &ProjectStore, config: &ReelConfig, id: &str, resolve: bool) -> Result<()> {
    let doc = load(store, id)?;
    let payload = if resolve {
        let assets = AssetStore::open(config.index_path())?;
        doc.to_api_payload_resolved(&assets)
    } else {
        doc.to_api_payload()
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn run_new(
    store: &ProjectStore,
    config: &ReelConfig,
    template_id: &str,
    name: Option<String>,
) -> Result<()> {
    let Some(template) = reel_prompt::template(template_id)? else {
        anyhow::bail!(
            "Template '{}' not found; run `reel template list` for available ids",
            template_id
        );
    };

    let mut doc = PromptDocument::from_template(&template);
    if let Some(model) = &config.prompt.default_model {
        doc.model = model.clone();
    }
    if let Some(name) = name {
        doc.name = name;
    }

    let id = store.save(&mut doc)?;
    println!("Created '{}' ({}) from template {}", doc.name, id, template.id);
    Ok(())
}

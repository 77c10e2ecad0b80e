//! Asset library commands

use super::split_list;
use anyhow::Result;
use clap::Subcommand;
use reel_asset::{Asset, AssetLibrary, AssetQuery, AssetType, ImportOptions, ThumbnailSource};
use reel_core::ReelConfig;

#[derive(Subcommand)]
pub enum AssetCommands {
    /// Import a media file into the library
    Import {
        /// Path to the file (image, video or audio)
        path: String,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List or search assets
    List {
        /// Case-insensitive text matched against name and description
        #[arg(long)]
        query: Option<String>,

        /// Filter by tag
        #[arg(long)]
        tag: Option<String>,

        /// Filter by asset type (image, video, audio)
        #[arg(long = "type")]
        asset_type: Option<AssetType>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show asset info
    Info {
        /// Asset id
        id: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Delete an asset with its file and thumbnail
    Delete {
        /// Asset id
        id: String,
    },

    /// Replace an asset's tags
    Tag {
        /// Asset id
        id: String,

        /// Comma-separated tags; empty clears them
        tags: String,
    },

    /// List every tag in use
    Tags,

    /// Regenerate an asset's thumbnail
    Thumbnail {
        /// Asset id
        id: String,
    },
}

pub fn run(cmd: AssetCommands, config: &ReelConfig) -> Result<()> {
    let library = AssetLibrary::open(config)?;

    match cmd {
        AssetCommands::Import {
            path,
            tags,
            description,
        } => run_import(&library, &path, tags.as_deref(), description),
        AssetCommands::List {
            query,
            tag,
            asset_type,
            format,
        } => {
            let filter = AssetQuery {
                query,
                tag,
                asset_type,
            };
            run_list(&library, &filter, &format)
        }
        AssetCommands::Info { id, format } => run_info(&library, &id, &format),
        AssetCommands::Delete { id } => run_delete(&library, &id),
        AssetCommands::Tag { id, tags } => run_tag(&library, &id, &tags),
        AssetCommands::Tags => {
            for tag in library.all_tags() {
                println!("{}", tag);
            }
            Ok(())
        }
        AssetCommands::Thumbnail { id } => run_thumbnail(&library, &id),
    }
}

fn run_import(
    library: &AssetLibrary,
    path: &str,
    tags: Option<&str>,
    description: String,
) -> Result<()> {
    let options = ImportOptions {
        tags: tags.map(split_list).unwrap_or_default(),
        description,
    };
    let asset = library.import_file(path, options)?;

    println!("Imported '{}' as {} ({})", asset.original_name, asset.id, asset.asset_type);
    println!("  File: {}", library.asset_path(&asset).display());
    println!("  Thumbnail: {}", library.thumbnail_path(&asset).display());
    Ok(())
}

fn run_list(library: &AssetLibrary, filter: &AssetQuery, format: &str) -> Result<()> {
    let assets = library.search(filter);

    if format == "json" {
        let items: Vec<serde_json::Value> = assets.iter().map(Asset::to_record).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if assets.is_empty() {
        println!("No assets found.");
        return Ok(());
    }
    println!("{} asset(s):\n", assets.len());
    for asset in &assets {
        println!(
            "  {}  {:<5}  {} [{}]",
            asset.id,
            asset.asset_type.as_str(),
            asset.name,
            asset.tags.join(", ")
        );
    }
    Ok(())
}

fn run_info(library: &AssetLibrary, id: &str, format: &str) -> Result<()> {
    let Some(asset) = library.get(id) else {
        anyhow::bail!("Asset '{}' not found", id);
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&asset.to_record())?);
        return Ok(());
    }

    println!("Asset: {}", asset.name);
    println!("  Id: {}", asset.id);
    println!("  Type: {}", asset.asset_type);
    println!("  Original name: {}", asset.original_name);
    println!("  Size: {} bytes", asset.file_size);
    println!("  File: {}", library.asset_path(&asset).display());
    println!("  Thumbnail: {}", library.thumbnail_path(&asset).display());
    if !asset.tags.is_empty() {
        println!("  Tags: {}", asset.tags.join(", "));
    }
    if !asset.description.is_empty() {
        println!("  Description: {}", asset.description);
    }
    Ok(())
}

fn run_delete(library: &AssetLibrary, id: &str) -> Result<()> {
    if !library.delete(id)? {
        anyhow::bail!("Asset '{}' not found", id);
    }
    println!("Deleted asset {}", id);
    Ok(())
}

fn run_tag(library: &AssetLibrary, id: &str, tags: &str) -> Result<()> {
    let tags = split_list(tags);
    if !library.update_tags(id, tags.clone())? {
        anyhow::bail!("Asset '{}' not found", id);
    }
    println!("Tags for {}: [{}]", id, tags.join(", "));
    Ok(())
}

fn run_thumbnail(library: &AssetLibrary, id: &str) -> Result<()> {
    let Some(thumbnail) = library.regenerate_thumbnail(id)? else {
        anyhow::bail!("Asset '{}' not found", id);
    };
    let how = match thumbnail.source {
        ThumbnailSource::Native => "decoded image",
        ThumbnailSource::ExternalTool => "extracted frame",
        ThumbnailSource::Placeholder => "placeholder",
    };
    println!("Thumbnail {} regenerated ({})", thumbnail.name, how);
    Ok(())
}

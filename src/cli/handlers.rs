use std::io::{self, Write};
use std::path::Path;

use crate::cli::commands::{Cli, Commands, ExportArgs, GroupAction, GroupArgs, ImportArgs};
use crate::ops::{category_ops, transfer};
use crate::store::collections::load_category_store;
use crate::store::config::resolve_data_dir;
use crate::store::KvStore;

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let store = KvStore::open(&data_dir)?;

    match cli.command {
        None => unreachable!("no subcommand launches the TUI from main"),
        Some(Commands::Export(args)) => cmd_export(&store, args),
        Some(Commands::Import(args)) => cmd_import(&store, args),
        Some(Commands::Group(args)) => cmd_group(&store, args),
    }
}

fn cmd_export(store: &KvStore, args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let file = args.file.as_deref().unwrap_or("daybook-export.json");
    transfer::export_to_file(store, Path::new(file))?;
    let data = transfer::export_all(store);
    println!(
        "exported {} tasks, {} notes, {} plans to {}",
        data.tasks.len(),
        data.notes.len(),
        data.plans.len(),
        file
    );
    Ok(())
}

fn cmd_import(store: &KvStore, args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.yes && !confirm("importing replaces all existing data. continue? [y/N] ")? {
        println!("aborted");
        return Ok(());
    }
    transfer::import_from_file(store, Path::new(&args.file))?;
    println!("imported from {}", args.file);
    Ok(())
}

fn cmd_group(store: &KvStore, args: GroupArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        GroupAction::Add { category, name } => {
            let cs = load_category_store(store);
            let cat = cs
                .categories
                .iter()
                .find(|c| c.name == category)
                .ok_or_else(|| format!("no category named {category:?}"))?;
            category_ops::add_group(store, &name, &cat.id)?;
            println!("added group {name} under {category}");
        }
        GroupAction::Rename { name, new_name } => {
            let id = group_id_by_name(store, &name)?;
            category_ops::rename_group(store, &id, &new_name)?;
            println!("renamed group {name} to {new_name}");
        }
        GroupAction::Rm { name } => {
            let id = group_id_by_name(store, &name)?;
            category_ops::delete_group(store, &id)?;
            println!("removed group {name}");
        }
    }
    Ok(())
}

fn group_id_by_name(store: &KvStore, name: &str) -> Result<String, Box<dyn std::error::Error>> {
    load_category_store(store)
        .groups
        .iter()
        .find(|g| g.name == name)
        .map(|g| g.id.clone())
        .ok_or_else(|| format!("no group named {name:?}").into())
}

fn confirm(prompt: &str) -> Result<bool, io::Error> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

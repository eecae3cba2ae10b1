use anyhow::{Result, bail};
use clap::Subcommand;
use harto_core::{Clock, CustomTaskPatch, Harto, KeyValueStore, NewCustomTask, Pack};
use std::io::{self, Write};

#[derive(Subcommand, Debug)]
pub enum CustomCommand {
    /// List your custom cards (active and inactive)
    List,

    /// Create a custom card
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Pack (daily, daily-npc, weekly, gift-codes, others)
        #[arg(long, default_value = "Others")]
        pack: String,

        /// Number of sequential steps (0 = single action)
        #[arg(long, default_value_t = 0)]
        steps: u32,
    },

    /// Edit fields of a custom card
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// Empty string clears the description
        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        pack: Option<String>,

        #[arg(long)]
        steps: Option<u32>,
    },

    /// Delete a custom card (asks for confirmation)
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },

    /// Reactivate an inactive custom card
    Activate { id: String },

    /// Hide a custom card without deleting it
    Deactivate { id: String },
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N]: ");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(matches!(s.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

pub fn run<S: KeyValueStore, C: Clock>(app: &mut Harto<S, C>, cmd: CustomCommand) -> Result<()> {
    match cmd {
        CustomCommand::List => {
            if app.custom_tasks().is_empty() {
                println!("No custom cards. Add one: harto custom add --title \"...\"");
                return Ok(());
            }
            for t in app.custom_tasks() {
                let state = if t.active { "active" } else { "inactive" };
                let steps = if t.steps > 0 {
                    format!(" | {} steps", t.steps)
                } else {
                    String::new()
                };
                println!("{} | {} | {} | {}{}", t.id, t.pack, state, t.title, steps);
            }
        }

        CustomCommand::Add {
            title,
            description,
            pack,
            steps,
        } => {
            let mut input = NewCustomTask::new(title, Pack::parse_loose(&pack)).with_steps(steps);
            if let Some(d) = description {
                input = input.with_description(d);
            }
            let t = app.add_custom_task(input)?;
            println!("Added {} ({})", t.id, t.pack);
        }

        CustomCommand::Edit {
            id,
            title,
            description,
            pack,
            steps,
        } => {
            let patch = CustomTaskPatch {
                title,
                description,
                pack: pack.as_deref().map(Pack::parse_loose),
                active: None,
                steps,
            };
            let t = app.update_custom_task(&id, patch)?;
            println!("Updated {}: {} ({})", t.id, t.title, t.pack);
        }

        CustomCommand::Delete { id, yes } => {
            let Some(t) = app.custom_tasks().iter().find(|t| t.id == id) else {
                bail!("custom task not found: {id}");
            };
            let question = format!("Delete \"{}\"? Set it inactive instead to keep it.", t.title);
            if !yes && !confirm(&question)? {
                println!("Kept {id}.");
                return Ok(());
            }
            app.delete_custom_task(&id)?;
            println!("Deleted {id}.");
        }

        CustomCommand::Activate { id } => {
            app.set_custom_task_active(&id, true)?;
            println!("Activated {id}.");
        }

        CustomCommand::Deactivate { id } => {
            app.set_custom_task_active(&id, false)?;
            println!("Deactivated {id}. Show it with: harto prefs show-inactive on");
        }
    }

    Ok(())
}

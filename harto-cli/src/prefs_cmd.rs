use anyhow::{Result, bail};
use clap::Subcommand;
use harto_core::{Clock, Harto, KeyValueStore, Theme, ViewMode};

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Print all preferences
    Show,

    /// Show deactivated custom cards on the board (on/off)
    ShowInactive { value: String },

    /// Color theme (light/dark)
    Theme { value: Theme },

    /// Board layout (cards/list)
    View { value: ViewMode },
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => bail!("expected on or off, got '{other}'"),
    }
}

pub fn run<S: KeyValueStore, C: Clock>(app: &mut Harto<S, C>, cmd: PrefsCommand) -> Result<()> {
    match cmd {
        PrefsCommand::Show => {
            println!("region: {}", app.region());
            println!("show_inactive: {}", if app.show_inactive() { "on" } else { "off" });
            println!("theme: {}", app.theme());
            println!("view: {}", app.view_mode());
            let order = app.pending_order();
            if order.is_empty() {
                println!("pending_order: (catalog order)");
            } else {
                println!("pending_order: {}", order.join(", "));
            }
        }
        PrefsCommand::ShowInactive { value } => {
            let on = parse_switch(&value)?;
            app.set_show_inactive(on);
            println!("show_inactive: {}", if on { "on" } else { "off" });
        }
        PrefsCommand::Theme { value } => {
            app.set_theme(value);
            println!("theme: {value}");
        }
        PrefsCommand::View { value } => {
            app.set_view_mode(value);
            println!("view: {value}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_values() {
        assert!(parse_switch("ON").unwrap());
        assert!(!parse_switch("off").unwrap());
        assert!(parse_switch("maybe").is_err());
    }
}

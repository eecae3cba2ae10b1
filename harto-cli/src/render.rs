//! Plain-text board output.

use harto_core::{Board, CardState, CardView, Environment, Pack, ViewMode};

fn progress_mark(card: &CardView) -> String {
    match card.state {
        CardState::Inactive => "[-]".to_string(),
        _ if card.is_completed() => "[x]".to_string(),
        _ if card.steps > 0 => format!("[{}/{}]", card.steps_completed, card.steps),
        _ => "[ ]".to_string(),
    }
}

fn print_card(card: &CardView, view: ViewMode) {
    let mut tags = Vec::new();
    if card.display_pack != card.pack {
        tags.push(format!("from {}", card.pack));
    }
    if card.custom {
        tags.push("custom".to_string());
    }
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!("  ({})", tags.join(", "))
    };

    println!("  {:<7} {:<24} {}{}", progress_mark(card), card.id, card.title, tags);
    if view == ViewMode::Cards {
        if let Some(desc) = card.description.as_deref().filter(|d| !d.is_empty()) {
            println!("          {desc}");
        }
    }
}

pub fn print_header(board: &Board, env: &Environment) {
    let merge = if board.weekly_merge_window {
        " | weekly merge window"
    } else {
        ""
    };
    println!(
        "# Harto | {} | today {} | week of {} | {}{}",
        board.region, board.today, board.week_start, board.slot, merge
    );
    println!(
        "season: {} | weather: {}\n",
        env.season.as_deref().unwrap_or("unknown"),
        env.current_weather().unwrap_or("unknown")
    );
}

/// Print pending cards grouped by display pack, then completed and inactive ones.
pub fn print_board(board: &Board, env: &Environment, view: ViewMode, only: Option<&Pack>) {
    print_header(board, env);

    let wanted = |c: &&CardView| only.is_none_or(|p| c.display_pack == *p);

    let mut packs: Vec<Pack> = Pack::DISPLAY_ORDER.to_vec();
    for c in &board.pending {
        if !packs.contains(&c.display_pack) {
            packs.push(c.display_pack.clone());
        }
    }

    let mut any = false;
    for pack in &packs {
        let cards: Vec<&CardView> = board
            .pending
            .iter()
            .filter(|c| c.display_pack == *pack)
            .filter(wanted)
            .collect();
        if cards.is_empty() {
            continue;
        }
        any = true;
        let count = board.pending_counts.get(pack).copied().unwrap_or(0);
        println!("## {pack} ({count} pending)");
        for c in cards {
            print_card(c, view);
        }
        println!();
    }
    if !any {
        println!("All done. Nothing pending.\n");
    }

    let completed: Vec<&CardView> = board.completed.iter().filter(wanted).collect();
    if !completed.is_empty() {
        println!("## Completed");
        for c in completed {
            print_card(c, view);
        }
        println!();
    }

    let inactive: Vec<&CardView> = board.inactive.iter().filter(wanted).collect();
    if !inactive.is_empty() {
        println!("## Inactive (reactivate with `harto custom activate <id>`)");
        for c in inactive {
            print_card(c, view);
        }
        println!();
    }
}

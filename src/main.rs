// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

use savings_circle::{format_naira, GroupLedger, TierKey, MAX_MEMBERS};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "demo" {
        // Scripted walkthrough mode
        run_demo()?;
    } else {
        // Dashboard mode (default)
        run_ui_mode()?;
    }

    Ok(())
}

fn run_demo() -> Result<()> {
    println!("💰 Savings Circle - Demo Walkthrough");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut ledger = GroupLedger::new();

    // 1. Register one member per tier
    println!("\n🧾 Registering members...");
    for (name, tier) in [
        ("Adaeze", TierKey::Tier1),
        ("Bola", TierKey::Tier2),
        ("Chika", TierKey::Tier3),
    ] {
        let member = ledger.register_member(name, tier)?;
        println!(
            "✓ {} joined {} with ₦{}",
            member.name,
            member.tier_label(),
            format_naira(member.contribution)
        );
    }

    // 2. Show how validation reads at the ledger boundary
    println!("\n🚫 Rejected registrations:");
    if let Err(err) = ledger.register_member("   ", TierKey::Tier1) {
        println!("   empty name     → {}", err);
    }
    if let Err(err) = ledger.register_member_by_key("Dayo", "") {
        println!("   no tier chosen → {}", err);
    }

    // 3. Simulate three weeks of compound interest
    println!("\n⚡ Simulating 3 weeks...");
    for week in 1..=3 {
        ledger.simulate_week()?;
        println!(
            "   Week {}: total saved ₦{}",
            week,
            format_naira(ledger.total_saved())
        );
    }

    // 4. Current dashboard
    println!("\n📊 Dashboard after 3 weeks:");
    for member in ledger.members() {
        println!(
            "   {:<8} {:<18} current ₦{:>10}  interest ₦{:>8}  next week ₦{:>10}",
            member.name,
            member.tier_label(),
            format_naira(member.contribution),
            format_naira(member.weekly_interest()),
            format_naira(member.projected_next_week())
        );
    }
    println!(
        "   Members: {}/{}  |  Total Saved: ₦{}",
        ledger.member_count(),
        MAX_MEMBERS,
        format_naira(ledger.total_saved())
    );

    // 5. Withdraw the first member
    let first_id = ledger.members()[0].id.clone();
    let withdrawn = ledger.withdraw_member(&first_id)?;
    println!(
        "\n👋 {} withdrew ₦{} and has been removed.",
        withdrawn.name,
        format_naira(withdrawn.contribution)
    );

    // 6. Reset
    ledger.reset_group();
    println!("\n🔄 Group reset. Members: {}/{}", ledger.member_count(), MAX_MEMBERS);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Demo complete");

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    println!("🖥️  Loading Savings Group Dashboard...\n");

    let ledger = GroupLedger::new();

    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(ledger);
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin circle-server --features server");
    std::process::exit(1);
}

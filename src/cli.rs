// File: ./src/cli.rs
//! Shared command-line interface logic, like printing help.

pub fn print_help(binary_name: &str) {
    println!(
        "VantageFlow v{} - Turn free-text project notes into a structured project",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!(
        "    {} [--root <path>] [--user <name> [--email <email>]] [--outline | --compact] [-v] [FILE|-]",
        binary_name
    );
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    FILE                  Notes to import. Reads stdin when omitted or '-'.");
    println!("    -r, --root <path>     Use a different directory for config.");
    println!("    -u, --user <name>     Seed this user into the team as owner.");
    println!("    -e, --email <email>   Email of the seeded user.");
    println!("    -o, --outline         Print a readable outline instead of JSON.");
    println!("    -c, --compact         Print single-line JSON.");
    println!("    -v, --verbose         Log debug output to stderr (repeat for trace).");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!(
        "    {} notes.txt                       Import notes as pretty JSON",
        binary_name
    );
    println!(
        "    pbpaste | {} --outline             Preview clipboard notes",
        binary_name
    );
    println!(
        "    {} -u \"Ana Ruiz\" -e ana@acme.io notes.md  Import with Ana as owner",
        binary_name
    );
    println!();
    println!("RECOGNIZED STRUCTURE:");
    println!("    Phase: / # Heading / ALL CAPS / 14 Jan 2026    Phase headers");
    println!("    1. Alpha  2. Beta                             Top-level numbers become phases");
    println!("    - item / a) item / 1.1 Item                   Tasks and subtasks");
    println!("    ---                                           Ends the current task group");
    println!();
    println!("RECOGNIZED TASK DETAILS:");
    println!("    [x] [ ] (WIP)                  Status");
    println!("    (High) P1 priority: low        Priority");
    println!("    @maria  assigned to Maria      Assignee");
    println!("    due Jan 5  by 2026-02-01       Due date");
    println!();
    println!("CONFIG:");
    println!("    config.toml in the config directory sets primary_currency, default_phase_name,");
    println!("    task_span_days, min_duration_weeks, weeks_per_task and log_level.");
}

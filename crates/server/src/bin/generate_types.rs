//! Run with: cargo run --package server --bin generate-types --features typescript

use std::fs;
use std::path::Path;

fn main() {
    println!("Generating TypeScript types...");

    let out_dir = Path::new("bindings");

    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    #[cfg(feature = "typescript")]
    {
        use ts_rs::TS;

        veto_core::ActionKind::export_all_to(out_dir).expect("Failed to export ActionKind");
        veto_core::TeamSide::export_all_to(out_dir).expect("Failed to export TeamSide");
        veto_core::VetoState::export_all_to(out_dir).expect("Failed to export VetoState");
        veto_core::VetoAction::export_all_to(out_dir).expect("Failed to export VetoAction");
        veto_core::SessionSnapshot::export_all_to(out_dir)
            .expect("Failed to export SessionSnapshot");

        events::EventEnvelope::export_all_to(out_dir).expect("Failed to export EventEnvelope");
        events::Event::export_all_to(out_dir).expect("Failed to export Event");

        println!("Types exported to {}", out_dir.display());

        generate_index(out_dir);
    }

    #[cfg(not(feature = "typescript"))]
    {
        eprintln!("Error: typescript feature is not enabled");
        eprintln!("Run with: cargo run --package server --bin generate-types --features typescript");
        std::process::exit(1);
    }
}

#[cfg(feature = "typescript")]
fn generate_index(out_dir: &Path) {
    let mut names: Vec<String> = match fs::read_dir(out_dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                name.strip_suffix(".ts")
                    .filter(|stem| *stem != "index")
                    .map(str::to_string)
            })
            .collect(),
        Err(e) => {
            eprintln!("Failed to list {}: {}", out_dir.display(), e);
            return;
        }
    };
    names.sort();

    let index: String = names
        .iter()
        .map(|name| format!("export type {{ {name} }} from \"./{name}\";\n"))
        .collect();

    match fs::write(out_dir.join("index.ts"), index) {
        Ok(()) => println!("Generated index.ts with {} exports", names.len()),
        Err(e) => eprintln!("Failed to write index.ts: {}", e),
    }
}

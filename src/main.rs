// Entry point and interactive menu.
//
// - Option [1] loads the workbook sheets and prints the index summary.
// - Option [2] asks the narrative service for analysis text and merges it.
// - Option [3] lets the user overwrite the analysis or the conclusion.
// - Option [4] renders and exports the report files.
// - Option [5] writes the blank input template.
// - Option [6] clears the loaded survey.
use chrono::{Datelike, Local};
use log::{error, info};
use skm_report::config::AppConfig;
use skm_report::document::{render, RenderOptions};
use skm_report::gemini::{request_narrative, GeminiClient};
use skm_report::loader::load_workbook;
use skm_report::narrative::ConclusionEdit;
use skm_report::output;
use skm_report::template::write_template;
use skm_report::util;
use skm_report::workspace::Workspace;
use std::io::{self, BufRead, Write};

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Read lines until an empty one; the lines are joined with `\n`.
fn read_block(prompt: &str) -> String {
    println!("{prompt} (finish with an empty line):");
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Handle option [1]: load and process the workbook.
///
/// Any failure leaves the workspace empty and prints the reason.
fn handle_load(ws: &mut Workspace, cfg: &AppConfig) {
    let workbook = match load_workbook(&cfg.input_dir) {
        Ok((wb, report)) => {
            if report.blank_rows > 0 {
                println!(
                    "Note: {} blank rows skipped.",
                    util::format_int(report.blank_rows as u64)
                );
            }
            wb
        }
        Err(e) => {
            ws.reset();
            eprintln!("Failed to read workbook: {}\n", e);
            return;
        }
    };

    match ws.load(&workbook) {
        Ok(ds) => {
            println!(
                "Processing survey... ({} respondents, minimum sample {}: {})",
                util::format_int(ds.respondents() as u64),
                util::format_int(ds.minimum_sample),
                ds.sample_status()
            );
            println!(
                "Nilai IKM: {} ({}, {})\n",
                util::format_number(ds.index.composite, 2),
                ds.index.grade.letter(),
                ds.index.grade.label()
            );
            output::preview_table_rows(&output::item_rows(ds), 9);
        }
        Err(e) => {
            eprintln!("Failed to process workbook: {}\n", e);
        }
    }
}

/// Handle option [2]: request and merge the AI narrative.
fn handle_narrative(ws: &mut Workspace, cfg: &AppConfig) {
    let Some(api_key) = cfg.api_key.as_deref() else {
        println!("Error: no API key. Set GEMINI_API_KEY or pass --api-key.\n");
        return;
    };
    let ticket = match ws.begin_narrative() {
        Ok(t) => t,
        Err(e) => {
            println!("Error: {}\n", e);
            return;
        }
    };
    let client = match GeminiClient::new(api_key, cfg.model.as_str(), cfg.timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}\n", e);
            return;
        }
    };

    println!("Requesting narrative from {}...", client.model_name());
    let Some(dataset) = ws.dataset() else {
        return;
    };
    let text = match request_narrative(&client, dataset) {
        Ok(t) => t,
        Err(e) => {
            error!("Narrative request failed: {}", e);
            eprintln!("Error: {}\n", e);
            return;
        }
    };
    match ws.complete_narrative(ticket, &text) {
        Ok(()) => println!("Narrative merged into the report.\n"),
        Err(e) => eprintln!("Error: {}\n", e),
    }
}

/// Handle option [3]: manual edits of the analysis or the conclusion.
///
/// A conclusion given as JSON with `utama`, `saran` and `penutup` replaces
/// all three parts; plain text replaces only the main conclusion.
fn handle_edit(ws: &mut Workspace) {
    if !ws.is_loaded() {
        println!("Error: No survey loaded. Please load the workbook first (option 1).\n");
        return;
    }
    println!("[1] Main analysis");
    println!("[2] Conclusion\n");
    let result = match read_choice().as_str() {
        "1" => {
            let text = read_block("Analysis text");
            ws.edit_analysis(&text)
        }
        "2" => {
            let text = read_block("Conclusion text or JSON");
            ws.edit_conclusion(ConclusionEdit::parse(&text))
        }
        _ => {
            println!("Invalid choice.\n");
            return;
        }
    };
    match result {
        Ok(()) => println!("Saved.\n"),
        Err(e) => eprintln!("Error: {}\n", e),
    }
}

/// Handle option [4]: render the document and write the output files.
fn handle_export(ws: &Workspace, cfg: &AppConfig) {
    let Some(dataset) = ws.dataset() else {
        println!("Error: No survey loaded. Please load the workbook first (option 1).\n");
        return;
    };
    let options = RenderOptions {
        generated_on: Local::now().date_naive(),
        city: cfg.city.clone(),
    };
    let sections = render(dataset, &options);
    println!("Rendering report ({} sections)...", sections.len());
    match output::export_report(&cfg.output_dir, dataset, &sections) {
        Ok(paths) => {
            for p in paths {
                println!("(Exported to {})", p.display());
            }
            println!();
        }
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

/// Handle option [5]: write the blank input template.
fn handle_template(cfg: &AppConfig) {
    match write_template(&cfg.output_dir, Local::now().year()) {
        Ok(paths) => {
            for p in paths {
                println!("(Template sheet saved to {})", p.display());
            }
            println!();
        }
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cfg = AppConfig::from_args();
    info!("Reading workbook sheets from {}", cfg.input_dir.display());

    let mut ws = Workspace::new();
    loop {
        println!("Survei Kepuasan Masyarakat:");
        println!("[1] Load survey workbook");
        println!("[2] Generate AI narrative");
        println!("[3] Edit analysis / conclusion");
        println!("[4] Export report");
        println!("[5] Download input template");
        println!("[6] Reset");
        println!("[0] Exit\n");
        match read_choice().as_str() {
            "1" => handle_load(&mut ws, &cfg),
            "2" => handle_narrative(&mut ws, &cfg),
            "3" => handle_edit(&mut ws),
            "4" => handle_export(&ws, &cfg),
            "5" => handle_template(&cfg),
            "6" => {
                ws.reset();
                println!("Workspace cleared.\n");
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-6.\n"),
        }
    }
}

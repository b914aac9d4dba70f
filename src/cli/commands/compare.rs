//! Comparison command.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use console::style;
use tokio::sync::mpsc;

use crate::cli::helpers::{add_path, split_list, truncate};
use crate::cli::icons::{arrow, success, warning};
use crate::cli::progress::spawn_progress;
use crate::config::Config;
use crate::export::{export_to_path, write_json, ExportFormat};
use crate::models::ComparisonResult;
use crate::services::ComparisonEvent;
use crate::session::Session;

/// Widest file column in the printed matrix.
const MAX_COLUMN_WIDTH: usize = 24;

/// Flags of the `compare` command.
pub struct CompareOptions {
    pub mime: Option<String>,
    pub only: Option<String>,
    pub exclude: Option<String>,
    pub manual: Option<String>,
    pub no_extracted: bool,
    pub csv: Option<Option<PathBuf>>,
    pub json: bool,
    pub context: bool,
    pub workers: Option<usize>,
    pub exclude_master: bool,
}

/// Extract terms from the master, search them across files, print the matrix.
pub async fn cmd_compare(
    config: &Config,
    master: &Path,
    files: &[PathBuf],
    options: CompareOptions,
) -> anyhow::Result<()> {
    let mut session_options = config.session_options();
    if let Some(workers) = options.workers {
        session_options.workers = workers.max(1);
    }
    if options.exclude_master {
        session_options.include_master = false;
    }

    let mut session = Session::new()
        .with_tokenizer(config.tokenizer())
        .with_extractor(config.extractor())
        .with_options(session_options);

    let master_id = add_path(&mut session, master, options.mime.as_deref()).await?;
    for file in files {
        if file.as_path() == master {
            tracing::debug!("Skipping {}: already the master", file.display());
            continue;
        }
        add_path(&mut session, file, None).await?;
    }

    let extracted = session.set_master(&master_id).await?.len();
    eprintln!(
        "{} Extracted {} terms from {}",
        arrow(),
        extracted,
        style(master.display()).bold()
    );

    curate_terms(&mut session, &options);
    eprintln!(
        "  {} {}, {} working terms",
        style("→").dim(),
        session.selection_summary(),
        session.working_terms().len()
    );

    let cancel = session.cancel_flag();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{} Interrupted, stopping after the files in progress", warning());
            cancel.cancel();
        }
    });

    let (event_tx, event_rx) = mpsc::channel::<ComparisonEvent>(100);
    let progress = spawn_progress(event_rx, options.json);
    let outcome = session.run_comparison(event_tx).await;
    interrupt.abort();
    let _ = progress.await;
    let result = outcome?;

    for file in session.files() {
        if let Some(reason) = file.state().failure() {
            eprintln!("{} {}: {}", warning(), file.name, reason);
        }
    }

    if options.json {
        write_json(&result, std::io::stdout().lock())?;
    } else {
        print_matrix(&result);
        if options.context {
            print_context(&result);
        }
    }

    if let Some(csv) = options.csv {
        let path = match csv {
            Some(path) => path,
            None => config.export_path(&std::env::current_dir()?),
        };
        export_to_path(&result, &path, ExportFormat::Csv)?;
        eprintln!("{} Results exported to {}", success(), path.display());
    }

    Ok(())
}

/// Apply the term selection flags to the freshly extracted terms.
fn curate_terms(session: &mut Session, options: &CompareOptions) {
    if options.no_extracted {
        session.deselect_all();
    } else if let Some(ref only) = options.only {
        session.select(split_list(only));
    }

    if let Some(ref exclude) = options.exclude {
        let excluded: BTreeSet<String> = split_list(exclude).into_iter().collect();
        let keep: Vec<String> = session
            .selection()
            .selected()
            .iter()
            .filter(|t| !excluded.contains(*t))
            .cloned()
            .collect();
        session.select(keep);
    }

    if let Some(ref manual) = options.manual {
        session.set_manual_terms(manual.as_str());
    }
}

fn print_matrix(result: &ComparisonResult) {
    let term_width = result
        .terms()
        .iter()
        .map(|t| t.chars().count())
        .max()
        .unwrap_or(0)
        .max("Term".len());
    let names: Vec<String> = result
        .files()
        .iter()
        .map(|f| truncate(&f.name, MAX_COLUMN_WIDTH))
        .collect();
    let widths: Vec<usize> = names
        .iter()
        .map(|n| n.chars().count().max("Not found".len()))
        .collect();

    let mut header = format!("{:<width$}", "Term", width = term_width);
    for (name, width) in names.iter().zip(&widths) {
        header.push_str(&format!("  {:<width$}", name, width = *width));
    }
    println!("{}", style(header).bold());

    for term in result.terms() {
        let mut line = format!("{:<width$}", term, width = term_width);
        for (file, width) in result.files().iter().zip(&widths) {
            let found = result.cell(term, &file.id).is_some_and(|c| c.found);
            let cell = if found {
                style(format!("{:<width$}", "Found", width = *width)).green()
            } else {
                style(format!("{:<width$}", "—", width = *width)).dim()
            };
            line.push_str(&format!("  {}", cell));
        }
        println!("{}", line);
    }
}

fn print_context(result: &ComparisonResult) {
    for term in result.terms() {
        for file in result.files() {
            let Some(cell) = result.cell(term, &file.id).filter(|c| c.found) else {
                continue;
            };
            println!();
            println!(
                "{} {} in {}",
                style("●").cyan(),
                style(term).bold(),
                style(&file.name).dim()
            );
            for m in &cell.matches {
                println!("  {:>5}: {}", style(m.line_number).dim(), m.context);
            }
        }
    }
}

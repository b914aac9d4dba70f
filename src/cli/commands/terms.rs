//! Term listing command.

use std::path::Path;

use console::style;

use crate::cli::helpers::add_path;
use crate::cli::icons::warning;
use crate::config::Config;
use crate::session::Session;
use crate::utils::mime_icon;

/// Print the sorted terms extracted from one file.
pub async fn cmd_terms(
    config: &Config,
    file: &Path,
    mime: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = Session::new()
        .with_tokenizer(config.tokenizer())
        .with_extractor(config.extractor());

    let id = add_path(&mut session, file, mime).await?;
    let terms = session.set_master(&id).await?.to_vec();

    if let Some(master) = session.master() {
        if let Some(reason) = master.state().failure() {
            eprintln!(
                "{} {} was only partially read: {}",
                warning(),
                master.name,
                reason
            );
        }
        if !json {
            eprintln!(
                "{} {} {} ({} terms)",
                style(mime_icon(&master.mime_type)).dim(),
                style(&master.name).bold(),
                style(&master.mime_type).dim(),
                terms.len()
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&terms)?);
    } else {
        for term in &terms {
            println!("{}", term);
        }
    }

    Ok(())
}

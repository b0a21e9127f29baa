use anyhow::{Context, Result, anyhow};
use chrono::{Local, Timelike};
use comfy_table::Table;
use tracing::{info, info_span};

use tracker_authors::parse_author_list;
use tracker_cli::config::TrackerConfig;
use tracker_cli::design::{
    integrity_codec, load_design, open_session, resolve_focus, seal_design, write_design,
};
use tracker_cli::render::{apply_table_style, collect_rows, outline_table, render_text};
use tracker_model::{AttributeRecord, parse_timestamp};
use tracker_outline::discover_owners;

use crate::cli::{DesignArg, HashArgs, OutlineArgs, SealArgs, VerifyArgs};

pub fn run_outline(args: &OutlineArgs, config: &TrackerConfig) -> Result<()> {
    let path = &args.design.design;
    let _span = info_span!("outline", design = %path.display()).entered();
    let selection = args.select.as_deref().map(parse_author_list);
    let mut session = open_session(path, config, selection.as_deref())?;

    session
        .expand_to_depth(args.depth)
        .context("expand outline")?;
    if let Some(focus) = &args.focus {
        let state = session
            .engine()
            .tree()
            .root_state()
            .and_then(|root| resolve_focus(session.source(), root, focus))
            .ok_or_else(|| anyhow!("no subcircuit matches focus path {focus:?}"))?;
        session.set_current_view(Some(state));
    }

    let rows = collect_rows(&session);
    info!(nodes = rows.len(), "rendered outline");
    if args.plain {
        println!("{}", render_text(&rows));
    } else {
        println!("{}", outline_table(&rows));
    }
    Ok(())
}

/// Returns the number of flagged nodes.
pub fn run_verify(args: &VerifyArgs, config: &TrackerConfig) -> Result<usize> {
    let path = &args.design.design;
    let _span = info_span!("verify", design = %path.display()).entered();
    let selection = args.select.as_deref().map(parse_author_list);
    let mut session = open_session(path, config, selection.as_deref())?;
    session.expand_to_depth(None).context("expand outline")?;

    let flagged: Vec<_> = collect_rows(&session)
        .into_iter()
        .filter(|row| row.validity.is_flagged())
        .collect();
    if flagged.is_empty() {
        println!("No flagged nodes.");
    } else {
        println!("{}", outline_table(&flagged));
        println!("{} flagged node(s).", flagged.len());
    }
    Ok(flagged.len())
}

pub fn run_seal(args: &SealArgs, config: &TrackerConfig) -> Result<()> {
    let path = &args.design.design;
    let _span = info_span!("seal", design = %path.display()).entered();
    let (mut design, root) = load_design(path)?;
    let codec = integrity_codec(config)?;
    let now = Local::now().naive_local();
    let date = now.with_nanosecond(0).unwrap_or(now);

    let summary = seal_design(&mut design, &codec, &args.author, &args.version, date)?;
    let output = args.output.as_deref().unwrap_or(path.as_path());
    write_design(&design, root, output)?;
    println!(
        "Sealed {} element(s), {} already sealed. Written to {}.",
        summary.sealed,
        summary.skipped,
        output.display()
    );
    Ok(())
}

pub fn run_owners(args: &DesignArg, config: &TrackerConfig) -> Result<()> {
    let (design, root) = load_design(&args.design)?;
    let owners = discover_owners(&design, root, config.outline.max_depth);
    if owners.is_empty() {
        println!("No owners recorded.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Owner", "Selected"]);
    apply_table_style(&mut table);
    for owner in owners {
        let selected = config.authors.selected.contains(&owner);
        table.add_row(vec![owner, if selected { "yes" } else { "no" }.to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_hash(args: &HashArgs, config: &TrackerConfig) -> Result<()> {
    let codec = integrity_codec(config)?;
    let date = args
        .date
        .as_deref()
        .map(|date| parse_timestamp(date).with_context(|| format!("parse date {date:?}")))
        .transpose()?;
    let record = AttributeRecord {
        owner: args.owner.clone(),
        date,
        version: args.version.clone(),
        uuid: args.uuid.clone(),
        integrity: None,
    };
    println!("{}", codec.digest(&record));
    Ok(())
}

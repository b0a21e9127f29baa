//! Loading, sealing and writing design files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use tracing::{debug, info};
use tracker_authors::{AuthorRegistry, normalize_author_name};
use tracker_integrity::{IntegrityCodec, SealStamp};
use tracker_model::{
    AttributeKey, AttributeSet, ChildRef, DesignHierarchy, DesignSpec, HierarchySource, StateRef,
};
use tracker_outline::OutlineSession;

use crate::config::TrackerConfig;

/// Read a JSON design and instantiate its root circuit.
pub fn load_design(path: &Path) -> Result<(DesignHierarchy, StateRef)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read design {}", path.display()))?;
    let spec = DesignSpec::from_json(&text)
        .with_context(|| format!("parse design {}", path.display()))?;
    let (design, root) = DesignHierarchy::from_spec(&spec)
        .with_context(|| format!("build design {}", path.display()))?;
    debug!(path = %path.display(), states = design.state_count(), "loaded design");
    Ok((design, root))
}

pub fn write_design(design: &DesignHierarchy, root: StateRef, path: &Path) -> Result<()> {
    let json = design
        .to_spec(root)
        .and_then(|spec| spec.to_json_pretty())
        .context("serialize design")?;
    fs::write(path, json + "\n").with_context(|| format!("write design {}", path.display()))?;
    Ok(())
}

/// Registry from the config file; `selection` replaces its selected owners.
pub fn author_registry(config: &TrackerConfig, selection: Option<&[String]>) -> AuthorRegistry {
    let mut authors = AuthorRegistry::from_settings(&config.authors);
    if let Some(selection) = selection {
        authors.set_selected(selection);
    }
    authors
}

/// Build the integrity codec, carrying the user-facing reason on failure.
pub fn integrity_codec(config: &TrackerConfig) -> Result<IntegrityCodec> {
    IntegrityCodec::new(&config.integrity).map_err(|error| {
        let reason = error.user_message().to_string();
        anyhow::Error::new(error).context(format!("initialize integrity codec: {reason}"))
    })
}

/// Load a design and build its outline session.
pub fn open_session(
    path: &Path,
    config: &TrackerConfig,
    selection: Option<&[String]>,
) -> Result<OutlineSession<DesignHierarchy>> {
    let (design, root) = load_design(path)?;
    let codec = integrity_codec(config)?;
    Ok(OutlineSession::new(
        design,
        root,
        author_registry(config, selection),
        codec,
        config.outline.clone(),
    ))
}

/// Resolve a `/`-separated chain of subcircuit labels or circuit names,
/// starting below `root`. Matching ignores ASCII case; an empty chain is the
/// root itself.
pub fn resolve_focus<S>(source: &S, root: StateRef, chain: &str) -> Option<StateRef>
where
    S: HierarchySource + ?Sized,
{
    chain
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |state, segment| {
            source.children(state).into_iter().find_map(|child| {
                let ChildRef::State(nested) = child else {
                    return None;
                };
                let info = source.describe_state(nested)?;
                let matches = info
                    .label
                    .as_deref()
                    .is_some_and(|label| label.eq_ignore_ascii_case(segment))
                    || info.circuit.eq_ignore_ascii_case(segment);
                matches.then_some(nested)
            })
        })
}

/// Result of [`seal_design`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SealSummary {
    pub sealed: usize,
    /// Elements that already carried an integrity hash.
    pub skipped: usize,
}

/// Stamp and seal every circuit and component without an integrity hash.
///
/// Each element gets its own UUID; all share `date`.
pub fn seal_design(
    design: &mut DesignHierarchy,
    codec: &IntegrityCodec,
    author: &str,
    version: &str,
    date: NaiveDateTime,
) -> Result<SealSummary> {
    let owner = normalize_author_name(author);
    if owner.is_empty() {
        bail!("author name {author:?} is empty after normalization");
    }
    let mut summary = SealSummary::default();
    let stamp = || SealStamp::new(owner.as_str(), version).with_date(date);

    let circuits: Vec<_> = design.circuits().collect();
    for circuit in circuits {
        let attributes = design.circuit_attributes(circuit)?;
        if let Some(sealed) = seal_set(codec, attributes, &stamp(), &mut summary)? {
            design.modify_circuit_attributes(circuit, move |set| {
                *set = sealed;
                Ok(())
            })?;
        }

        let components = design.components_of(circuit)?.to_vec();
        for component in components {
            let attributes = design.component_attributes(component)?;
            if let Some(sealed) = seal_set(codec, attributes, &stamp(), &mut summary)? {
                design.modify_component_attributes(component, move |set| {
                    *set = sealed;
                    Ok(())
                })?;
            }
        }
    }

    info!(
        sealed = summary.sealed,
        skipped = summary.skipped,
        owner = %owner,
        "sealed design"
    );
    Ok(summary)
}

fn seal_set(
    codec: &IntegrityCodec,
    attributes: &AttributeSet,
    stamp: &SealStamp,
    summary: &mut SealSummary,
) -> Result<Option<AttributeSet>> {
    if attributes.text(AttributeKey::Integrity)?.is_some() {
        summary.skipped += 1;
        return Ok(None);
    }
    let mut sealed = attributes.clone();
    codec.seal(&mut sealed, stamp)?;
    summary.sealed += 1;
    Ok(Some(sealed))
}

//! Load/store of a persisted configuration (§4.K, §6).
//!
//! A persisted configuration is a flat JSON array of [`Definition`]s, one
//! per block, carrying no private state. Compatibility is at the record
//! level (field presence/shape), not the byte level; unknown fields in a
//! newer file are simply ignored by `serde`'s default (non-deny-unknown)
//! behavior.

use fb_traits::Definition;
use log::warn;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loads a persisted configuration and reconciles `connections` against
/// `link`s (§9 "a rebuild pass reconciles them after load").
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Definition>, PersistenceError> {
    let text = std::fs::read_to_string(path)?;
    let mut defs: Vec<Definition> = serde_json::from_str(&text)?;
    reconcile_connections(&mut defs);
    Ok(defs)
}

/// Rebuilds every output's `connections` set from the input `link`s found
/// across `defs`, since the two are persisted independently and can drift
/// (a hand-edited file, or a file written by an older/newer binary). Links
/// are treated as authoritative for this rebuild; a link naming a block or
/// output that doesn't exist in `defs` is logged and dropped.
pub fn reconcile_connections(defs: &mut [Definition]) {
    for def in defs.iter_mut() {
        for out in def.outputs.iter_mut() {
            out.connections.clear();
        }
    }

    let mut rebuilt: Vec<(String, String, String)> = Vec::new();
    for def in defs.iter() {
        let target_name = def.block_name().to_string();
        for input in def.inputs.iter() {
            if let Some(link) = &input.link {
                rebuilt.push((link.block.clone(), link.output.clone(), target_name.clone()));
            }
        }
    }

    for (source_block, source_output, target_name) in rebuilt {
        let Some(source_def) = defs.iter_mut().find(|d| d.block_name() == source_block) else {
            warn!("link to unknown block `{source_block}` found on `{target_name}`, dropping");
            continue;
        };
        let Some(output) = source_def.outputs.get_mut(&source_output) else {
            warn!(
                "link to unknown output `{source_block}`.`{source_output}` found on `{target_name}`, dropping"
            );
            continue;
        };
        output.connections.insert(target_name);
    }
}

pub fn save(path: impl AsRef<Path>, defs: &[Definition]) -> Result<(), PersistenceError> {
    let text = serde_json::to_string_pretty(defs)?;
    std::fs::write(path, text)?;
    Ok(())
}

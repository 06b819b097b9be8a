//! Sub-occupancy color derivation
//!
//! The colors used by base-category layers (by default every
//! `BLK_n_FLR_n_BLT_UP_AREA`) become the allow-set for rules whose color is
//! "as per sub-occupancy".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::pattern::CompiledPattern;
use crate::model::{Color, Document};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyColors {
    pub indices: BTreeSet<i32>,
    pub true_colors: BTreeSet<u32>,
}

impl OccupancyColors {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.true_colors.is_empty()
    }

    /// Index or true color present in the allow-set
    pub fn contains(&self, color: &Color) -> bool {
        self.indices.contains(&color.index)
            || color
                .true_color
                .map(|tc| self.true_colors.contains(&tc))
                .unwrap_or(false)
    }

    /// Indices then true colors, ascending
    pub fn describe(&self) -> String {
        self.indices
            .iter()
            .map(|i| i.to_string())
            .chain(self.true_colors.iter().map(|tc| tc.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Union of the colors on every layer matching `base`
pub fn derive_occupancy_colors(document: &Document, base: &CompiledPattern) -> OccupancyColors {
    let mut colors = OccupancyColors::default();
    for layer in document.layers.iter().filter(|l| base.is_match(&l.name)) {
        colors.indices.insert(layer.color.index);
        if let Some(tc) = layer.color.true_color {
            colors.true_colors.insert(tc);
        }
    }
    tracing::debug!(
        base_template = base.template(),
        index_count = colors.indices.len(),
        true_color_count = colors.true_colors.len(),
        "occupancy colors derived"
    );
    colors
}

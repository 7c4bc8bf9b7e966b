//! Compile character sequences into contextual substitution lookups.
//!
//! The pipeline runs bottom-up: a [`SequenceSet`] is resolved against a glyph
//! store, the resolved sequences become [`LigatureChain`]s or
//! [`ScriptChain`]s (synthesizing their state glyphs), the chains are lowered
//! into the lookups of a [`Feature`], and the feature is rendered as feature
//! file text by [`to_fea`]. [`simulate`] replays a feature over a glyph run.

mod chain;
mod compile;
mod error;
mod fea;
mod rule;
mod sequence;
pub mod simulate;

pub use chain::{ChainShape, LigatureChain, LoweredChain, ScriptChain, ScriptForm, order_chains};
pub use compile::{
    HIDE_GLYPH, HiddenAdvance, LigatureOptions, compile_ligatures, compile_script, lower_ligatures,
};
pub use error::{Error, Result};
pub use fea::to_fea;
pub use rule::{Feature, FeatureTag, Lookup, Rule, Slot};
pub use sequence::{Delimiters, ResolvedDelimiters, ResolvedSequence, Role, Sequence, SequenceSet};

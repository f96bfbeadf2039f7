//! Normalization configuration for CASS parsing
//!
//! A [`Config`] bundles the five knobs that decide how node labels are
//! normalized and which nodes are suppressed from feature output. Every
//! knob is a closed enum with a stable numeric wire form, matching the
//! integer flags the upstream preprocessing tools pass around. Out-of-range
//! numerics are rejected eagerly at conversion time, never mid-parse.
//!
//! The config is immutable and `Copy`; one value is shared read-only by
//! every node of a parse.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error raised when a numeric mode value is outside its enumerated range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    InvalidMode {
        knob: &'static str,
        value: u8,
        max: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMode { knob, value, max } => {
                write!(f, "invalid {} value {} (expected 0..={})", knob, value, max)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

macro_rules! mode_enum {
    (
        $(#[$doc:meta])*
        $name:ident, $knob:literal, $max:literal {
            $($(#[$vdoc:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($(#[$vdoc])* $variant),+
        }

        impl TryFrom<u8> for $name {
            type Error = ConfigError;

            fn try_from(value: u8) -> Result<Self, ConfigError> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(ConfigError::InvalidMode {
                        knob: $knob,
                        value,
                        max: $max,
                    }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(mode: $name) -> u8 {
                match mode {
                    $($name::$variant => $value),+
                }
            }
        }
    };
}

mode_enum! {
    /// How internal-node annotations contribute to the normalized label.
    AnnotMode, "annot_mode", 2 {
        /// Structural label only.
        #[default]
        Plain = 0,
        /// Annotation prefixed to every internal label.
        Full = 1,
        /// Annotation prefixed only for parenthesized-expression and
        /// argument-list nodes.
        Selective = 2,
    }
}

mode_enum! {
    /// Treatment of compound-statement internal nodes.
    CompoundMode, "compound_mode", 2 {
        /// No special handling; the annotation rules apply.
        #[default]
        Keep = 0,
        /// Suppress the node from all feature output.
        Drop = 1,
        /// Replace the label with the literal `{#}`.
        Braces = 2,
    }
}

mode_enum! {
    /// Treatment of global-variable leaves.
    GlobalVarMode, "gvar_mode", 3 {
        /// Keep the raw identifier.
        #[default]
        Keep = 0,
        /// Suppress the leaf from all feature output.
        Drop = 1,
        /// Replace the identifier with `$GVAR`.
        Generic = 2,
        /// Replace the identifier with `$VAR`, like local variables.
        Variable = 3,
    }
}

mode_enum! {
    /// Treatment of global-function leaves.
    GlobalFunMode, "gfun_mode", 3 {
        /// Keep the raw identifier.
        #[default]
        Keep = 0,
        /// Suppress the leaf from all feature output.
        Drop = 1,
        /// Replace the identifier with `$GFUN`.
        Generic = 2,
        /// Follow the global-variable placeholder: `$VAR` when
        /// `gvar_mode` is `Variable`, otherwise `$GVAR`.
        Variable = 3,
    }
}

mode_enum! {
    /// Whether the function-signature node contributes a feature.
    FunSigMode, "fsig_mode", 1 {
        /// The signature label is blanked and emits nothing.
        #[default]
        Ignore = 0,
        /// The signature label is kept and appended to the feature
        /// sequence.
        Emit = 1,
    }
}

/// The five normalization knobs, shared read-only across one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub annot_mode: AnnotMode,
    #[serde(default)]
    pub compound_mode: CompoundMode,
    #[serde(default)]
    pub gvar_mode: GlobalVarMode,
    #[serde(default)]
    pub gfun_mode: GlobalFunMode,
    #[serde(default)]
    pub fsig_mode: FunSigMode,
}

impl Config {
    /// Build a config from the numeric flags used on the wire and in the
    /// upstream tooling. Fails fast on any out-of-range value.
    pub fn from_modes(
        annot: u8,
        compound: u8,
        gvar: u8,
        gfun: u8,
        fsig: u8,
    ) -> Result<Self, ConfigError> {
        Ok(Config {
            annot_mode: AnnotMode::try_from(annot)?,
            compound_mode: CompoundMode::try_from(compound)?,
            gvar_mode: GlobalVarMode::try_from(gvar)?,
            gfun_mode: GlobalFunMode::try_from(gfun)?,
            fsig_mode: FunSigMode::try_from(fsig)?,
        })
    }
}

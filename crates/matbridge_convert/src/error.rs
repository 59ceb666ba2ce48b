// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion errors.

use crate::config::Scope;

/// Error from a conversion run
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Nothing in scope carries material slots
    #[error("No mesh, curve, surface, meta or text objects in {scope:?} scope; select some or widen the scope")]
    NoTargets {
        /// Scope the run was configured with
        scope: Scope,
    },
}

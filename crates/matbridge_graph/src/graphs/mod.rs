// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node schemas built on the core model.

pub mod shader;

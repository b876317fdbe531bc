//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Conversion of decoded data into output forms
//!
//! - PS3 RGBA swizzle ↔ row-major order
//! - Meshes and bones → PLC parameter list documents

pub mod plc;
pub mod swizzle;

pub use plc::{
    PlcDocument, build_plc_documents, plc_output_path, project_package, serialize_plc,
};
pub use swizzle::{block_address, swizzle_rgba, unswizzle_mip_chain, unswizzle_rgba};

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// jdflink-jdf: the JDF job ticket model as exchanged with Caldera Nexio.
//
// Resources, links and audits follow the CIP4 JDF 1.4 layout; the print
// configuration and job status blocks are Caldera extensions in the
// `caldera` namespace.

pub mod audit;
pub mod document;
pub mod links;
pub mod print_config;
pub mod resources;
pub mod status;

pub use audit::{AuditPool, AuditStamp, Created, ProcessRun, ResourceAudit};
pub use document::{Jdf, JdfFactory};
pub use links::{ComponentLink, LinkKind, ResourceLink, ResourceLinkPool, RunListLink, Usage};
pub use print_config::{PresetConfig, PrintConfig, PrintSettings};
pub use resources::{
    Device, DigitalPrintingParams, FileSpec, FileSpecRef, LayoutElement, ResourcePool, RunList,
};
pub use status::{JobState, Status};

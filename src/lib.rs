// ─── Netherite Core ───
// Distribution validation and self-update backend for the Netherite launcher.
//
// Architecture:
//   distribution/ — read-only manifest model (servers, module trees)
//   integrity/    — streaming hashes + module-tree validation
//   processor/    — staged validate/postDownload contract + the
//                   distribution processor (loader descriptor resolution)
//   version/      — dotted-version comparison, platform/library rules
//   updater/      — remote-checksum self-update for auxiliary agents
//   maven/        — module-identifier coordinate parsing
//   auth/         — Microsoft error-code mapping table
//   config/       — launcher directory layout

pub mod auth;
pub mod config;
pub mod distribution;
pub mod error;
pub mod http;
pub mod integrity;
pub mod maven;
pub mod processor;
pub mod updater;
pub mod version;

pub use error::{CoreError, CoreResult};

//! Service configuration from the command line and environment.
//!
//! Every flag has an `APPMETA_*` environment fallback; flags win.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

use crate::store::{LastElementIds, SequentialIds, Store};

#[derive(Debug, Parser)]
#[command(name = "appmeta", version, about = "In-memory CRUD service for application metadata.")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "APPMETA_ADDR", default_value = "0.0.0.0:8000")]
    pub addr: SocketAddr,

    /// How ids are assigned to new records.
    #[arg(long, env = "APPMETA_IDS", value_enum, default_value_t = IdPolicy::LastElement)]
    pub ids: IdPolicy,
}

/// Id assignment policy for created records.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum IdPolicy {
    /// Last stored record's id plus one. May reuse ids after an update.
    #[default]
    LastElement,
    /// Monotonic counter; never reuses an id.
    Sequential,
}

impl Config {
    /// An empty store using the configured id policy.
    pub fn store(&self) -> Store {
        match self.ids {
            IdPolicy::LastElement => Store::with_ids(LastElementIds),
            IdPolicy::Sequential => Store::with_ids(SequentialIds::default()),
        }
    }
}

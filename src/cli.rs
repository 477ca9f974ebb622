// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the lexidex command-line interface.
//!
//! Three subcommands: `build` to index a directory of JSON documents,
//! `search` to query a built index, and `inspect` to examine one.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lexidex", about = "Embeddable in-memory full-text search", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a search index from a directory of JSON documents
    Build {
        /// Input directory; every `*.json` file is one document object
        #[arg(short, long)]
        input: String,

        /// Output path for the serialized index
        #[arg(short, long)]
        output: String,

        /// Name of the field holding each document's reference (default: id)
        #[arg(long, default_value = "id")]
        ref_field: String,
    },

    /// Search a previously built index and print ranked results
    Search {
        /// Path to a serialized index
        file: String,

        /// Query string, e.g. `title:plant~1 +green -mustard`
        query: String,

        /// Maximum number of results to print
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Print a summary of a serialized index's structure
    Inspect {
        /// Path to a serialized index
        file: String,
    },
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! lexidex CLI: build, search, and inspect indexes.
//!
//! ```bash
//! # Build an index from a directory of JSON documents
//! lexidex build --input ./docs --output index.json
//!
//! # Search a built index
//! lexidex search index.json "green"
//!
//! # Inspect an index's structure
//! lexidex inspect index.json
//! ```

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use lexidex::{Builder, Document, Registry, SerializedIndex};

mod cli;
use cli::{Cli, Commands};

const DEFAULT_FIELDS: &[&str] = &["title", "body"];

/// `fields.json`, optionally dropped in an input directory to override the
/// default `title`/`body` field set a `build` indexes.
#[derive(Deserialize)]
struct FieldsManifest {
    fields: Vec<String>,
}

fn field_names(input: &str) -> anyhow::Result<Vec<String>> {
    let manifest_path = Path::new(input).join("fields.json");
    if manifest_path.exists() {
        let text = fs::read_to_string(&manifest_path)
            .with_context(|| format!("reading {}", manifest_path.display()))?;
        let manifest: FieldsManifest = serde_json::from_str(&text)
            .with_context(|| format!("parsing {} as a fields manifest", manifest_path.display()))?;
        if manifest.fields.is_empty() {
            bail!("{} lists no fields", manifest_path.display());
        }
        Ok(manifest.fields)
    } else {
        Ok(DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect())
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { input, output, ref_field } => cmd_build(&input, &output, &ref_field),
        Commands::Search { file, query, limit } => cmd_search(&file, &query, limit),
        Commands::Inspect { file } => cmd_inspect(&file),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn cmd_build(input: &str, output: &str, ref_field: &str) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut paths: Vec<_> = fs::read_dir(input)
        .with_context(|| format!("reading input directory {input:?}"))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()) == Some("json")
                && path.file_name().and_then(|n| n.to_str()) != Some("fields.json")
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("no *.json files found in {input:?}");
    }

    let field_names = field_names(input)?;

    let mut objects = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let value: JsonValue =
            serde_json::from_str(&text).with_context(|| format!("parsing {} as JSON", path.display()))?;
        let JsonValue::Object(object) = value else {
            bail!("{} does not contain a JSON object", path.display());
        };
        objects.push(object);
    }

    let mut builder = Builder::new();
    builder.ref_field(ref_field)?;
    for name in &field_names {
        builder.field(name.as_str(), None)?;
    }

    let doc_count = objects.len();
    for object in objects {
        let mut document = Document::new();
        for (key, value) in object {
            document.insert(key, value);
        }
        builder.add(&document, 1.0)?;
    }

    let index = builder.build()?;
    let serialized = index.to_serialized();
    let json = serde_json::to_string(&serialized).context("serializing index to JSON")?;
    fs::write(output, json).with_context(|| format!("writing {output}"))?;

    println!(
        "built {output}: {doc_count} documents, {} fields, {} terms ({:.1?})",
        serialized.fields.len(),
        serialized.term_count(),
        start.elapsed(),
    );
    Ok(())
}

fn cmd_search(file: &str, query: &str, limit: usize) -> anyhow::Result<()> {
    let (index, warnings) = load_index(file)?;
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let start = Instant::now();
    let results = index.search(query)?;
    let elapsed = start.elapsed();

    println!("\"{query}\" -> {} result(s) in {elapsed:.1?}", results.len());
    for (rank, result) in results.iter().take(limit).enumerate() {
        let matched: Vec<&str> = result.match_data.terms().collect();
        println!(
            "  {:>2}. {:<20} score={:.3}  matched=[{}]",
            rank + 1,
            result.doc_ref,
            result.score,
            matched.join(", "),
        );
    }
    Ok(())
}

fn cmd_inspect(file: &str) -> anyhow::Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {file}"))?;
    let serialized: SerializedIndex =
        serde_json::from_str(&text).with_context(|| format!("parsing {file} as a serialized index"))?;

    println!("{file}");
    println!("  version:   {}", serialized.version);
    println!("  fields:    {}", serialized.fields.join(", "));
    println!("  pipeline:  {}", serialized.pipeline.join(" -> "));
    println!("  terms:     {}", serialized.term_count());
    println!("  documents: {}", serialized.document_count());
    Ok(())
}

fn load_index(file: &str) -> anyhow::Result<(lexidex::Index, Vec<String>)> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {file}"))?;
    let serialized: SerializedIndex =
        serde_json::from_str(&text).with_context(|| format!("parsing {file} as a serialized index"))?;
    let registry = Registry::with_defaults();
    let (index, warnings) = lexidex::Index::load(&serialized, &registry).context("loading index")?;
    Ok((index, warnings))
}

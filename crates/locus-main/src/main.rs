// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::{error::Error, fs::File, io::BufReader, path::PathBuf, process::ExitCode};

use locus_core::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
}

/// What to lay out: a space, the runs already taken in it, and how the
/// free remainder should be cut up.
#[derive(Debug, Clone, Deserialize)]
struct LayoutRequest {
    space: SpaceConfig,
    #[serde(default)]
    reserved: Vec<[i64; 2]>,
    parts: i64,
    #[serde(default)]
    chunk: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
struct Run {
    start: i64,
    end: i64,
    units: i64,
}

#[derive(Debug, Clone, Serialize)]
struct LayoutReport {
    space: SpaceConfig,
    reserved_units: i64,
    free_units: i64,
    parts: Vec<Run>,
    chunks: Vec<Run>,
}

fn runs(pieces: impl Iterator<Item = Region>) -> Vec<Run> {
    pieces
        .filter_map(|piece| {
            let (start, end) = (piece.start()?, piece.end()?);
            Some(Run {
                start: start.raw(),
                end: end.raw(),
                units: piece.size().units(),
            })
        })
        .collect()
}

#[instrument(level = "info", skip_all)]
fn layout(request: &LayoutRequest) -> Result<LayoutReport, Box<dyn Error>> {
    let space = request.space.build()?;
    info!(space = %space, "Laying out space");

    let mut reserved = space.sparse_region_builder();
    for &[start, end] in &request.reserved {
        let run = space.region(&space.position(start), &space.position(end));
        reserved = reserved.concatenate(&run);
    }
    let reserved = reserved.build().into_result()?.into_region();
    let free = reserved.expr().invert();
    let free_units = free.value().map_or(0, |r| r.size().units());

    let parts = free.split_into(request.parts).into_result()?;
    let chunks = match request.chunk {
        Some(units) => free.split_by(&space.size(units)).into_result()?,
        None => SparseRegion::empty(space.clone()),
    };

    Ok(LayoutReport {
        space: SpaceConfig::from(&space),
        reserved_units: reserved.size().units(),
        free_units,
        parts: runs(parts.pieces()),
        chunks: runs(chunks.pieces()),
    })
}

fn run() -> Result<(), Box<dyn Error>> {
    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: locus <layout.json>")?;
    let request: LayoutRequest = serde_json::from_reader(BufReader::new(File::open(&path)?))?;
    let report = layout(&request)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    enable_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("locus: {e}");
            ExitCode::FAILURE
        }
    }
}

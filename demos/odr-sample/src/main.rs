//! odr-sample — validate a road network and sample it to CSV.
//!
//! Usage: `odr-sample [document.json]`.  Without an argument the built-in
//! network from `network.rs` is used and also written to
//! `output/odr-sample/sample.json`, so it can be edited and fed back in.
//! Set `RUST_LOG=debug` for per-road validation logs.
//!
//! Output:
//! - `reference_lines.csv`: reference-line pose every 5 m of every road
//! - `lane_centers.csv`: lane-center pose of every non-center lane at the
//!   same stations

mod network;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use odr_network::{Document, NetworkError, Road, RoadNetwork};

use network::{SHELTER_ID, approach_lanes, build_document};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:    &str = "output/odr-sample";
const SAMPLE_STEP_M: f64  = 5.0;

// ── Input ─────────────────────────────────────────────────────────────────────

fn load(path: &Path) -> Result<Document> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("decoding {}", path.display()))
}

fn built_in() -> Result<Document> {
    let doc = build_document();
    let path = Path::new(OUTPUT_DIR).join("sample.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), &doc)?;
    info!(path = %path.display(), "wrote built-in document");
    Ok(doc)
}

fn freeze(doc: Document) -> Result<RoadNetwork> {
    match doc.into_network() {
        Ok(net) => Ok(net),
        Err(NetworkError::Rejected(errs)) => {
            for e in errs.iter().filter(|e| e.is_fatal()) {
                error!(class = ?e.class(), "{e}");
            }
            bail!("document rejected with {} fatal error(s)", errs.iter().filter(|e| e.is_fatal()).count());
        }
        Err(other) => Err(other.into()),
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Evenly spaced stations covering `[0, length]`.
fn stations(road: &Road) -> impl Iterator<Item = f64> + '_ {
    let n = (road.length / SAMPLE_STEP_M).ceil().max(1.0) as usize;
    (0..=n).map(move |i| road.length * i as f64 / n as f64)
}

fn write_reference_lines(net: &RoadNetwork, path: &Path) -> Result<usize> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(["road", "s", "x", "y", "z", "heading"])?;
    let mut rows = 0;
    for road in net.roads() {
        for s in stations(road) {
            let pose = net.evaluate_pose(road.id.as_str(), s)?;
            w.write_record(&[
                road.id.to_string(),
                format!("{s:.3}"),
                format!("{:.3}", pose.x),
                format!("{:.3}", pose.y),
                format!("{:.3}", pose.z),
                format!("{:.5}", pose.heading),
            ])?;
            rows += 1;
        }
    }
    w.flush()?;
    Ok(rows)
}

fn write_lane_centers(net: &RoadNetwork, path: &Path) -> Result<usize> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(["road", "s", "lane", "x", "y", "z"])?;
    let mut rows = 0;
    for road in net.roads() {
        for s in stations(road) {
            let section = &road.lanes.sections[road.lanes.section_index(s)?];
            for lane in section.lanes().iter().filter(|l| !l.id.is_center()) {
                let pose = net.lane_center(road.id.as_str(), lane.id, s)?;
                w.write_record(&[
                    road.id.to_string(),
                    format!("{s:.3}"),
                    lane.id.0.to_string(),
                    format!("{:.3}", pose.x),
                    format!("{:.3}", pose.y),
                    format!("{:.3}", pose.z),
                ])?;
                rows += 1;
            }
        }
    }
    w.flush()?;
    Ok(rows)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== odr-sample — road network model ===");
    std::fs::create_dir_all(OUTPUT_DIR)?;

    // 1. Load or build the document.
    let doc = match std::env::args_os().nth(1) {
        Some(path) => load(Path::new(&path))?,
        None => built_in()?,
    };
    println!("Document: {} roads, {} junctions", doc.roads.len(), doc.junctions.len());

    // 2. Validate and freeze.
    let t0 = Instant::now();
    let net = freeze(doc)?;
    for advisory in net.advisories() {
        warn!(class = ?advisory.class(), "{advisory}");
    }
    println!(
        "Validated in {:.3} ms ({} advisories)",
        t0.elapsed().as_secs_f64() * 1e3,
        net.advisories().len()
    );

    // 3. Sample to CSV.
    let out = Path::new(OUTPUT_DIR);
    let ref_rows = write_reference_lines(&net, &out.join("reference_lines.csv"))?;
    let lane_rows = write_lane_centers(&net, &out.join("lane_centers.csv"))?;
    println!("  reference_lines.csv : {ref_rows} rows");
    println!("  lane_centers.csv    : {lane_rows} rows");
    println!();

    // 4. Where do the first road's lanes lead?
    if let Some(first) = net.roads().next() {
        println!("{:<12} {:<8} {}", "Road", "Lane", "Continues into");
        println!("{}", "-".repeat(48));
        for lane in approach_lanes() {
            let Ok(targets) = net.resolve_lane_link(first.id.as_str(), lane, true) else {
                continue;
            };
            let joined: Vec<String> = targets.iter().map(|(road, l)| format!("{road}/{}", l.0)).collect();
            println!("{:<12} {:<8} {}", first.id, lane.0, joined.join(", "));
        }
        println!();
    }

    // 5. Spatial lookup.
    if let Some(road) = net.nearest_road(150.0, 10.0) {
        println!("Nearest road to (150, 10): {road}");
    }

    // 6. Object footprint.
    if let Some(first) = net.roads().next().filter(|r| r.object(SHELTER_ID).is_some()) {
        let id = first.id.as_str();
        let pose = net.object_pose(id, SHELTER_ID)?;
        let corners = net.object_outline(id, SHELTER_ID, 0)?;
        println!(
            "Object {SHELTER_ID} at ({:.2}, {:.2}), {} outline corners",
            pose.x,
            pose.y,
            corners.len()
        );
    }

    Ok(())
}

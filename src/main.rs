use std::error::Error;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use log::LevelFilter;
use strata::interact::{self, PlaceOutcome};
use strata::{EngineConfig, WalkInput, Walker};
use strata_blocks::BlockType;
use strata_geom::Vec3;
use strata_runtime::{DrawCallCounter, LoadPhase, Runtime};
use strata_world::{ChunkCoord, TerrainGenerator, world_to_chunk};

const DT: f32 = 1.0 / 60.0;

/// Runs the world headlessly: loads terrain, walks a scripted player, edits
/// blocks and keeps chunk meshes current under the per-tick rebuild budget.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about)]
struct Args {
    /// Engine config TOML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<i32>,
    /// Render distance in chunks
    #[arg(long)]
    radius: Option<i32>,
    /// Simulated ticks at 60 Hz
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    #[arg(long)]
    budget_ms: Option<f32>,
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn session_seed() -> i32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.subsec_nanos() ^ d.as_secs() as u32) as i32)
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut cfg = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(r) = args.radius {
        cfg.set_render_distance(r);
    }
    if let Some(ms) = args.budget_ms {
        cfg.rebuild_budget_ms = ms.max(0.0);
    }
    let seed = cfg.seed.unwrap_or_else(session_seed);
    let params = cfg.worldgen_params()?;
    let palette = cfg.palette()?;
    log::info!("seed {seed}, render distance {}, budget {:?}", cfg.render_distance, cfg.rebuild_budget());

    let mut rt = Runtime::new(TerrainGenerator::with_params(seed, params), cfg.rebuild_budget());
    let mut renderer = DrawCallCounter::new();
    rt.load_area(ChunkCoord::new(0, 0), cfg.render_distance, &mut renderer, |phase, done, total| {
        if done == total {
            let what = match phase {
                LoadPhase::Generate => "generated",
                LoadPhase::Mesh => "meshed",
            };
            log::debug!(target: "chunks", "{what} {done}/{total}");
        }
    });

    let mut walker = Walker::new(Vec3::new(0.5, 25.0, 0.5));
    let mut held: Option<BlockType> = None;
    let (mut broken, mut placed) = (0usize, 0usize);

    for tick in 0..args.ticks {
        let heading = tick as f32 * 0.01;
        let wish = Vec3::new(heading.cos(), 0.0, heading.sin());
        let mut input = WalkInput::toward(wish);
        if tick % 90 == 45 {
            input = input.with_jump();
        }
        walker.step(DT, input, &|x, y, z| rt.get(x, y, z));

        let (wx, _, wz) = walker.pos.cell();
        rt.ensure_loaded_around(world_to_chunk(wx, wz), cfg.render_distance);

        // Alternate breaking the block ahead and putting it back
        if tick % 60 == 30 {
            let look = Vec3::new(wish.x, -1.0, wish.z);
            if let Some(hit) = interact::target(&rt, &walker, look) {
                match held.take() {
                    None => {
                        held = interact::break_block(&mut rt, &hit);
                        broken += usize::from(held.is_some());
                    }
                    Some(block) => match interact::place_block(&mut rt, &walker, &hit, block) {
                        PlaceOutcome::Placed(_) => placed += 1,
                        _ => held = Some(block),
                    },
                }
            }
        }

        rt.drain(&mut renderer);
    }

    let stats = rt.stats();
    log::info!(
        "{} ticks: player at ({:.2}, {:.2}, {:.2}) grounded={}, {broken} broken, {placed} placed",
        args.ticks,
        walker.pos.x,
        walker.pos.y,
        walker.pos.z,
        walker.on_ground
    );
    log::info!(
        "{} chunks ({} meshed, {} queued), {} voxels, {} draw calls, {} faces",
        stats.chunks,
        stats.meshed,
        stats.queued,
        stats.voxels,
        renderer.draw_calls(),
        renderer.faces()
    );

    let mut per_block = [0usize; BlockType::COUNT];
    for c in rt.chunks().coords() {
        for batch in rt.mesh(c).map(|m| m.batches.as_slice()).unwrap_or_default() {
            per_block[batch.block.index()] += batch.positions.len();
        }
    }
    for block in BlockType::ALL {
        let faces = per_block[block.index()];
        if faces > 0 {
            let info = palette.get(block);
            log::debug!(target: "mesh", "{:<10} {} {faces} faces", info.name, info.swatch.color_at(0.0));
        }
    }
    Ok(())
}

//! Route console state.
//!
//! Holds the loaded world and routing options between commands and writes
//! one response line per query. Commands that need a map answer `nomap`
//! until one is loaded.

use std::io::{self, Write};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RouteConfig;
use crate::map::{GameMap, TileRef};
use crate::protocol::parser::{Command, Coord};
use crate::search::PathResult;
use crate::territory::PlayerId;
use crate::transport::{TransportPlan, TransportStep};
use crate::world::World;

/// Holds the mutable state of the console between commands.
pub struct Engine {
    config: RouteConfig,
    world: Option<World>,
}

impl Engine {
    /// Creates an engine with no map loaded.
    pub fn new(config: RouteConfig) -> Self {
        Engine {
            config,
            world: None,
        }
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Dispatches one command. Returns `false` once the session should end.
    pub fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<bool> {
        match cmd {
            Command::IsReady => writeln!(out, "readyok")?,
            Command::Map { rows } => self.handle_map(&rows, out)?,
            Command::SetOption { name, value } => self.set_option(&name, &value),
            Command::Quit => return Ok(false),
            query => match self.world.as_mut() {
                Some(world) => handle_query(world, query, out)?,
                None => {
                    debug!("query before map");
                    writeln!(out, "nomap")?;
                }
            },
        }
        out.flush()?;
        Ok(true)
    }

    /// Sets a routing option. Invalid options are logged and ignored.
    pub fn set_option(&mut self, name: &str, value: &str) {
        match self.config.set_option(name, value) {
            Ok(()) => {
                if let Some(world) = self.world.as_mut() {
                    *world.config_mut() = self.config.clone();
                }
            }
            Err(e) => warn!("option rejected: {}", e),
        }
    }

    fn handle_map<W: Write>(&mut self, rows: &str, out: &mut W) -> io::Result<()> {
        match GameMap::parse(rows) {
            Ok(map) => {
                writeln!(
                    out,
                    "map {}x{} shores {}",
                    map.width(),
                    map.height(),
                    map.shore_tiles().len()
                )?;
                match self.world.as_mut() {
                    Some(world) => world.set_map(map),
                    None => self.world = Some(World::new(map, self.config.clone())),
                }
            }
            Err(e) => {
                warn!("map rejected: {}", e);
                writeln!(out, "maperror")?;
            }
        }
        Ok(())
    }
}

/// Answers a command that needs a loaded world.
fn handle_query<W: Write>(world: &mut World, cmd: Command, out: &mut W) -> io::Result<()> {
    match cmd {
        Command::Claim { player, from, to } => {
            let n = world.claim_rect(player, from, to);
            writeln!(out, "claimed {} {}", player, n)
        }
        Command::Conquer { player, at } => {
            let ok = tile(world, at).is_some_and(|t| world.conquer(player, t));
            writeln!(out, "{}", if ok { "ok" } else { "rejected" })
        }
        Command::Relinquish { at } => {
            let ok = tile(world, at).is_some_and(|t| world.relinquish(t));
            writeln!(out, "{}", if ok { "ok" } else { "rejected" })
        }
        Command::Shores { player } => {
            let tiles = world.shore_tiles(player).to_vec();
            writeln!(out, "shores{}", tile_list(world.map(), &tiles))
        }
        Command::Landing { at } => {
            let landing = tile(world, at).and_then(|t| world.target_transport_tile(t));
            writeln!(out, "landing {}", maybe_tile(world.map(), landing))
        }
        Command::Closest { player, at } => {
            let closest = tile(world, at).and_then(|t| world.closest_shore_from_player(player, t));
            writeln!(out, "closest {}", maybe_tile(world.map(), closest))
        }
        Command::Candidates { player, at } => {
            let candidates = match tile(world, at) {
                Some(t) => world.candidate_shore_tiles(player, t),
                None => Vec::new(),
            };
            writeln!(out, "candidates{}", tile_list(world.map(), &candidates))
        }
        Command::Deploy { player, at } => {
            let source = tile(world, at).and_then(|t| world.best_shore_deployment_source(player, t));
            writeln!(out, "deploy {}", maybe_tile(world.map(), source))
        }
        Command::Search { from, to, budget } => write_search(world, from, to, budget, out),
        Command::Plan { player, at } => write_plan(world, player, at, out),
        Command::Step { from, to } => {
            let step = match (tile(world, from), tile(world, to)) {
                (Some(current), Some(landing)) => Some(world.transport_step(current, landing)),
                _ => None,
            };
            match step {
                Some(TransportStep::Advance(next)) => {
                    writeln!(out, "advance {}", world.map().format_tile(next))
                }
                Some(TransportStep::Land(at)) => writeln!(out, "land {}", world.map().format_tile(at)),
                Some(TransportStep::Stranded(reason)) => writeln!(out, "stranded {}", reason.tag()),
                None => writeln!(out, "stranded nopath"),
            }
        }
        Command::IsReady | Command::Map { .. } | Command::SetOption { .. } | Command::Quit => Ok(()),
    }
}

fn write_search<W: Write>(
    world: &World,
    from: Coord,
    to: Coord,
    budget: Option<u32>,
    out: &mut W,
) -> io::Result<()> {
    let (Some(origin), Some(target)) = (tile(world, from), tile(world, to)) else {
        return writeln!(out, "unreachable nopath 0");
    };
    let cfg = world.config();
    let result = world.mini_search(
        origin,
        target,
        budget.unwrap_or(cfg.deploy_node_budget),
        cfg.bias_offshore,
        cfg.connectivity.into(),
    );
    match result {
        Ok(PathResult::Found(route)) => writeln!(
            out,
            "path {}{}",
            route.cost,
            tile_list(world.map(), &route.tiles)
        ),
        Ok(PathResult::Unreachable(reason)) => {
            writeln!(out, "unreachable {} {}", reason.tag(), reason.expanded())
        }
        // Full-path searches never report a pending step.
        Ok(PathResult::Pending { .. }) => Ok(()),
        Err(e) => {
            warn!("search rejected: {}", e);
            writeln!(out, "unreachable nopath 0")
        }
    }
}

fn write_plan<W: Write>(world: &mut World, player: PlayerId, at: Coord, out: &mut W) -> io::Result<()> {
    let Some(destination) = tile(world, at) else {
        return writeln!(out, "noroute outofbounds");
    };
    match world.plan_transport(player, destination) {
        Ok(plan) => writeln!(out, "plan {}", plan_json(world.map(), &plan)?),
        Err(e) => {
            debug!("plan refused: {}", e);
            writeln!(out, "noroute {}", e.tag())
        }
    }
}

/// Console view of a plan: tile coordinates rather than raw references.
/// Fields are declared in the order they are written.
#[derive(Debug, Serialize)]
struct PlanView {
    destination: (u32, u32),
    embark: (u32, u32),
    landing: (u32, u32),
    player: PlayerId,
}

impl PlanView {
    fn new(map: &GameMap, plan: &TransportPlan) -> Self {
        PlanView {
            destination: map.coords(plan.destination),
            embark: map.coords(plan.embark),
            landing: map.coords(plan.landing),
            player: plan.player,
        }
    }
}

fn plan_json(map: &GameMap, plan: &TransportPlan) -> io::Result<String> {
    serde_json::to_string(&PlanView::new(map, plan)).map_err(io::Error::other)
}

fn tile(world: &World, (x, y): Coord) -> Option<TileRef> {
    world.map().tile_at(x, y)
}

fn maybe_tile(map: &GameMap, tile: Option<TileRef>) -> String {
    tile.map_or_else(|| "none".to_string(), |t| map.format_tile(t))
}

/// Space-prefixed `x,y` list; empty for no tiles.
fn tile_list(map: &GameMap, tiles: &[TileRef]) -> String {
    tiles
        .iter()
        .map(|&t| format!(" {}", map.format_tile(t)))
        .collect()
}

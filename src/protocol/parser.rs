//! Route console command parser.
//!
//! Parses incoming console lines into structured `Command` variants that the
//! session loop can dispatch on. Coordinates are plain `x y` token pairs.

use tracing::debug;

use crate::territory::PlayerId;

/// A grid position as typed on the console.
pub type Coord = (u32, u32);

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the session replies `readyok`.
    IsReady,

    /// Load a map from `/`-separated rows of `#` and `~`.
    Map { rows: String },

    /// Set a routing option: `option <name> <value>`.
    SetOption { name: String, value: String },

    /// Conquer every land tile in an inclusive rectangle.
    Claim {
        player: PlayerId,
        from: Coord,
        to: Coord,
    },

    Conquer { player: PlayerId, at: Coord },

    Relinquish { at: Coord },

    /// List the player's shore border tiles.
    Shores { player: PlayerId },

    /// Landing zone for a destination.
    Landing { at: Coord },

    /// Closest owned shore to a target.
    Closest { player: PlayerId, at: Coord },

    /// Embarkation candidates toward a target.
    Candidates { player: PlayerId, at: Coord },

    /// Optimised embarkation tile toward a target.
    Deploy { player: PlayerId, at: Coord },

    /// Full-path search, optionally with an explicit node budget.
    Search {
        from: Coord,
        to: Coord,
        budget: Option<u32>,
    },

    /// Plan a transport toward a destination.
    Plan { player: PlayerId, at: Coord },

    /// One movement tick from `from` toward the landing zone `to`.
    Step { from: Coord, to: Coord },

    /// Terminate the session.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines, unrecognized commands and malformed
/// arguments. Rejections are logged at debug level.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, args) = tokens.split_first()?;

    let cmd = match head {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),

        "map" => parse_map(args),
        "option" => parse_option(args),
        "claim" => parse_claim(args),
        "conquer" => parse_player_at(args).map(|(player, at)| Command::Conquer { player, at }),
        "relinquish" => parse_exact_coord(args).map(|at| Command::Relinquish { at }),
        "shores" => parse_player_only(args).map(|player| Command::Shores { player }),
        "landing" => parse_exact_coord(args).map(|at| Command::Landing { at }),
        "closest" => parse_player_at(args).map(|(player, at)| Command::Closest { player, at }),
        "candidates" => {
            parse_player_at(args).map(|(player, at)| Command::Candidates { player, at })
        }
        "deploy" => parse_player_at(args).map(|(player, at)| Command::Deploy { player, at }),
        "search" => parse_search(args),
        "plan" => parse_player_at(args).map(|(player, at)| Command::Plan { player, at }),
        "step" => parse_step(args),

        other => {
            debug!(command = other, "unknown command");
            return None;
        }
    };
    if cmd.is_none() {
        debug!(line = line.trim(), "malformed arguments");
    }
    cmd
}

/// Parses `map <rows>`. Rows may also be separated by spaces.
fn parse_map(args: &[&str]) -> Option<Command> {
    if args.is_empty() {
        return None;
    }
    Some(Command::Map {
        rows: args.join("/"),
    })
}

/// Parses `option <name> <value>`; the value may contain spaces.
fn parse_option(args: &[&str]) -> Option<Command> {
    match args {
        [name, value @ ..] if !value.is_empty() => Some(Command::SetOption {
            name: name.to_string(),
            value: value.join(" "),
        }),
        _ => None,
    }
}

/// Parses `claim <player> <x0> <y0> <x1> <y1>`.
fn parse_claim(args: &[&str]) -> Option<Command> {
    match args {
        [p, x0, y0, x1, y1] => Some(Command::Claim {
            player: parse_player(p)?,
            from: parse_coord(x0, y0)?,
            to: parse_coord(x1, y1)?,
        }),
        _ => None,
    }
}

/// Parses `search <x0> <y0> <x1> <y1> [budget]`.
fn parse_search(args: &[&str]) -> Option<Command> {
    let (from, to, rest) = match args {
        [x0, y0, x1, y1, rest @ ..] => (parse_coord(x0, y0)?, parse_coord(x1, y1)?, rest),
        _ => return None,
    };
    let budget = match rest {
        [] => None,
        [b] => Some(b.parse().ok()?),
        _ => return None,
    };
    Some(Command::Search { from, to, budget })
}

/// Parses `step <x0> <y0> <x1> <y1>`.
fn parse_step(args: &[&str]) -> Option<Command> {
    match args {
        [x0, y0, x1, y1] => Some(Command::Step {
            from: parse_coord(x0, y0)?,
            to: parse_coord(x1, y1)?,
        }),
        _ => None,
    }
}

fn parse_player_at(args: &[&str]) -> Option<(PlayerId, Coord)> {
    match args {
        [p, x, y] => Some((parse_player(p)?, parse_coord(x, y)?)),
        _ => None,
    }
}

fn parse_player_only(args: &[&str]) -> Option<PlayerId> {
    match args {
        [p] => parse_player(p),
        _ => None,
    }
}

fn parse_exact_coord(args: &[&str]) -> Option<Coord> {
    match args {
        [x, y] => parse_coord(x, y),
        _ => None,
    }
}

fn parse_player(token: &str) -> Option<PlayerId> {
    token.parse().ok().map(PlayerId)
}

fn parse_coord(x: &str, y: &str) -> Option<Coord> {
    Some((x.parse().ok()?, y.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("  quit  "), Some(Command::Quit));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar 1 2"), None);
    }

    #[test]
    fn parse_map_rows() {
        assert_eq!(
            parse_command("map ##~/#~~"),
            Some(Command::Map {
                rows: "##~/#~~".to_string()
            })
        );
        assert_eq!(
            parse_command("map ##~ #~~"),
            Some(Command::Map {
                rows: "##~/#~~".to_string()
            })
        );
        assert_eq!(parse_command("map"), None);
    }

    #[test]
    fn parse_option_with_value() {
        assert_eq!(
            parse_command("option EmbarkStrategy optimized"),
            Some(Command::SetOption {
                name: "EmbarkStrategy".to_string(),
                value: "optimized".to_string(),
            })
        );
        assert_eq!(parse_command("option MaxCandidates"), None);
    }

    #[test]
    fn parse_claim_rectangle() {
        assert_eq!(
            parse_command("claim 3 0 1 4 5"),
            Some(Command::Claim {
                player: PlayerId(3),
                from: (0, 1),
                to: (4, 5),
            })
        );
        assert_eq!(parse_command("claim 3 0 1 4"), None);
        assert_eq!(parse_command("claim x 0 1 4 5"), None);
    }

    #[test]
    fn parse_player_queries() {
        assert_eq!(
            parse_command("conquer 1 2 3"),
            Some(Command::Conquer {
                player: PlayerId(1),
                at: (2, 3)
            })
        );
        assert_eq!(
            parse_command("deploy 7 10 11"),
            Some(Command::Deploy {
                player: PlayerId(7),
                at: (10, 11)
            })
        );
        assert_eq!(
            parse_command("shores 2"),
            Some(Command::Shores {
                player: PlayerId(2)
            })
        );
        assert_eq!(parse_command("closest 1 2"), None);
        assert_eq!(parse_command("plan 1 -2 3"), None);
    }

    #[test]
    fn parse_search_with_and_without_budget() {
        assert_eq!(
            parse_command("search 0 0 5 5"),
            Some(Command::Search {
                from: (0, 0),
                to: (5, 5),
                budget: None
            })
        );
        assert_eq!(
            parse_command("search 0 0 5 5 250"),
            Some(Command::Search {
                from: (0, 0),
                to: (5, 5),
                budget: Some(250)
            })
        );
        assert_eq!(parse_command("search 0 0 5 5 lots"), None);
        assert_eq!(parse_command("search 0 0 5 5 1 2"), None);
    }

    #[test]
    fn parse_step_and_relinquish() {
        assert_eq!(
            parse_command("step 1 2 3 4"),
            Some(Command::Step {
                from: (1, 2),
                to: (3, 4)
            })
        );
        assert_eq!(
            parse_command("relinquish 9 9"),
            Some(Command::Relinquish { at: (9, 9) })
        );
        assert_eq!(parse_command("relinquish 9"), None);
    }
}

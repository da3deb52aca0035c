mod options;

use std::process::exit;

use itertools::Itertools;
pub use options::UCIServerOptions;

use crate::prelude::*;

pub struct UCIServer {
    game: Option<Game>,
    config: RulesConfig,
    options: UCIServerOptions,
}

impl UCIServer {
    /// Produces a new protocol server with the given engine configuration.
    pub fn new(options: UCIServerOptions) -> UCIServer {
        UCIServer {
            game: None,
            config: options.rules_config(),
            options,
        }
    }

    /// Runs the engine's line-oriented command loop until EOF or `quit`.
    pub fn run(&mut self) -> Result<()> {
        loop
        {
            let mut cmdstr: String = String::new();
            if std::io::stdin().read_line(&mut cmdstr)? == 0 {
                return Ok(());
            }

            let args: Vec<&str> = cmdstr.split_whitespace().filter(|s| !s.is_empty()).collect();
            let cmd = *args.first().unwrap_or(&"");

            self.apply(cmd, &args[1..])?;
        }
    }

    /// Runs a command.
    fn apply(&mut self, cmd: &str, args: &[&str]) -> Result<()> {
        let result = match cmd
        {
            | "" => Ok(()),
            | "uci" => self.identify(),
            | "isready" => self.ready(),
            | "setoption" => self.set_option(args),
            | "ucinewgame" => self.new_game(),
            | "position" => self.position(args),
            | "go" => self.go(args),
            | "stop" => self.go(&[]),
            | "status" => self.status(),
            | "network" => self.network(),
            | "victory" => self.victory(),
            | "phase" => self.phase(args),
            | "retreats" => self.retreats(),
            | "quit" => exit(0),
            | _ => Err(anyhow!("unrecognized command {cmd}")),
        };

        match result
        {
            Ok(_) => {
                log::debug!("command completed successfully: {cmd} {}", args.join(" "));
            },
            Err(err) => {
                log::warn!("encountered recoverable error:\n{err}");
                println!("error {err}");
            },
        };
        Ok(())
    }

    fn identify(&self) -> Result<()> {
        println!("id name {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        println!("id author the {} developers", env!("CARGO_PKG_NAME"));
        println!("option name networks type check default false");
        println!("option name relay_adjacency_rebroadcast type check default true");
        println!("uciok");
        Ok(())
    }

    fn ready(&self) -> Result<()> {
        println!("readyok");
        Ok(())
    }

    fn set_option(&mut self, args: &[&str]) -> Result<()> {
        let [name_kw, name, value_kw, value] = args else {
            return Err(anyhow!("expected: setoption name <name> value <value>"));
        };
        if *name_kw != "name" || *value_kw != "value" {
            return Err(anyhow!("expected: setoption name <name> value <value>"));
        }

        let enabled = value.parse::<bool>().context("option value must be true or false")?;
        match *name {
            "networks" => self.config.networks_enabled = enabled,
            "relay_adjacency_rebroadcast" => self.config.relay_adjacency_rebroadcast = enabled,
            _ => return Err(anyhow!("unknown option {name}")),
        };
        println!("info string option {name} applies from the next game");
        Ok(())
    }

    /// Starts a fresh game from the standard deployment.
    fn new_game(&mut self) -> Result<()> {
        self.game = Some(Game::startpos(self.config));
        Ok(())
    }

    /// Loads a position: `position startpos|kfen <file> [moves m1 m2 ...]`.
    fn position(&mut self, args: &[&str]) -> Result<()> {
        let mut rest = args;
        let mut game = match rest.split_first() {
            Some((&"startpos", tail)) => {
                rest = tail;
                Game::startpos(self.config)
            }
            Some((&"kfen", tail)) => {
                let Some((path, tail)) = tail.split_first() else {
                    return Err(anyhow!("kfen requires a file path"));
                };
                rest = tail;
                let kfen = std::fs::read_to_string(path)
                    .with_context(|| format!("reading position file {path}"))?;
                Game::decode(kfen.trim(), self.config)?
            }
            _ => return Err(anyhow!("expected: position startpos|kfen <file> [moves ...]")),
        };

        match rest.split_first() {
            None => {}
            Some((&"moves", tokens)) => {
                for token in tokens {
                    self.apply_token(&mut game, token)
                        .with_context(|| format!("applying {token}"))?;
                }
            }
            Some((junk, _)) => return Err(anyhow!("unexpected token {junk}")),
        }

        self.game = Some(game);
        println!("{}", self.get().notate());
        Ok(())
    }

    /// Applies one history token: a from-to move, `battle`, `x<target>`,
    /// `pass`, or `end`.
    fn apply_token(&self, game: &mut Game, token: &str) -> Result<()> {
        match token {
            "battle" => game.switch_to_battle()?,
            "pass" => game.pass_attack()?,
            "end" => game.end_turn()?,
            t if t.starts_with('x') => {
                let target = t[1..].parse::<Coord>()?;
                game.make_attack(&target)?;
            }
            t => {
                let MoveToken { from, to } = t.parse::<MoveToken>()?;
                game.make_move(&from, &to)?;
            }
        };
        Ok(())
    }

    /// Answers with a deterministic legal action. There is no searcher in
    /// this engine; the first legal action in scan order stands in.
    fn go(&mut self, args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        if let Some(mode) = args.first() {
            match *mode {
                "depth" | "nodes" | "movetime" | "infinite" | "ponder" => {
                    println!("info string search is not implemented; ignoring {mode}");
                }
                other => return Err(anyhow!("unrecognized search option {other}")),
            }
        }

        let game = self.get();
        let (action, considered) = match game.phase() {
            Phase::Movement => {
                let moves = game.legal_moves();
                let action = moves
                    .first()
                    .map(|&(from, to)| MoveToken { from, to }.notate())
                    .unwrap_or_else(|| "battle".into());
                (action, moves.len())
            }
            Phase::Battle if game.attacks_this_turn() == 0 => {
                let targets = game.legal_targets();
                let action = targets
                    .first()
                    .map(|target| format!("x{}", target.notate()))
                    .unwrap_or_else(|| "pass".into());
                (action, targets.len())
            }
            Phase::Battle => ("end".into(), 0),
        };
        if self.options.verbose {
            println!("info string considered {considered} legal actions");
        }
        println!("bestmove {action}");
        Ok(())
    }

    fn status(&mut self) -> Result<()> {
        self.ensure_started()?;
        println!("{}", self.get().notate());
        println!("{}", self.get().board().pretty());
        Ok(())
    }

    fn network(&mut self) -> Result<()> {
        self.ensure_started()?;
        for side in Side::all() {
            println!("network {}", side.notate());
            println!("{}", self.get().board().pretty_network(side));
        }
        Ok(())
    }

    fn victory(&mut self) -> Result<()> {
        self.ensure_started()?;
        println!("victory {}", self.get().state().notate());
        Ok(())
    }

    /// Reports the phase, or forces the switch to battle: `phase [M|B]`.
    fn phase(&mut self, args: &[&str]) -> Result<()> {
        self.ensure_started()?;
        match args.first() {
            None => println!("phase {}", self.get().phase().notate()),
            Some(arg) => {
                let requested = Phase::parse(arg)?;
                if requested != self.get().phase() {
                    match requested {
                        Phase::Battle => self.get_mut().switch_to_battle()?,
                        Phase::Movement => return Err(anyhow!("cannot reopen the movement phase")),
                    }
                }
                println!("phase {}", self.get().phase().notate());
            }
        };
        Ok(())
    }

    fn retreats(&mut self) -> Result<()> {
        self.ensure_started()?;
        let game = self.get();
        let pending = game.pending_retreats(game.side_to_move());
        println!(
            "retreats {}",
            SetOps::iter(pending).map(|c| c.notate()).join(" ")
        );
        Ok(())
    }

    // accessors

    fn ensure_started(&mut self) -> Result<&mut Game> {
        if self.game.is_none() {
            Err(anyhow!("no game in progress"))
        } else {
            Ok(self.get_mut())
        }
    }

    /// Retrieves the game in a shared context.
    fn get(&self) -> &Game {
        self.game.as_ref().unwrap()
    }

    /// Retrieves the game in a mutable context.
    fn get_mut(&mut self) -> &mut Game {
        self.game.as_mut().unwrap()
    }
}

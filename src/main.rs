//! Floor Jumper headless runner
//!
//! Plays a scripted input pattern against the simulation and prints a JSON summary.
//!
//! Usage: `floor-jumper [SETTINGS.json] [--seed N] [--ticks N]`

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::error::Error;

    use serde::Serialize;

    use floor_jumper::records::ClearTime;
    use floor_jumper::sim::{Intent, Level, TickInput, tick};
    use floor_jumper::{Settings, split_millis};

    const DEFAULT_SEED: u64 = 0x5EED;
    const DEFAULT_TICKS: u64 = 30 * 60;

    #[derive(Debug)]
    pub struct Args {
        pub settings_path: Option<String>,
        pub seed: u64,
        pub ticks: u64,
    }

    pub fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, Box<dyn Error>> {
        let mut parsed = Args {
            settings_path: None,
            seed: DEFAULT_SEED,
            ticks: DEFAULT_TICKS,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    parsed.seed = value.parse()?;
                }
                "--ticks" => {
                    let value = args.next().ok_or("--ticks needs a value")?;
                    parsed.ticks = value.parse()?;
                }
                flag if flag.starts_with("--") => {
                    return Err(format!("unknown option {flag}").into());
                }
                path => parsed.settings_path = Some(path.to_string()),
            }
        }
        Ok(parsed)
    }

    /// Walk back and forth across the floor, jumping (and air jumping) periodically
    fn scripted_input(t: u64) -> TickInput {
        let mut intents = Vec::new();
        match t % 180 {
            0 => intents.push(Intent::MoveRightPressed),
            90 => intents.extend([Intent::MoveRightReleased, Intent::MoveLeftPressed]),
            179 => intents.push(Intent::MoveLeftReleased),
            _ => {}
        }
        match t % 40 {
            0 => intents.push(Intent::JumpPressed),
            1 => intents.push(Intent::JumpReleased),
            9 => intents.push(Intent::JumpPressed),
            _ => {}
        }
        TickInput::new(intents)
    }

    #[derive(Debug, Serialize)]
    struct Summary<'a> {
        seed: u64,
        ticks: u64,
        level: u32,
        enemies: usize,
        blocks: usize,
        elapsed: String,
        player_dying: bool,
        clear_times: &'a [ClearTime],
    }

    pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
        let settings = match &args.settings_path {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let dt_ms = settings.screen.tick_ms;
        let mut level = Level::new(settings, args.seed);

        for t in 0..args.ticks {
            tick(&mut level, &scripted_input(t), dt_ms);
            if t % 300 == 299 {
                log::info!(
                    "tick {}: level {}, {} enemies, {} blocks",
                    t + 1,
                    level.level_number(),
                    level.enemies.len(),
                    level.floor.block_count()
                );
            }
        }

        let (minutes, seconds, hundredths) = split_millis(level.timer.elapsed_ms());
        let summary = Summary {
            seed: args.seed,
            ticks: args.ticks,
            level: level.level_number(),
            enemies: level.enemies.len(),
            blocks: level.floor.block_count(),
            elapsed: format!("{minutes:02}:{seconds:02}.{hundredths:02}"),
            player_dying: level.player.body.dying,
            clear_times: &level.clear_times.entries,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Floor Jumper (headless) starting...");

    let result = runner::parse_args(std::env::args().skip(1)).and_then(runner::run);
    if let Err(err) = result {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the embedding page on wasm
}

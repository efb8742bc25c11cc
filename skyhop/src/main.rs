use std::{fs, thread, time::Duration};

use anyhow::Context;
use log::{debug, info};

use skyhop_game::{
    contact::Reaction, player::FrameInput, scene_host::SceneHost, settings::Settings, Game,
};

use crate::{
    clock::{Clock, FixedStep, SystemClock},
    headless::HeadlessHost,
};

mod bounding_box;
mod clock;
mod headless;

const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 60 * 5;
const HUD_INTERVAL: u32 = 60;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut realtime = false;
    let mut settings = Settings::default();
    for arg in std::env::args().skip(1) {
        if arg == "--realtime" {
            realtime = true;
        } else {
            settings = load_settings(&arg)?;
        }
    }

    if realtime {
        play(settings, SystemClock, true)
    } else {
        play(settings, FixedStep::new(FRAME_TIME), false)
    }
}

fn load_settings(path: &str) -> anyhow::Result<Settings> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let settings = toml::from_str(&text).with_context(|| format!("parsing {path}"))?;
    info!("loaded settings from {path}");
    Ok(settings)
}

fn play<C: Clock>(settings: Settings, clock: C, pace: bool) -> anyhow::Result<()> {
    let mut host = HeadlessHost::new(&settings, clock);
    let mut game = Game::new(settings, &mut host)?;
    let mut pilot = Autopilot::default();

    for frame in 0..MAX_FRAMES {
        let input = pilot.input(&host);
        let report = game.update(&mut host, &input);

        for reaction in &report.reactions {
            match reaction {
                Reaction::PowerupCollected(kind) => info!("picked up {}", kind.name()),
                Reaction::StructureHit { damage, absorbed, .. } if *damage > 0 => {
                    info!("fell for {damage} damage (absorbed: {absorbed})")
                }
                _ => debug!("frame {frame}: {reaction:?}"),
            }
        }
        if frame % HUD_INTERVAL == 0 {
            debug!("{} structures\n{}", game.structures().len(), game.hud(&host));
        }
        if game.is_over() {
            break;
        }
        if pace {
            thread::sleep(Duration::from_secs_f32(FRAME_TIME));
        }
    }

    info!(
        "{} structures, {} bodies alive\n{}",
        game.structures().len(),
        host.body_count(),
        game.hud(&host)
    );
    Ok(())
}

/// Runs forward, hopping whenever it lands and dropping a platform when falling fast.
#[derive(Default)]
struct Autopilot {
    jump_held: bool,
}

const PANIC_FALL_SPEED: f32 = -12.0;

impl Autopilot {
    fn input<C: Clock>(&mut self, host: &HeadlessHost<C>) -> FrameInput {
        let falling = host.player_velocity().z < PANIC_FALL_SPEED;
        let jump = !self.jump_held && (host.player_on_ground() || falling);
        self.jump_held = jump;

        FrameInput {
            forward: true,
            jump,
            ..Default::default()
        }
    }
}

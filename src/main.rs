//! Headless demo: plays one round with a synthetic tilt source.
//!
//! The ball sways on a slow sine wave while the world scrolls; the round
//! ends in a win, a fire, or an escape depending on what spawns. Outcome
//! and the matching result URL land in the log.

use std::time::Duration;

use tiltfall::consts::SIM_DT;
use tiltfall::driver::{RoundDriver, RoundEvent};
use tiltfall::outcome::OutcomeHandler;
use tiltfall::sensor::AccelSample;
use tiltfall::timer::TimerHandle;
use tiltfall::tuning::Tuning;
use tiltfall::{ResultUrls, secs_to_ticks};

struct LogOutcome {
    urls: ResultUrls,
}

impl OutcomeHandler for LogOutcome {
    fn round_over(&mut self, won: bool) {
        match self.urls.url_for(won) {
            Some(url) => log::info!("round over, won={won}, result page: {url}"),
            None => log::info!("round over, won={won}, no result page available"),
        }
    }
}

fn main() {
    env_logger::init();

    // A real host fetches this payload once at startup; the demo fakes it
    let urls = ResultUrls::from_json(
        r#"{"winner": "https://example.com/win", "loser": "https://example.com/lose"}"#,
    );

    let tuning = Tuning::load(std::path::Path::new("tuning.json"));
    let seed = rand::random::<u64>();
    log::info!("demo round with seed {seed}");

    let mut driver = RoundDriver::new(seed, tuning, Box::new(LogOutcome { urls }));
    let (tx, rx) = RoundDriver::channel();

    let countdown_tx = tx.clone();
    driver.attach_timer(TimerHandle::spawn_repeating(
        Duration::from_millis(10),
        move || {
            // Countdown runs at 100x so the demo finishes quickly
            let _ = countdown_tx.send(RoundEvent::CountdownTick);
        },
    ));

    let producer = std::thread::spawn(move || {
        tx.send(RoundEvent::Start).ok();
        let sensor_ticks = secs_to_ticks(tiltfall::TiltFilter::update_interval());
        for i in 0..secs_to_ticks(40.0) {
            if i % sensor_ticks == 0 {
                let t = i as f32 * SIM_DT;
                let x = (t * 0.8).sin() * 0.6;
                tx.send(RoundEvent::Sensor(Some(AccelSample { x, y: 0.0, z: 0.0 })))
                    .ok();
            }
            if tx.send(RoundEvent::Step(SIM_DT)).is_err() {
                return;
            }
            // Pace the producer so the countdown thread gets a word in
            std::thread::sleep(Duration::from_millis(1));
        }
        tx.send(RoundEvent::Shutdown).ok();
    });

    driver.run(rx);
    producer.join().expect("producer thread panicked");
}

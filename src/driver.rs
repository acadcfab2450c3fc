//! Single-consumer event funnel
//!
//! Countdown ticks, sensor samples, and contact reports arrive from
//! different threads in a real host. All of them serialize through one
//! channel into a single consumer that owns the `Round`, so phase
//! transitions stay sequentially consistent without any locking.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::outcome::OutcomeHandler;
use crate::sensor::{AccelSample, TiltFilter};
use crate::sim::contact::Contact;
use crate::sim::state::{Round, RoundPhase, SimEvent};
use crate::sim::tick::{TickInput, tick};
use crate::timer::TimerHandle;
use crate::tuning::Tuning;

/// Everything a round can receive from the outside world
#[derive(Debug)]
pub enum RoundEvent {
    /// Start input (tap)
    Start,
    /// One 1 Hz countdown tick
    CountdownTick,
    /// A raw accelerometer reading; `None` is an errored sample
    Sensor(Option<AccelSample>),
    /// A contact pair reported by an external physics service
    Contact(Contact),
    /// Advance the simulation by dt seconds
    Step(f32),
    /// Tear down the finished round and build a fresh one
    Restart,
    /// Stop the consumer loop
    Shutdown,
}

/// Owns the live round and applies funneled events in arrival order.
pub struct RoundDriver {
    round: Round,
    filter: TiltFilter,
    outcome: Box<dyn OutcomeHandler>,
    tuning: Tuning,
    next_seed: u64,
    timer: Option<TimerHandle>,
    outcome_delivered: bool,
}

impl RoundDriver {
    pub fn new(seed: u64, tuning: Tuning, outcome: Box<dyn OutcomeHandler>) -> Self {
        Self {
            round: Round::new(seed, tuning.clone()),
            filter: TiltFilter::new(),
            outcome,
            tuning,
            next_seed: seed.wrapping_add(1),
            timer: None,
            outcome_delivered: false,
        }
    }

    /// The channel producers send through
    pub fn channel() -> (Sender<RoundEvent>, Receiver<RoundEvent>) {
        mpsc::channel()
    }

    /// Hand over the host's countdown timer so round-over paths can cancel
    /// it. Replacing an existing timer cancels the old one first.
    pub fn attach_timer(&mut self, handle: TimerHandle) {
        self.cancel_timer();
        self.timer = Some(handle);
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Apply one event, then deliver any resulting outcome.
    pub fn handle_event(&mut self, event: RoundEvent) {
        match event {
            RoundEvent::Start => self.round.start(),
            RoundEvent::CountdownTick => self.round.on_tick(),
            RoundEvent::Sensor(sample) => {
                let smoothed = self.filter.ingest(sample);
                self.round.on_sensor_sample(smoothed);
            }
            RoundEvent::Contact(contact) => self.round.on_contact(contact),
            RoundEvent::Step(dt) => tick(&mut self.round, &TickInput::default(), dt),
            RoundEvent::Restart => self.restart(),
            RoundEvent::Shutdown => {}
        }
        self.pump_outcome();
    }

    /// Consume events until `Shutdown` or all producers hang up.
    pub fn run(&mut self, rx: Receiver<RoundEvent>) {
        while let Ok(event) = rx.recv() {
            if matches!(event, RoundEvent::Shutdown) {
                break;
            }
            self.handle_event(event);
        }
        self.cancel_timer();
    }

    /// Restart is only valid from Finished. The outstanding timer is
    /// cancelled before the new round exists, so nothing stale can fire
    /// into it; a new `Round` is built rather than resetting in place.
    fn restart(&mut self) {
        if !matches!(self.round.phase, RoundPhase::Finished { .. }) {
            return;
        }
        self.cancel_timer();
        let seed = self.next_seed;
        self.next_seed = seed.wrapping_add(1);
        self.round = Round::new(seed, self.tuning.clone());
        self.filter = TiltFilter::new();
        self.outcome_delivered = false;
        log::info!("new round with seed {seed}");
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Hand the verdict to the outcome handler, exactly once per round,
    /// cancelling the countdown timer on every round-over path.
    fn pump_outcome(&mut self) {
        for event in self.round.drain_events() {
            if let SimEvent::RoundOver { won } = event {
                self.cancel_timer();
                if !self.outcome_delivered {
                    self.outcome_delivered = true;
                    self.outcome.round_over(won);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::outcome::RecordingHandler;
    use crate::secs_to_ticks;
    use crate::sim::contact::{BALL_CATEGORY, HAZARD_CATEGORY};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default, Clone)]
    struct SharedHandler(Arc<Mutex<Vec<bool>>>);

    impl OutcomeHandler for SharedHandler {
        fn round_over(&mut self, won: bool) {
            self.0.lock().unwrap().push(won);
        }
    }

    fn lose_by_fire(driver: &mut RoundDriver) {
        driver.handle_event(RoundEvent::Start);
        driver.handle_event(RoundEvent::Contact(Contact::new(
            BALL_CATEGORY,
            HAZARD_CATEGORY,
        )));
        for _ in 0..secs_to_ticks(1.0) {
            driver.handle_event(RoundEvent::Step(SIM_DT));
        }
    }

    #[test]
    fn test_outcome_delivered_once() {
        let verdicts = SharedHandler::default();
        let mut driver = RoundDriver::new(5, Tuning::default(), Box::new(verdicts.clone()));
        lose_by_fire(&mut driver);
        assert_eq!(*verdicts.0.lock().unwrap(), vec![false]);

        // Stray events after the round is over change nothing
        driver.handle_event(RoundEvent::CountdownTick);
        driver.handle_event(RoundEvent::Step(SIM_DT));
        assert_eq!(verdicts.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_sensor_path_smooths_into_round() {
        let mut driver = RoundDriver::new(5, Tuning::default(), Box::<RecordingHandler>::default());
        driver.handle_event(RoundEvent::Start);
        driver.handle_event(RoundEvent::Sensor(Some(AccelSample {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        })));
        assert_eq!(driver.round().tilt, 0.75);

        // Errored sample keeps the previous smoothed value
        driver.handle_event(RoundEvent::Sensor(None));
        assert_eq!(driver.round().tilt, 0.75);
    }

    #[test]
    fn test_restart_builds_fresh_round() {
        let verdicts = SharedHandler::default();
        let mut driver = RoundDriver::new(5, Tuning::default(), Box::new(verdicts.clone()));

        // Restart before the round ends is rejected
        driver.handle_event(RoundEvent::Start);
        driver.handle_event(RoundEvent::CountdownTick);
        driver.handle_event(RoundEvent::Restart);
        assert_eq!(driver.round().phase, RoundPhase::Playing);

        lose_by_fire(&mut driver);
        driver.handle_event(RoundEvent::Restart);
        let round = driver.round();
        assert_eq!(round.phase, RoundPhase::Idle);
        assert_eq!(round.secs_left, round.tuning.win_time_secs);
        assert!(round.obstacles.is_empty());

        // A stale countdown tick from the dead round cannot touch the new one
        driver.handle_event(RoundEvent::CountdownTick);
        assert_eq!(driver.round().secs_left, driver.round().tuning.win_time_secs);

        // And the new round delivers its own outcome
        lose_by_fire(&mut driver);
        assert_eq!(*verdicts.0.lock().unwrap(), vec![false, false]);
    }

    #[test]
    fn test_attached_timer_cancelled_on_round_over() {
        let verdicts = SharedHandler::default();
        let mut driver = RoundDriver::new(5, Tuning::default(), Box::new(verdicts.clone()));

        let (tx, rx) = RoundDriver::channel();
        let timer = TimerHandle::spawn_repeating(Duration::from_millis(5), move || {
            let _ = tx.send(RoundEvent::CountdownTick);
        });
        driver.attach_timer(timer);

        lose_by_fire(&mut driver);
        assert!(driver.timer.is_none());

        // Drain whatever the timer managed to send, then confirm it stopped
        while rx.try_recv().is_ok() {}
        std::thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_run_loop_funnels_producers() {
        let verdicts = SharedHandler::default();
        let mut driver = RoundDriver::new(5, Tuning::default(), Box::new(verdicts.clone()));
        let (tx, rx) = RoundDriver::channel();

        let producer = std::thread::spawn(move || {
            tx.send(RoundEvent::Start).unwrap();
            tx.send(RoundEvent::Contact(Contact::new(
                BALL_CATEGORY,
                HAZARD_CATEGORY,
            )))
            .unwrap();
            for _ in 0..secs_to_ticks(1.0) {
                tx.send(RoundEvent::Step(SIM_DT)).unwrap();
            }
            tx.send(RoundEvent::Shutdown).unwrap();
        });

        driver.run(rx);
        producer.join().unwrap();
        assert_eq!(*verdicts.0.lock().unwrap(), vec![false]);
    }
}

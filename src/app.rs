use log::{debug, info};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::Result;
use crate::fsm::{FrameSummary, PacketDriver};
use crate::input::InputEvent;
use crate::sensor::{ReadingGenerator, SensorKind, SensorWorker};
use crate::state::{SharedState, TiltDirection};

/// Owns the shared visual state and everything that mutates it: the input
/// handling, the run launcher and the per-frame driver. Lives on the frame
/// loop's thread; sensor workers run on the tokio runtime behind `runtime`.
pub struct Simulation {
    config: Config,
    state: SharedState,
    driver: PacketDriver,
    generator: ReadingGenerator,
    client: reqwest::Client,
    runtime: Handle,
    workers: Vec<JoinHandle<()>>,
    frame: u64,
}

impl Simulation {
    pub fn new(config: Config, runtime: Handle) -> Result<Self> {
        // No request timeout: a stalled call keeps its packet at the API
        let client = reqwest::Client::builder().build()?;
        let driver = PacketDriver::new(config.layout.clone(), &config.frame);
        Ok(Self {
            config,
            state: SharedState::new(),
            driver,
            generator: ReadingGenerator::new(),
            client,
            runtime,
            workers: Vec::new(),
            frame: 0,
        })
    }

    pub fn with_generator(mut self, generator: ReadingGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Applies one user action. Returns false when the user asked to quit.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Start => {
                self.start_run();
            }
            InputEvent::TiltLeft => {
                self.adjust_tilt(TiltDirection::Left);
            }
            InputEvent::TiltRight => {
                self.adjust_tilt(TiltDirection::Right);
            }
            InputEvent::Quit => return false,
        }
        true
    }

    pub fn adjust_tilt(&self, direction: TiltDirection) -> f64 {
        self.state.lock().adjust_tilt(direction, &self.config.tilt)
    }

    /// Resets the state and launches one worker per sensor. Does nothing and
    /// returns false while a run is in progress.
    ///
    /// The run flag check, the reset and the packet registrations share one
    /// critical section, so no frame can observe the run with packets missing.
    pub fn start_run(&mut self) -> bool {
        let mut workers = Vec::with_capacity(SensorKind::ALL.len());
        let tilt;
        {
            let mut guard = self.state.lock();
            if !guard.begin_run() {
                return false;
            }
            tilt = guard.current_tilt;
            for kind in SensorKind::ALL {
                let sensor = self.config.sensors.get(kind);
                let worker = SensorWorker::new(
                    kind,
                    self.config.server.url_for(&sensor.endpoint),
                    self.generator.reading_for(kind, tilt),
                    sensor.start_x,
                    sensor.color,
                );
                worker.register(&mut guard, &self.config.layout);
                workers.push(worker);
            }
        }

        info!("Starting run with tilt {:+.1}°", tilt);
        self.workers.retain(|handle| !handle.is_finished());
        for worker in workers {
            debug!("Launching {} worker -> {}", worker.kind(), worker.url());
            let task = worker.run(self.client.clone(), self.state.clone());
            self.workers.push(self.runtime.spawn(task));
        }
        true
    }

    /// Advances the simulation by one frame.
    pub fn update(&mut self) -> FrameSummary {
        self.frame += 1;
        self.driver.step(&self.state)
    }

    /// Workers whose call has not completed yet.
    pub fn pending_workers(&self) -> usize {
        self.workers.iter().filter(|h| !h.is_finished()).count()
    }

    /// Cancels every unfinished worker. Their packets stay at `SendingToApi`.
    pub fn abort_workers(&mut self) {
        for handle in self.workers.drain(..) {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }
}

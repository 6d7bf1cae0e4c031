//! HTTP endpoint serving the latest sensor reading.

use std::sync::{Arc, Mutex};
use std::thread;

use log::{info, warn};
use tiny_http::{Header, Method, Request, Response, Server};

use crate::{History, Measurement, Result, SensorClient};

/// Capability the service needs from the sensor side. Lets tests substitute a scripted
/// reader for the real bus client.
pub trait Sensor {
    fn read_sensor(&self) -> Result<Measurement>;
}

impl Sensor for SensorClient {
    fn read_sensor(&self) -> Result<Measurement> {
        SensorClient::read_sensor(self)
    }
}

/// Listener threads sharing the socket; bounds how many requests are handled at once.
const WORKERS: usize = 4;

/// Answers requests with fresh measurements and keeps the rolling history.
pub struct Service<S> {
    sensor: Mutex<S>,
    history: Mutex<History>,
}

impl<S: Sensor> Service<S> {
    pub fn new(sensor: S) -> Self {
        Self {
            sensor: Mutex::new(sensor),
            history: Mutex::new(History::default()),
        }
    }

    /// Runs one bus transaction and records the result. The sensor lock is held for the
    /// whole exchange: the bus transaction is a critical section, and interleaving two of
    /// them corrupts both. Pushing to the history under the same lock keeps insertion
    /// order aligned with timestamp order. Nothing is recorded on a failed transaction.
    fn sample(&self) -> Result<Measurement> {
        let sensor = self.sensor.lock().unwrap_or_else(|e| e.into_inner());
        let measurement = sensor.read_sensor()?;
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.push(measurement);
        Ok(measurement)
    }

    /// Snapshot of the recorded history, newest first.
    pub fn history(&self) -> Vec<Measurement> {
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.snapshot()
    }

    /// Answers one request. Only the method is routed, every path serves the reading;
    /// unsupported methods get a 405. A failed transaction turns into a 500 for this
    /// request only, the listener keeps running.
    pub fn handle(&self, request: Request) {
        match request.method() {
            Method::Get => match self.sample() {
                Ok(measurement) => {
                    let response = Response::from_string(format!("{measurement}\n"))
                        .with_header(content_type());
                    respond(request, response);
                }
                Err(err) => {
                    warn!("sensor read failed: {err}");
                    respond(request, Response::empty(500).with_header(content_type()));
                }
            },
            // HEAD answers from the header alone and must not touch the sensor
            Method::Head => respond(request, Response::empty(200).with_header(content_type())),
            _ => respond(request, Response::empty(405)),
        }
    }
}

fn content_type() -> Header {
    Header::from_bytes(&b"Content-Type"[..], &b"text/plain;charset=UTF-8"[..])
        .expect("static header is well-formed")
}

fn respond<R: std::io::Read>(request: Request, response: Response<R>) {
    if let Err(err) = request.respond(response) {
        warn!("failed to send response: {err}");
    }
}

/// Binds the listener on localhost and serves until an interrupt signal arrives. Worker
/// threads share the socket; the signal handler unblocks them and the loop drains.
pub fn run(port: u16) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let service = Arc::new(Service::new(SensorClient::new()));
    let server = Arc::new(Server::http(("127.0.0.1", port)).map_err(|e| e as Box<dyn std::error::Error>)?);
    info!("listening on http://127.0.0.1:{port}");

    {
        let server = Arc::clone(&server);
        ctrlc::set_handler(move || server.unblock())?;
    }

    let mut workers = Vec::with_capacity(WORKERS);
    for _ in 0..WORKERS {
        let server = Arc::clone(&server);
        let service = Arc::clone(&service);
        workers.push(thread::spawn(move || {
            while let Ok(request) = server.recv() {
                service.handle(request);
            }
        }));
    }
    for worker in workers {
        let _ = worker.join();
    }

    info!("server stopped");
    Ok(())
}

//! Console progress output.
//!
//! Device lines go to stdout, failures to stderr with the platform code.

use ptzcam_common::error::PtzError;
use ptzcam_motion::{ProgressObserver, SequenceReport};

pub struct ConsoleObserver;

impl ProgressObserver for ConsoleObserver {
    fn device_found(&mut self, name: Option<&str>, token: &str) {
        match name {
            Some(name) => println!("  Found device: {name}"),
            None => println!("  Found device: {token} (no friendly name)"),
        }
    }

    fn device_skipped(&mut self, _label: &str, error: &PtzError) {
        eprintln!("ERROR: {error}");
    }

    fn command_rejected(&mut self, _label: &str, error: &PtzError) {
        eprintln!("ERROR: {error}");
    }

    fn device_done(&mut self, _label: &str, _report: &SequenceReport) {
        println!("    DONE");
    }
}

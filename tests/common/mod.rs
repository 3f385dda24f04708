//! Common test utilities for front-deploy integration tests.
//!
//! This module provides:
//! - `FakeHost`: scripted remote host behind `FakeConnector`/`FakeSession`
//! - `RecordingRunner`/`RecordingSink`: local command and event recorders
//! - `TestProject`: temp project directory with a config and an archive
//! - `run_cli`: runs the real binary from a given directory

#![allow(dead_code)]

pub mod env;
pub mod fakes;
pub mod fixtures;

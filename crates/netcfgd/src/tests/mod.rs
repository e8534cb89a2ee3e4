//! Daemon-level suites: bootstrap stages and full request round trips.

mod support;

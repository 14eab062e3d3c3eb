// acf-manager - inventory of a local Steam library without the Steam client.
//
// The library crate holds all of the logic; the binary (main.rs) only wires
// up logging and exit codes.

pub mod app;

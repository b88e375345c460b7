//! Program-loading behavior: files on disk, and the promise that a bad
//! program never starts the engine.

use std::io::Write;

use oosim_core::sim::loader::load_program;
use oosim_core::{Config, SimError, Simulator};

#[test]
fn loads_a_program_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "MOVC,R1,#7").unwrap();
    writeln!(file, "HALT").unwrap();
    let code = load_program(file.path()).unwrap();
    assert_eq!(code.len(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_program(std::path::Path::new("/no/such/program.asm")).unwrap_err();
    assert!(matches!(err, SimError::Io(_)));
}

#[test]
fn malformed_file_names_the_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "MOVC,R1,#7").unwrap();
    writeln!(file, "ADD,R1").unwrap();
    let err = load_program(file.path()).unwrap_err();
    assert!(matches!(err, SimError::Parse { line: 2, .. }), "{err}");
}

#[test]
fn bad_program_never_starts_the_engine() {
    let err = Simulator::from_source("BOGUS,R1,#1\nHALT", &Config::default()).unwrap_err();
    assert!(matches!(err, SimError::Parse { line: 1, .. }));
}

//! Functionality related to the command line.
pub mod arg_matcher;
pub mod arg_parser;
pub mod processes;

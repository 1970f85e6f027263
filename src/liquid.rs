//! Main module for liquid-lang functionality
//!
//!     The grammar is data: [grammar] declares the states and their ordered rules, and
//!     [lexing] is the engine that walks them. Registration into a host editor and the
//!     completion supplier sit on top of the same static definition.

pub mod completion;
pub mod config;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod lexing;
pub mod locale;
pub mod registration;
pub mod testing;

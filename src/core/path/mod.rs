// src/core/path/mod.rs

//! The attribute-path micro-language: `HeapMemoryUsage.used`, `Foo[bar\]baz].child`,
//! `Threads[0].name`. A path is parsed into typed segments and then walked over a
//! value tree returned by an endpoint.

pub mod parser;
pub mod resolver;

pub use parser::{PathExpression, PathSegment};
pub use resolver::{getter_name, resolve};

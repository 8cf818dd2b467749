//! threadlens
//!
//! Terminal navigator for long JSONL agent conversation transcripts.
//!
//! Pure core / impure shell:
//!
//! - `model`, `parser`, `source`: entry data and transcript loading
//! - `view_state`: layout, sections, scrolling and minimap computation
//! - `state`: the navigation reducer over `ViewState`
//! - `export`: stage file writing
//! - `config`, `logging`, `view`: the terminal shell

pub mod config;
pub mod export;
pub mod logging;
pub mod model;
pub mod parser;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;

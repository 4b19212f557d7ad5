//! Looping turntable GIFs from front/back card photographs.
//!
//! Point the batch pipeline at a directory of `<id>_front.jpg` /
//! `<id>_back.jpg` pairs and it writes one infinitely looping `<id>.gif`
//! per pair, simulating a 3D turntable spin with per-frame perspective
//! warps. The geometry lives in [`cardspin_core`]; this crate adds pair
//! discovery, parallel frame generation, GIF encoding and run reports.
//!
//! ## Quickstart
//!
//! ```no_run
//! use cardspin::{run_batch, BatchOptions, RotationConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = run_batch(&BatchOptions {
//!     input_dir: "cards".into(),
//!     output_dir: "gifs".into(),
//!     config: RotationConfig::default(),
//!     frames_dir: None,
//! })?;
//! println!("wrote {} gif(s)", report.cards.len() - report.failed());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`discover`]: front/back pair discovery.
//! - [`sequence`]: `RotationConfig` and ordered frame generation.
//! - [`render`]: single-frame rendering of a prepared card.
//! - [`encode`]: GIF writing and the optional per-frame PNG dump.
//! - [`pipeline`]: the batch runner tying it all together.
//! - [`report`]: serializable run reports.

pub mod discover;
pub mod encode;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod sequence;

pub use cardspin_core as core;

pub use discover::{discover_pairs, CardPair, DiscoverError};
pub use encode::{save_frames_png, write_gif, EncodeError};
pub use pipeline::{process_pair, run_batch, BatchOptions, PipelineError};
pub use render::{render_frame, PreparedCard};
pub use report::{write_json, BatchReport, CardReport, ReportError};
pub use sequence::{generate_sequence, RenderedFrame, RotationConfig};

pub use cardspin_core::{Face, RgbImage};

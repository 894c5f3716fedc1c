#![forbid(unsafe_code)]

//! Terminal-aware string processing for ANSI-styled text.
//!
//! # Role in termtext
//! `termtext` measures, strips, slices, wraps and truncates strings that may
//! contain ANSI escape sequences, without corrupting active styling or
//! miscounting the columns a terminal will draw.
//!
//! # Primary responsibilities
//! - **Escape handling**: locate and consume ESC, CSI, OSC and ST-terminated
//!   sequences, including chained ones and C1 introducers.
//! - **Width**: grapheme-cluster-aware column counting with emoji and CJK
//!   support, East Asian Ambiguous width configurable.
//! - **Operations**: [`strip_ansi`], [`visible_width`], [`slice_ansi`],
//!   [`wrap_ansi`] and [`truncate_ansi`], each for UTF-8 `&str` and UTF-16
//!   `&[u16]`.
//!
//! # How it fits in the system
//! Every operation is one generic routine over [`TextUnit`] that folds over
//! the spans produced by [`walk::SpanWalker`]. The escape scanner's hot loop
//! lives in `termtext-simd`. Unicode tables come from `unicode-width` and
//! `unicode-segmentation`.

pub mod classify;
pub mod config;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod slice;
pub mod strip;
pub mod style;
pub mod truncate;
pub mod walk;
pub mod width;
pub mod wrap;

pub use config::WidthPolicy;
pub use encoding::TextUnit;
pub use error::{ParseTruncatePositionError, ParseWidthPolicyError};
pub use escape::{ScanState, consume, consume_one, find_escape};
pub use slice::{slice_ansi, slice_ansi_range, slice_ansi_signed, slice_ansi_utf16};
pub use strip::{strip_ansi, strip_ansi_cow, strip_ansi_utf16};
pub use style::StyleState;
pub use truncate::{TruncatePosition, truncate_ansi, truncate_ansi_utf16};
pub use walk::{CodepointSpan, SpanKind};
pub use width::{visible_width, visible_width_detected, visible_width_utf16};
pub use wrap::{WrapOptions, wrap_ansi, wrap_ansi_utf16, wrap_ansi_with};

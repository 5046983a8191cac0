//! citeform-core: the shared model behind every citation format.
//!
//! A [`CitationRecord`] is built once by the host application and handed,
//! together with a [`LabelResolver`] and a [`Locale`], to each format writer.
//! The helpers in this crate compute the pieces that several formats share
//! (producer and distributor lists, publishing data, years, PID URLs) so that
//! every format renders them identically.

mod fragments;
mod helpers;
mod labels;
mod pid;
mod record;
mod traits;

pub use fragments::*;
pub use helpers::*;
pub use labels::*;
pub use pid::*;
pub use record::*;
pub use traits::*;

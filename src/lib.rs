//! cardpress renders character records into printable trading cards and paginated print sheets.
//!
//! The pipeline is CPU-only and deterministic:
//!
//! - Turn a raw portrait (or its absence) into [`CanonicalArt`] with a [`PortraitProcessor`]
//! - Compose a finished [`Card`] with a [`CardCompositor`]
//! - Tile cards onto [`Sheet`]s with a [`SheetPacker`]
//!
//! [`BatchRenderer`] drives all three in parallel and streams results into a [`BatchSink`].
#![forbid(unsafe_code)]

pub mod assets;
pub mod batch;
pub mod foundation;
pub mod geometry;
pub mod model;
pub mod output;
pub mod portrait;
pub mod render;
pub mod sheet;
pub mod style;

pub use crate::assets::decode::{ImageFormatHint, PortraitLimits, decode_portrait};
pub use crate::assets::lookup::PortraitIndex;
pub use crate::batch::pipeline::{
    BatchFailure, BatchItem, BatchOptions, BatchRenderer, BatchReport, BatchSink, CollectSink,
    FailurePolicy,
};
pub use crate::foundation::core::Rgba8;
pub use crate::foundation::error::{CardError, CardResult, ErrorKind};
pub use crate::geometry::fit::{
    RegionSplit, center_in, centered_origin, contain_scale, cover_scale, fit_cover,
    proportional_region,
};
pub use crate::geometry::rect::{Anchor, PixelRect};
pub use crate::model::record::{CharacterRecord, format_cost, format_income};
pub use crate::model::spec::{CardLayout, CardSpec, GuideStyle, SheetSpec, TextSlots};
pub use crate::output::config::{GeneratorConfig, read_records, read_records_path};
pub use crate::output::writer::{OutputConfig, OutputFormat, OutputWriter, sanitize_name};
pub use crate::portrait::processor::{CanonicalArt, PortraitProcessor, PortraitSource};
pub use crate::render::compositor::{Card, CardCompositor, compose_card};
pub use crate::render::text::{FittedText, Typeface, fit_text};
pub use crate::sheet::layout::{GridLayout, guide_rects, plan_grid};
pub use crate::sheet::packer::{Placement, Sheet, SheetAssembler, SheetInfo, SheetPacker};
pub use crate::style::profile::{ColorStop, Fill, StyleBook, StyleProfile};

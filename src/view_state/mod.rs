//! View-state layer - layout, scrolling and overview computation
//!
//! Pure functions over entry slices. Nothing here owns state or performs
//! I/O; the navigation controller calls into these modules on every
//! transition and throws the results away afterwards.
//!
//! # Module Structure
//!
//! - `types`: `ViewportDimensions` and index clamping helpers
//! - `wrap`: greedy word wrapping of entry bodies
//! - `section`: checkpoint-delimited `Section` partitioning
//! - `layout`: `DisplayLine`/`LayoutResult` production
//! - `scroll`: scroll offset targeting with hard clamping
//! - `overview`: fixed-height minimap buckets and markers
//! - `cross_view`: clean ↔ raw index correspondence

pub mod cross_view;
pub mod layout;
pub mod overview;
pub mod scroll;
pub mod section;
pub mod types;
pub mod wrap;

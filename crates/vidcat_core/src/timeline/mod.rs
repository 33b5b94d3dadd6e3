//! Timeline assembly engine.
//!
//! Turns an ordered list of probed clips into a [`ConcatenationPlan`]:
//!
//! - **segments**: file-name range annotations -> `SegmentSpec`s
//! - **wallclock**: modification time + duration + directive -> real-world start
//! - **plan_builder**: contiguous output timeline, concat entries, chapters, descriptions
//! - **timecode**: shared formatting of offsets and clock times
//!
//! # Usage
//!
//! ```ignore
//! use vidcat_core::timeline::{build_plan, PlanInput, TimelineAdjuster};
//!
//! let adjuster = TimelineAdjuster::from_setting(Some("+1 year"))?;
//! let inputs = sources
//!     .into_iter()
//!     .map(PlanInput::from_annotation)
//!     .collect::<Result<Vec<_>, _>>()?;
//! let plan = build_plan(&inputs, &adjuster)?;
//! println!("{}", plan.description());
//! ```
//!
//! [`ConcatenationPlan`]: crate::models::ConcatenationPlan

mod error;
mod plan_builder;
mod segments;
pub mod timecode;
mod wallclock;

pub use error::{TimelineError, TimelineResult};
pub use plan_builder::{build_plan, PlanInput};
pub use segments::parse_segments;
pub use wallclock::{AdjustmentDirective, CalendarDelta, DeltaUnit, TimelineAdjuster};

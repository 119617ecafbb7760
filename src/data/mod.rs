//! Data layer: frame sequences, annotation sheets and the lookup between them.
//!
//! Architecture:
//! ```text
//!   directory of frameN.png          .xlsx / .csv / .json
//!        │                                  │
//!        ▼                                  ▼
//!   ┌──────────┐                      ┌──────────┐
//!   │  frames   │  scan + sort        │  loader   │  pick + parse sheet
//!   └──────────┘                      └──────────┘
//!        │                                  │
//!        ▼                                  ▼
//!   ┌──────────┐                    ┌────────────────┐
//!   │ FrameSet  │  cursor           │ AnnotationTable │  rows keyed by Frame
//!   └──────────┘                    └────────────────┘
//!        │                                  │
//!        └──────────────┬───────────────────┘
//!                       ▼
//!                 ┌──────────┐
//!                 │  lookup   │  frame3.png → Frame3 → flagged columns
//!                 └──────────┘
//! ```

pub mod frames;
pub mod loader;
pub mod lookup;
pub mod model;

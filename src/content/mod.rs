//! Content model: tagged Section/Block variants, shape normalization,
//! tab-group consolidation, and the in-memory editor operations.
//!
//! Everything here is pure; persistence lives in `crate::db` and
//! `crate::pages`.

pub mod edit;
pub mod model;
pub mod normalize;
pub mod slug;
pub mod tabs;

pub use model::{Block, BlockType, Section, SectionType};
pub use normalize::{classify, normalize_blocks, normalize_sections, ContentShape};
pub use tabs::{consolidate_tab_groups, RenderUnit};

//! Output rendering: ASCII summary, Mermaid flowchart, HTML approval page.

pub mod ascii;
pub mod html;
pub mod mermaid;

pub use ascii::ascii_summary;
pub use html::render_approval_page;
pub use mermaid::{mermaid_flowchart, mermaid_image_url};

pub mod dispute;
pub mod evidence;
pub mod explanation;
pub mod packet;
pub mod template;

pub use dispute::{Dispute, DisputeStatus};
pub use evidence::{EvidenceFile, EvidenceKind};
pub use explanation::DisputeExplanation;
pub use packet::PdfPacket;
pub use template::{resolve_template, EvidenceTemplate};

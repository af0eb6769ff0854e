// GenBank flat-file support
//
// Records arrive from efetch as `rettype=gb` text. Only the parts needed to
// locate a CDS translation are modelled in depth; header lines are kept for
// logging and reporting.

pub mod models;
pub mod parser;

pub use models::{Feature, GenbankRecord, Topology};
pub use parser::GenbankParser;

// Form definitions: loading `form.json` + CSV translations, translation coverage
// stats, and assembling the print pages that feed the layout pass.

pub mod handlers;
pub mod models;
pub mod print;
pub mod stats;
pub mod store;

pub use store::FormStore;

//! Service layer: the roadmap store and the file persistence beneath it.
//! - `storage` holds the generic JSON file-backed map.
//! - `roadmap` builds the user/roadmap operations on top of it.
//! - `keygen` produces user keys.

pub mod errors;
pub mod keygen;
pub mod roadmap;
pub mod storage;

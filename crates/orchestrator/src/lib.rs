//! Micro-app pipeline executor.
//!
//! [`PipelineExecutor`] drives one inbound record through the fixed sequence
//! of steps:
//!
//! 1. fetch the icon bytes from image storage,
//! 2. open an authenticated CMS session,
//! 3. upload the icon,
//! 4. create the icon media resource,
//! 5. load the permission catalog and the language, country, and category terms,
//! 6. build the creation template,
//! 7. submit it.
//!
//! The first failing step ends the run. Nothing is retried and resources
//! created by earlier steps are left in place.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The executor sequences calls between business
//! logic in the [`pipeline`] crate and the port traits it defines. It contains
//! no domain rules of its own.

mod executor;

pub use executor::PipelineExecutor;
